//! Save request and result values

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SaveError;
use crate::mime::content_type_for;
use crate::Result;

pub const NULL_ARGUMENT_MESSAGE: &str = "bytes or fileName is null";

/// A validated request. Only constructible through [`SaveRequest::new`].
#[derive(Debug, Clone, Copy)]
pub struct SaveRequest<'a> {
    bytes: &'a [u8],
    file_name: &'a str,
}

impl<'a> SaveRequest<'a> {
    /// Validate raw call arguments. Performs no I/O.
    ///
    /// The file name is reduced to its final path component so a save can
    /// never land outside the Downloads collection.
    pub fn new(bytes: Option<&'a [u8]>, file_name: Option<&'a str>) -> Result<Self> {
        let (Some(bytes), Some(file_name)) = (bytes, file_name) else {
            return Err(SaveError::InvalidArgument(
                NULL_ARGUMENT_MESSAGE.to_string(),
            ));
        };

        Ok(Self {
            bytes,
            file_name: sanitize_file_name(file_name)?,
        })
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn file_name(&self) -> &'a str {
        self.file_name
    }

    pub fn content_type(&self) -> &'static str {
        content_type_for(self.file_name)
    }
}

/// Names are kept as given apart from dropping leading directories.
fn sanitize_file_name(file_name: &str) -> Result<&str> {
    if file_name.trim().is_empty() {
        return Err(SaveError::InvalidArgument("fileName is empty".to_string()));
    }

    Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| {
            SaveError::InvalidArgument(format!("fileName has no usable name: {file_name}"))
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_arguments() {
        let err = SaveRequest::new(None, Some("a.txt")).unwrap_err();
        assert!(matches!(err, SaveError::InvalidArgument(ref m) if m == NULL_ARGUMENT_MESSAGE));

        let err = SaveRequest::new(Some(&b"abc"[..]), None).unwrap_err();
        assert!(matches!(err, SaveError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_file_name() {
        let err = SaveRequest::new(Some(&b"abc"[..]), Some("")).unwrap_err();
        assert!(matches!(err, SaveError::InvalidArgument(_)));

        let err = SaveRequest::new(Some(&b"abc"[..]), Some("   ")).unwrap_err();
        assert!(matches!(err, SaveError::InvalidArgument(_)));
    }

    #[test]
    fn test_surrounding_whitespace_kept() {
        let request = SaveRequest::new(Some(&b"x"[..]), Some(" a.txt ")).unwrap();
        assert_eq!(request.file_name(), " a.txt ");
    }

    #[test]
    fn test_empty_bytes_allowed() {
        let request = SaveRequest::new(Some(&b""[..]), Some("empty.txt")).unwrap();
        assert!(request.bytes().is_empty());
    }

    #[test]
    fn test_file_name_reduced_to_final_component() {
        let request = SaveRequest::new(Some(&b"x"[..]), Some("../../etc/passwd.txt")).unwrap();
        assert_eq!(request.file_name(), "passwd.txt");

        let request = SaveRequest::new(Some(&b"x"[..]), Some("exports/q3.pdf")).unwrap();
        assert_eq!(request.file_name(), "q3.pdf");
        assert_eq!(request.content_type(), "application/pdf");

        assert!(SaveRequest::new(Some(&b"x"[..]), Some("exports/ ")).is_err());
        assert!(SaveRequest::new(Some(&b"x"[..]), Some("..")).is_err());
        assert!(SaveRequest::new(Some(&b"x"[..]), Some("/")).is_err());
    }

    #[test]
    fn test_save_result_serializes_path() {
        let result = SaveResult {
            path: "/storage/Download/a.txt".to_string(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"path":"/storage/Download/a.txt"}"#);
    }
}
