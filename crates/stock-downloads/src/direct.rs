//! Direct writes into the public Downloads directory

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use crate::request::{SaveRequest, SaveResult};
use crate::strategy::{StorageCapability, StorageStrategy};
use crate::Result;

pub struct DirectPath {
    downloads_dir: PathBuf,
}

impl DirectPath {
    pub fn new(downloads_dir: PathBuf) -> Self {
        Self { downloads_dir }
    }
}

fn write_all(mut file: File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes)?;
    file.flush()
}

impl StorageStrategy for DirectPath {
    fn capability(&self) -> StorageCapability {
        StorageCapability::DirectPath
    }

    fn save(&self, request: &SaveRequest<'_>) -> Result<SaveResult> {
        fs::create_dir_all(&self.downloads_dir)?;
        let target = self.downloads_dir.join(request.file_name());

        // A file we could not open was never touched and stays as it was.
        let file = File::create(&target)?;
        if let Err(e) = write_all(file, request.bytes()) {
            // Truncated by us, so don't leave it half written
            let _ = fs::remove_file(&target);
            return Err(e.into());
        }

        let path = std::path::absolute(&target)?
            .to_string_lossy()
            .to_string();

        tracing::info!(
            file_name = request.file_name(),
            path = %path,
            "Saved file to Downloads"
        );

        Ok(SaveResult { path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn request<'a>(bytes: &'a [u8], file_name: &'a str) -> SaveRequest<'a> {
        SaveRequest::new(Some(bytes), Some(file_name)).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = DirectPath::new(dir.path().join("Download"));

        let result = strategy.save(&request(b"%PDF-1.7", "statement.pdf")).unwrap();

        assert!(Path::new(&result.path).is_absolute());
        assert!(result.path.ends_with("statement.pdf"));
        assert_eq!(fs::read(&result.path).unwrap(), b"%PDF-1.7");
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = DirectPath::new(dir.path().to_path_buf());

        strategy.save(&request(b"first version", "a.txt")).unwrap();
        let result = strategy.save(&request(b"v2", "a.txt")).unwrap();

        assert_eq!(fs::read(&result.path).unwrap(), b"v2");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_unwritable_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"").unwrap();

        let strategy = DirectPath::new(blocker.join("Download"));
        let err = strategy.save(&request(b"x", "a.txt")).unwrap_err();

        assert_eq!(err.code(), crate::SAVE_ERROR);
    }

    #[test]
    fn test_failed_open_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("keep.txt");
        fs::write(&existing, b"precious").unwrap();
        let mut permissions = fs::metadata(&existing).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&existing, permissions).unwrap();

        let strategy = DirectPath::new(dir.path().to_path_buf());
        match strategy.save(&request(b"replacement", "keep.txt")) {
            // Privileged users can still open read-only files
            Ok(result) => assert_eq!(fs::read(&result.path).unwrap(), b"replacement"),
            Err(err) => {
                assert_eq!(err.code(), crate::SAVE_ERROR);
                assert_eq!(fs::read(&existing).unwrap(), b"precious");
            }
        }

        let mut permissions = fs::metadata(&existing).unwrap().permissions();
        permissions.set_readonly(false);
        fs::set_permissions(&existing, permissions).unwrap();
    }

    #[test]
    fn test_failed_open_on_directory_target_removes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let occupied = dir.path().join("report.pdf");
        fs::create_dir(&occupied).unwrap();
        fs::write(occupied.join("inside.txt"), b"inner").unwrap();

        let strategy = DirectPath::new(dir.path().to_path_buf());
        let err = strategy.save(&request(b"%PDF", "report.pdf")).unwrap_err();

        assert_eq!(err.code(), crate::SAVE_ERROR);
        assert_eq!(fs::read(occupied.join("inside.txt")).unwrap(), b"inner");
    }
}
