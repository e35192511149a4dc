//! Content-type hints derived from the file name

pub const OCTET_STREAM: &str = "application/octet-stream";

// Checked in order; `.xlsx` must precede `.xls`.
const CONTENT_TYPES: &[(&str, &str)] = &[
    (".json", "application/json"),
    (
        ".xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    (".xls", "application/vnd.ms-excel"),
    (".pdf", "application/pdf"),
    (".txt", "text/plain"),
];

/// Case-insensitive suffix match against the fixed table, first match wins.
pub fn content_type_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    CONTENT_TYPES
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
        .map(|(_, content_type)| *content_type)
        .unwrap_or(OCTET_STREAM)
}
