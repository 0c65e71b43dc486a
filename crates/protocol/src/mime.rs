use std::path::Path;

/// Fallback content type for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detects the MIME type of a document from its file name extension.
pub fn detect_mime_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("txt") => "text/plain",
        Some("md" | "markdown" | "mdx") => "text/markdown",
        Some("csv") => "text/csv",
        Some("htm" | "html") => "text/html",
        Some("xml") => "application/xml",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("ppt") => "application/vnd.ms-powerpoint",
        Some("pptx") => {
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        }
        Some("epub") => "application/epub+zip",
        Some("eml") => "message/rfc822",
        Some("sketch") => "application/sketch",
        _ => OCTET_STREAM,
    }
}

/// Returns the extension of a file name, without the dot.
///
/// Mirrors how the upload list labels files: the text after the last `.`,
/// or the whole name when there is none.
pub fn file_extension(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
