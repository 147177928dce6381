//! MIME type detection by file extension.

use std::path::Path;

/// Charset suffix appended to every static file content type.
pub const CHARSET_SUFFIX: &str = "; charset=utf-8";

/// Fallback for unknown or missing extensions.
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Bare MIME type for an extension, matched case-insensitively.
pub fn mime_for_extension(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return DEFAULT_MIME;
    };

    match ext.to_ascii_lowercase().as_str() {
        // Text
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "xml" => "application/xml",

        // Scripts and data
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "map" => "application/json",
        "webmanifest" => "application/manifest+json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/vnd.microsoft.icon",
        "webp" => "image/webp",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",

        _ => DEFAULT_MIME,
    }
}

/// Full `Content-Type` header value for a file path.
///
/// The charset suffix is appended unconditionally, binary types included.
pub fn content_type_for(path: &Path) -> String {
    let ext = path.extension().and_then(|e| e.to_str());
    format!("{}{}", mime_for_extension(ext), CHARSET_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(mime_for_extension(Some("html")), "text/html");
        assert_eq!(mime_for_extension(Some("css")), "text/css");
        assert_eq!(mime_for_extension(Some("js")), "text/javascript");
        assert_eq!(mime_for_extension(Some("json")), "application/json");
        assert_eq!(mime_for_extension(Some("PNG")), "image/png");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(mime_for_extension(Some("xyz")), DEFAULT_MIME);
        assert_eq!(mime_for_extension(None), DEFAULT_MIME);
    }

    #[test]
    fn test_content_type_has_charset() {
        assert_eq!(content_type_for(Path::new("app.js")), "text/javascript; charset=utf-8");
        assert_eq!(content_type_for(Path::new("logo.png")), "image/png; charset=utf-8");
        assert_eq!(
            content_type_for(Path::new("LICENSE")),
            "application/octet-stream; charset=utf-8"
        );
    }
}
