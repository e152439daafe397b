// Content-type guessing from a file extension. The server only accepts
// images, so the table is mostly image types plus a few common others so
// that non-images are reported by name rather than as unknown.

use std::path::Path;

const TABLE: &[(&str, &str)] = &[
    ("apng", "image/apng"),
    ("avif", "image/avif"),
    ("bmp", "image/bmp"),
    ("gif", "image/gif"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("ico", "image/x-icon"),
    ("jfif", "image/jpeg"),
    ("jpe", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("svgz", "image/svg+xml"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("webp", "image/webp"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("gz", "application/gzip"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("md", "text/markdown"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("pdf", "application/pdf"),
    ("txt", "text/plain"),
    ("wav", "audio/wav"),
    ("webm", "video/webm"),
    ("xml", "application/xml"),
    ("zip", "application/zip"),
];

/// Look up the content type for `path` by its extension, case-insensitively.
pub fn from_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    TABLE
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, content_type)| *content_type)
}

pub fn is_image(content_type: &str) -> bool {
    content_type.starts_with("image")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extensions_resolve() {
        assert_eq!(from_path(Path::new("a/b/cat.png")), Some("image/png"));
        assert_eq!(from_path(Path::new("photo.JPG")), Some("image/jpeg"));
        assert_eq!(from_path(Path::new("logo.svg")), Some("image/svg+xml"));
    }

    #[test]
    fn non_images_are_not_images() {
        let txt = from_path(Path::new("notes.txt")).unwrap();
        assert_eq!(txt, "text/plain");
        assert!(!is_image(txt));
    }

    #[test]
    fn unknown_or_missing_extension_is_none() {
        assert_eq!(from_path(Path::new("README")), None);
        assert_eq!(from_path(Path::new("archive.xyz")), None);
    }
}
