//! Turns selected files into image payloads for ingestion.

use std::fs;
use std::path::Path;

use crate::errors::CaptureError;
use crate::session::ImageData;

/// MIME type for a supported image extension
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Read an image file, rejecting unknown types and empty files
pub fn load_image(path: &Path) -> Result<ImageData, CaptureError> {
    let mime_type = mime_for_path(path)
        .ok_or_else(|| CaptureError::UnsupportedType(path.display().to_string()))?;

    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Err(CaptureError::EmptyFile(path.display().to_string()));
    }

    Ok(ImageData::new(bytes, mime_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_mime_detection() {
        assert_eq!(mime_for_path(&PathBuf::from("a/shoe.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for_path(&PathBuf::from("mug.webp")), Some("image/webp"));
        assert_eq!(mime_for_path(&PathBuf::from("notes.txt")), None);
        assert_eq!(mime_for_path(&PathBuf::from("no_extension")), None);
    }

    #[test]
    fn test_load_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bag.png");
        fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let image = load_image(&path).unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.bytes(), &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_load_image_rejections() {
        let dir = tempdir().unwrap();

        let text = dir.path().join("readme.txt");
        fs::write(&text, "hi").unwrap();
        assert!(matches!(load_image(&text), Err(CaptureError::UnsupportedType(_))));

        let empty = dir.path().join("empty.jpg");
        fs::write(&empty, b"").unwrap();
        assert!(matches!(load_image(&empty), Err(CaptureError::EmptyFile(_))));

        let missing = dir.path().join("missing.png");
        assert!(matches!(load_image(&missing), Err(CaptureError::IoError(_))));
    }
}
