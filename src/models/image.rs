use crate::error::{Result, VariationError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Image picked by the user; replaced wholesale on the next selection.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

impl UploadedImage {
    pub fn new(
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Result<Self> {
        let mime_type = mime_type.into();
        if !mime_type.starts_with("image/") {
            return Err(VariationError::InvalidImage(
                "Please select a valid image file".into(),
            ));
        }

        Ok(Self {
            bytes,
            mime_type,
            filename: filename.into(),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mime_type = mime_for_path(path).ok_or_else(|| {
            VariationError::InvalidImage(format!(
                "{} is not a supported image file",
                path.display()
            ))
        })?;
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Self::new(bytes, mime_type, filename)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Guess an image MIME type from the file extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

/// One generated image together with the prompt that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationResult {
    pub image: Vec<u8>,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationOptions {
    pub preserve_colors: bool,
    pub preserve_composition: bool,
}

impl VariationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preserve_colors(mut self, enabled: bool) -> Self {
        self.preserve_colors = enabled;
        self
    }

    pub fn with_preserve_composition(mut self, enabled: bool) -> Self {
        self.preserve_composition = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_image_mime() {
        let err = UploadedImage::new(vec![1, 2, 3], "application/pdf", "doc.pdf").unwrap_err();
        assert!(matches!(err, VariationError::InvalidImage(_)));
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for_path(Path::new("a/b/Photo.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("x.png")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn loads_from_disk() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cat.webp");
        std::fs::write(&path, b"RIFF0000WEBP").unwrap();

        let image = UploadedImage::from_path(&path).unwrap();
        assert_eq!(image.mime_type, "image/webp");
        assert_eq!(image.filename, "cat.webp");
        assert_eq!(image.bytes, b"RIFF0000WEBP");
        assert!(!image.is_empty());
    }

    #[test]
    fn rejects_unknown_extension_before_reading() {
        let err = UploadedImage::from_path("/definitely/missing/file.svgz").unwrap_err();
        assert!(matches!(err, VariationError::InvalidImage(_)));
    }
}
