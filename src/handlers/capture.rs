use base64::{engine::general_purpose, Engine};
use std::path::{Path, PathBuf};

use crate::errors::CaptureError;

/// A user-selected file and the content type it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub path: PathBuf,
    pub content_type: String,
}

impl ImageFile {
    /// Content type is taken from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let content_type = content_type_for(&path).to_string();
        Self { path, content_type }
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("bmp") => "image/bmp",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Read `file` and encode it as a `data:<mime>;base64,...` string.
///
/// Non-image files are rejected before anything is read. Bytes are passed
/// through untouched: no resizing, no re-encoding.
pub async fn encode_file(file: &ImageFile) -> Result<String, CaptureError> {
    if !file.is_image() {
        log::warn!(
            "🚫 Rejected non-image file {} ({})",
            file.path.display(),
            file.content_type
        );
        return Err(CaptureError::InvalidInputType {
            content_type: file.content_type.clone(),
        });
    }

    let bytes = tokio::fs::read(&file.path)
        .await
        .map_err(|source| CaptureError::ReadFailed {
            path: file.path.clone(),
            source,
        })?;

    log::debug!("📊 Image file size: {} bytes", bytes.len());
    Ok(to_data_url(&file.content_type, &bytes))
}

pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::split_data_url;
    use std::io::Write;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type_for(Path::new("lunch.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("a/b/dinner.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("menu.pdf")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_encode_round_trip() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let mut tmp = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        tmp.write_all(&bytes).unwrap();

        let encoded = encode_file(&ImageFile::from_path(tmp.path())).await.unwrap();
        assert!(encoded.starts_with("data:image/jpeg;base64,"));

        let (mime, payload) = split_data_url(&encoded);
        assert_eq!(mime, Some("image/jpeg"));
        assert_eq!(general_purpose::STANDARD.decode(payload).unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_non_image_rejected_without_reading() {
        // The path does not exist: a read attempt would yield ReadFailed instead.
        let file = ImageFile {
            path: PathBuf::from("/nonexistent/notes.txt"),
            content_type: "text/plain".to_string(),
        };

        match encode_file(&file).await {
            Err(CaptureError::InvalidInputType { content_type }) => {
                assert_eq!(content_type, "text/plain")
            }
            other => panic!("expected InvalidInputType, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_read_failure() {
        let file = ImageFile::from_path("/nonexistent/dir/photo.png");
        assert!(matches!(
            encode_file(&file).await,
            Err(CaptureError::ReadFailed { .. })
        ));
    }
}
