//! Object storage for listing images.

mod firebase;

use std::path::Path;

use async_trait::async_trait;

pub use firebase::FirebaseStorage;

/// Upload ceiling enforced before any bytes leave the machine.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// An image picked by the user, held in memory until uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read an image from disk, guessing the content type from its extension.
    pub fn read(path: &Path) -> Result<Self, StorageError> {
        let bytes = std::fs::read(path).map_err(|source| StorageError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let content_type = content_type_for(&name);
        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .parse::<mime::Mime>()
            .map(|parsed| parsed.type_() == mime::IMAGE)
            .unwrap_or(false)
    }
}

fn content_type_for(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Object name used for an upload: millisecond timestamp followed by the
/// original file name.
pub fn object_name(file: &ImageFile, timestamp_millis: i64) -> String {
    format!("{timestamp_millis}{}", file.name)
}

/// Destination for listing images. Implementations return a public download
/// URL for each stored object.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, file: &ImageFile) -> Result<String, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{name} is {size} bytes; images are limited to 2 MB")]
    TooLarge { name: String, size: usize },
    #[error("{name} is not an image ({content_type})")]
    NotAnImage { name: String, content_type: String },
    #[error("unable to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("storage request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("storage rejected {name} with status {status}")]
    Rejected { name: String, status: u16 },
    #[error("storage response for {0} carried no download token")]
    MissingToken(String),
}

/// Size and type checks shared by every store.
pub fn check_upload(file: &ImageFile) -> Result<(), StorageError> {
    if !file.is_image() {
        return Err(StorageError::NotAnImage {
            name: file.name.clone(),
            content_type: file.content_type.clone(),
        });
    }
    if file.bytes.len() > MAX_IMAGE_BYTES {
        return Err(StorageError::TooLarge {
            name: file.name.clone(),
            size: file.bytes.len(),
        });
    }
    Ok(())
}
