//! Upload directory: stores submitted scans and serves them back for preview.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use image::ImageFormat;
use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, ServiceError};

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_prefix: String,
}

/// Outcome of persisting one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpload {
    pub file_name: String,
    /// Path the file is reachable at, relative to the site root.
    pub public_path: String,
    pub size_bytes: u64,
}

impl StoredUpload {
    pub fn size_kib(&self) -> f64 {
        kib(self.size_bytes)
    }
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into().trim_matches('/').to_string(),
        }
    }

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Writes `bytes` under `file_name`, replacing any earlier upload of the same name.
    pub fn save(&self, file_name: &str, bytes: &[u8]) -> Result<StoredUpload> {
        let target = self.dir.join(file_name);

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.persist(&target).map_err(|e| ServiceError::Storage(e.error))?;

        let size_bytes = bytes.len() as u64;
        debug!(path = %target.display(), size_bytes, "upload stored");

        Ok(StoredUpload {
            file_name: file_name.to_string(),
            public_path: format!("{}/{}", self.public_prefix, file_name),
            size_bytes,
        })
    }

    pub fn read(&self, file_name: &str) -> Result<Vec<u8>> {
        let name = sanitize_file_name(file_name)
            .filter(|n| n == file_name)
            .ok_or_else(|| ServiceError::InvalidFileName(file_name.to_string()))?;

        match fs::read(self.dir.join(&name)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ServiceError::NotFound(name))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Longest name most filesystems accept for one path component.
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// Reduce a client-supplied name to a safe single path component.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => Some(c),
            ' ' => Some('_'),
            _ => None,
        })
        .collect();

    let (stem, ext) = match cleaned.rfind('.') {
        Some(i) => cleaned.split_at(i),
        None => (cleaned.as_str(), ""),
    };

    // Leading dots would make a hidden file.
    let stem = stem.trim_start_matches('.');
    if stem.is_empty() || ext.len() >= MAX_FILE_NAME_BYTES / 2 {
        return None;
    }

    // Cleaned names are ASCII, so byte slicing stays on char boundaries.
    let stem = &stem[..stem.len().min(MAX_FILE_NAME_BYTES - ext.len())];
    Some(format!("{}{}", stem, ext))
}

/// Name used when the client sent none we can keep.
pub fn generated_file_name(format: Option<ImageFormat>) -> String {
    let ext = format
        .and_then(|f| f.extensions_str().first().copied())
        .unwrap_or("img");
    format!("{}.{}", Uuid::new_v4(), ext)
}

pub fn kib(bytes: u64) -> f64 {
    (bytes as f64 / 1024.0 * 100.0).round() / 100.0
}

pub fn content_type_for(file_name: &str) -> &'static str {
    match ImageFormat::from_path(file_name) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Bmp) => "image/bmp",
        Ok(ImageFormat::Tiff) => "image/tiff",
        _ => "application/octet-stream",
    }
}
