//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::Array4;
use tempfile::TempDir;

use stroke_scan::classifier::Classifier;
use stroke_scan::routes::AppState;
use stroke_scan::{Config, ServiceError};

pub const BOUNDARY: &str = "----stroke-scan-boundary";

/// Classifier that always answers with the same score.
pub struct FixedScore {
    pub score: f32,
    pub size: usize,
}

impl Classifier for FixedScore {
    fn score(&self, input: Array4<f32>) -> Result<f32, ServiceError> {
        assert_eq!(input.shape(), &[1, self.size, self.size, 3]);
        Ok(self.score)
    }
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// State backed by a fresh upload directory and a fixed-score model.
pub fn state(score: f32, max_upload_bytes: usize) -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        upload_dir: dir.path().to_string_lossy().into_owned(),
        image_size: 8,
        max_upload_bytes,
        ..Config::default()
    };
    let state = AppState::new(&config, Arc::new(FixedScore { score, size: 8 }));
    (state, dir)
}

pub fn content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// One field of a multipart body; `file_name` of `None` omits the filename parameter.
pub struct FormPart<'a> {
    pub field: &'a str,
    pub file_name: Option<&'a str>,
    pub bytes: &'a [u8],
}

pub fn multipart_parts(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        let disposition = match part.file_name {
            Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", part.field, name),
            None => format!("form-data; name=\"{}\"", part.field),
        };
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: {}\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, disposition
            )
            .as_bytes(),
        );
        body.extend_from_slice(part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_body(field: &str, file_name: Option<&str>, bytes: &[u8]) -> Vec<u8> {
    multipart_parts(&[FormPart {
        field,
        file_name,
        bytes,
    }])
}
