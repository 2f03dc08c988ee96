use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use tracing::{debug, info};

use crate::classifier::diagnose;
use crate::error::{Result, ServiceError};
use crate::models::{HealthResponse, PredictionResponse};
use crate::preprocess::{self, format_dimensions};
use crate::routes::AppState;
use crate::storage::{content_type_for, generated_file_name, sanitize_file_name};

const INDEX_HTML: &str = include_str!("../static/index.html");
const SCRIPT_JS: &str = include_str!("../static/js/script.js");

/// The `image` field as it arrived.
struct ImageUpload {
    file_name: Option<String>,
    bytes: Vec<u8>,
}

async fn read_image_field(payload: &mut Multipart, limit: usize) -> Result<ImageUpload> {
    let mut upload = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let disposition = field.content_disposition();
        let is_image = disposition.get_name() == Some("image");
        let file_name = disposition.get_filename().map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if !is_image {
                continue;
            }
            if bytes.len() + data.len() > limit {
                return Err(ServiceError::PayloadTooLarge { limit });
            }
            bytes.extend_from_slice(&data);
        }

        if is_image && upload.is_none() {
            upload = Some(ImageUpload { file_name, bytes });
        }
    }

    upload.ok_or(ServiceError::MissingImage)
}

pub async fn predict(state: web::Data<AppState>, mut payload: Multipart) -> Result<HttpResponse> {
    let upload = read_image_field(&mut payload, state.max_upload_bytes).await?;
    debug!(
        file_name = ?upload.file_name,
        bytes = upload.bytes.len(),
        "image received"
    );

    let size = state.image_size;
    let bytes = upload.bytes;
    let (prepared, bytes) = web::block(move || {
        preprocess::prepare(&bytes, size).map(|prepared| (prepared, bytes))
    })
    .await??;

    let file_name = upload
        .file_name
        .as_deref()
        .and_then(sanitize_file_name)
        .unwrap_or_else(|| generated_file_name(prepared.format));

    let store = state.store.clone();
    let stored = web::block(move || store.save(&file_name, &bytes)).await??;

    let classifier = state.classifier.clone();
    let input = prepared.input;
    let score = web::block(move || classifier.score(input)).await??;
    let result = diagnose(score, state.threshold);

    info!(
        file_name = %stored.file_name,
        score,
        result = %result,
        "prediction complete"
    );

    Ok(HttpResponse::Ok().json(PredictionResponse {
        image_path: stored.public_path.clone(),
        file_name: stored.file_name.clone(),
        file_size: stored.size_kib(),
        dimensions: format_dimensions(prepared.width, prepared.height),
        result,
        confidence: f64::from(score),
    }))
}

pub async fn upload(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let file_name = path.into_inner();
    let content_type = content_type_for(&file_name);

    let store = state.store.clone();
    let bytes = web::block(move || store.read(&file_name)).await??;

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

pub async fn script() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(SCRIPT_JS)
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}
