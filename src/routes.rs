use std::sync::Arc;

use actix_web::web;

use crate::classifier::Classifier;
use crate::config::Config;
use crate::handlers;
use crate::storage::UploadStore;

/// Public prefix uploads are served under.
pub const UPLOAD_PREFIX: &str = "static/uploads";

/// State shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub store: UploadStore,
    pub image_size: u32,
    pub threshold: f32,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &Config, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            store: UploadStore::new(&config.upload_dir, UPLOAD_PREFIX),
            image_size: config.image_size,
            threshold: config.threshold,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/health", web::get().to(handlers::health))
        .route("/static/js/script.js", web::get().to(handlers::script))
        .route(
            "/static/uploads/{file_name}",
            web::get().to(handlers::upload),
        )
        .service(web::resource("/predict").route(web::post().to(handlers::predict)));
}
