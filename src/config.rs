//! Application configuration loaded from environment variables.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server ===
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the exported ONNX classifier.
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Directory uploads are stored in and served from.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// Side length of the square model input.
    #[serde(default = "default_image_size")]
    pub image_size: u32,

    /// Scores above this are labelled "Stroke Detected".
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    // === Client ===
    /// Base URL `submit` posts to.
    #[serde(default = "default_predict_url")]
    pub predict_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_model_path() -> String {
    "model.onnx".to_string()
}

fn default_upload_dir() -> String {
    "static/uploads".to_string()
}

fn default_image_size() -> u32 {
    224
}

fn default_threshold() -> f32 {
    0.5
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_predict_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model_path: default_model_path(),
            upload_dir: default_upload_dir(),
            image_size: default_image_size(),
            threshold: default_threshold(),
            max_upload_bytes: default_max_upload_bytes(),
            predict_url: default_predict_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err("THRESHOLD must be between 0 and 1".to_string());
        }

        if self.image_size == 0 {
            return Err("IMAGE_SIZE must be positive".to_string());
        }

        if self.max_upload_bytes == 0 {
            return Err("MAX_UPLOAD_BYTES must be positive".to_string());
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
