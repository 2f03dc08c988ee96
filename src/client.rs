//! Submits a scan to a running service, mirroring the browser upload form.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::ClientError;
use crate::models::{ErrorBody, PredictionResponse};
use crate::storage::content_type_for;

#[derive(Debug, Clone)]
pub struct PredictClient {
    http: reqwest::Client,
    base_url: String,
}

impl PredictClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(
            config.predict_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url)
    }

    /// Upload `file` as the `image` field of a multipart form and parse the verdict.
    #[instrument(skip(self))]
    pub async fn submit(&self, file: Option<&Path>) -> Result<PredictionResponse, ClientError> {
        let path = file.ok_or(ClientError::NoFileSelected)?;

        let bytes = read_file(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(content_type_for(&file_name))?;
        let form = Form::new().part("image", part);

        debug!(url = %self.predict_url(), file_name = %file_name, "submitting image");
        let response = self
            .http
            .post(self.predict_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>, ClientError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ClientError::Io {
            path: path.display().to_string(),
            source,
        })
}
