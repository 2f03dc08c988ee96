use serde::{Deserialize, Serialize};

/// Label attached to a scored scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    #[serde(rename = "Stroke Detected")]
    StrokeDetected,
    #[serde(rename = "No Stroke Detected")]
    NoStrokeDetected,
}

impl Diagnosis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Diagnosis::StrokeDetected => "Stroke Detected",
            Diagnosis::NoStrokeDetected => "No Stroke Detected",
        }
    }
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body returned by `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Public path of the stored upload, without a leading slash.
    pub image_path: String,
    pub file_name: String,
    /// Size in KiB, rounded to two decimals.
    pub file_size: f64,
    /// `"<width> × <height>"`.
    pub dimensions: String,
    pub result: Diagnosis,
    /// Raw model score in [0, 1].
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
