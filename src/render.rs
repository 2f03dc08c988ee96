//! Text shown to the user once a prediction comes back.

use crate::models::{Diagnosis, PredictionResponse};

pub const NO_FILE_MESSAGE: &str = "Please select a brain scan image.";
pub const RUNNING_MESSAGE: &str = "Running AI analysis...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Red,
    Green,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Where the stored upload can be fetched for preview.
    pub preview_src: String,
    pub details: String,
    pub diagnosis: String,
    pub tone: Tone,
}

impl Report {
    pub fn from_response(resp: &PredictionResponse) -> Self {
        let details = format!(
            "Input Image\nFile: {}\nSize: {} KB\nResolution: {}",
            resp.file_name, resp.file_size, resp.dimensions
        );

        let diagnosis = format!(
            "{}\nConfidence: {}%",
            resp.result,
            percent(resp.confidence)
        );

        let tone = match resp.result {
            Diagnosis::StrokeDetected => Tone::Red,
            Diagnosis::NoStrokeDetected => Tone::Green,
        };

        Self {
            preview_src: format!("/{}", resp.image_path),
            details,
            diagnosis,
            tone,
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.details)?;
        writeln!(f, "Preview: {}", self.preview_src)?;
        writeln!(f)?;
        write!(f, "{}", self.diagnosis)
    }
}

fn percent(confidence: f64) -> String {
    format!("{:.2}", confidence * 100.0)
}
