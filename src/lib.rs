//! Brain scan stroke screening service and its upload client.
//!
//! - [`config`]: configuration from the environment
//! - [`error`]: server and client error types
//! - [`models`]: the `/predict` wire contract
//! - [`preprocess`]: image decoding and tensor preparation
//! - [`classifier`]: ONNX model wrapper
//! - [`storage`]: upload directory management
//! - [`handlers`] / [`routes`]: the actix-web surface
//! - [`client`] / [`render`]: submitting an image and displaying the result

pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod preprocess;
pub mod render;
pub mod routes;
pub mod storage;

pub use config::Config;
pub use error::{ClientError, ServiceError};
