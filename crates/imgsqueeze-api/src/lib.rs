//! Imgsqueeze API library
//!
//! HTTP handlers, multipart extraction, error rendering and application setup.

pub mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
