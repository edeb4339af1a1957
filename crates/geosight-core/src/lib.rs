//! Geosight Core Library
//!
//! Image intake, the Gemini analysis client, coordinate sanitization and
//! the session state machine shared by the CLI and the web front end.

pub mod analysis;
pub mod config;
pub mod error;
pub mod intake;
pub mod session;

pub use analysis::{AnalysisRequest, AnalysisResult, GeminiClient, LocationAnalyzer};
pub use config::GeminiConfig;
pub use error::{GeoError, GeoResult};
pub use intake::{select_image, ImageFile, SelectedImage};
pub use session::{AnalysisStatus, Session, SessionEvent};
