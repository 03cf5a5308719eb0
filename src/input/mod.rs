//! Input processing module
//! Handles format detection and text extraction for resume documents

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use file_detector::DocumentFormat;
pub use manager::{DocumentLoader, RawDocument};
