//! Input processing module
//! Handles file detection, resume text extraction, and input management

pub mod file_detector;
pub mod manager;
pub mod text_extractor;
