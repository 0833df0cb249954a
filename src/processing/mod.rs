//! Text processing, ranking, and prediction module

pub mod bulk;
pub mod classifier;
pub mod resume;
pub mod similarity;
pub mod text_processor;
pub mod tfidf;
pub mod trainer;
