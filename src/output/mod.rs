//! Report structures and output formatting module

pub mod formatter;
pub mod report;
