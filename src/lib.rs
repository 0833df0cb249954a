//! Career compass library
//!
//! TF-IDF career matching over a built-in career catalog: interest-based
//! suggestion ranking, a trainable logistic-regression career classifier,
//! resume alignment scoring, and bulk CSV prediction.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{CareerCompassError, Result};
