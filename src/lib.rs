//! Resume tailor library

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod input;
pub mod job_types;
pub mod output;
pub mod processing;
pub mod workflow;

pub use config::Config;
pub use error::{Result, ResumeTailorError};
