pub mod config;
pub mod error;
pub mod types;

pub use config::DraftConfig;
pub use error::{DraftError, Result};
