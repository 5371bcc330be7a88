pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::TempoConfig;
pub use error::{Result, TempoError};
pub use types::*;
