mod config;
mod store;

pub use config::{Config, LoggingConfig, RewardsConfig, StorageConfig};
pub use store::{JsonFileStore, KvStore, MemoryStore};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the StudyQuest data directory, creating it if needed.
///
/// `STUDYQUEST_DATA_DIR` wins when set. Otherwise this is
/// `~/.config/studyquest[-dev]/` based on STUDYQUEST_ENV; set
/// STUDYQUEST_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("STUDYQUEST_DATA_DIR") {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("STUDYQUEST_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("studyquest-dev")
            } else {
                base_dir.join("studyquest")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
