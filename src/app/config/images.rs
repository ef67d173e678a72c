use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::images::DEFAULT_MAX_ENTRIES;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ImagesConfig {
    /// Maximum number of decoded images kept in memory
    #[serde(default = "ImagesConfig::default_max_entries")]
    pub max_entries: usize,
    /// Timeout for a single image download
    #[serde(default = "ImagesConfig::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "ImagesConfig::default_user_agent")]
    pub user_agent: String,
    /// Rows after the selection whose images are fetched ahead of time
    #[serde(default = "ImagesConfig::default_prefetch_ahead")]
    pub prefetch_ahead: usize,
    /// Rows before the selection whose images are fetched ahead of time
    #[serde(default = "ImagesConfig::default_prefetch_behind")]
    pub prefetch_behind: usize,
}

impl ImagesConfig {
    fn default_max_entries() -> usize {
        DEFAULT_MAX_ENTRIES
    }

    fn default_request_timeout_secs() -> u64 {
        15
    }

    fn default_user_agent() -> String {
        format!("shopfront/{}", env!("CARGO_PKG_VERSION"))
    }

    fn default_prefetch_ahead() -> usize {
        3
    }

    fn default_prefetch_behind() -> usize {
        1
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_entries: Self::default_max_entries(),
            request_timeout_secs: Self::default_request_timeout_secs(),
            user_agent: Self::default_user_agent(),
            prefetch_ahead: Self::default_prefetch_ahead(),
            prefetch_behind: Self::default_prefetch_behind(),
        }
    }
}
