use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::catalog::{DEFAULT_MOCK_ITEM_COUNT, DEFAULT_PAGE_SIZE};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogConfig {
    /// Items shown per page under the "All" filter
    #[serde(default = "CatalogConfig::default_page_size")]
    pub page_size: usize,
    /// Size of the built-in demo catalog when no source file is set
    #[serde(default = "CatalogConfig::default_item_count")]
    pub item_count: usize,
    /// TOML catalog file with [[items]] tables (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Simulated latency of the first catalog load
    #[serde(default = "CatalogConfig::default_initial_load_delay_ms")]
    pub initial_load_delay_ms: u64,
    /// Simulated latency of each additional page
    #[serde(default = "CatalogConfig::default_page_load_delay_ms")]
    pub page_load_delay_ms: u64,
    /// Request the next page when the selection is this close to the end
    #[serde(default = "CatalogConfig::default_paginate_threshold")]
    pub paginate_threshold: usize,
}

impl CatalogConfig {
    fn default_page_size() -> usize {
        DEFAULT_PAGE_SIZE.get()
    }

    fn default_item_count() -> usize {
        DEFAULT_MOCK_ITEM_COUNT
    }

    fn default_initial_load_delay_ms() -> u64 {
        2000
    }

    fn default_page_load_delay_ms() -> u64 {
        300
    }

    fn default_paginate_threshold() -> usize {
        5
    }

    /// Page size as a validated positive number
    pub fn page_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.page_size).unwrap_or_else(|| {
            log::warn!(
                "catalog.page_size must be positive, using {}",
                DEFAULT_PAGE_SIZE
            );
            DEFAULT_PAGE_SIZE
        })
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
            item_count: Self::default_item_count(),
            source: None,
            initial_load_delay_ms: Self::default_initial_load_delay_ms(),
            page_load_delay_ms: Self::default_page_load_delay_ms(),
            paginate_threshold: Self::default_paginate_threshold(),
        }
    }
}
