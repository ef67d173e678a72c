use std::fmt;
use std::path::PathBuf;

use super::item::{Item, load_catalog_file, mock_catalog};

/// Where the catalog screen gets its items from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Generated demo items `1..=count`
    Mock { count: usize },
    /// A TOML file with `[[items]]` tables, re-read on every load
    File(PathBuf),
}

impl CatalogSource {
    /// A configured file wins over the demo catalog
    pub fn new(file: Option<PathBuf>, mock_count: usize) -> Self {
        match file {
            Some(path) => CatalogSource::File(path),
            None => CatalogSource::Mock { count: mock_count },
        }
    }

    pub fn load(&self) -> color_eyre::Result<Vec<Item>> {
        match self {
            CatalogSource::Mock { count } => Ok(mock_catalog(*count)),
            CatalogSource::File(path) => load_catalog_file(path),
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Mock { count } => write!(f, "demo catalog ({} items)", count),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}
