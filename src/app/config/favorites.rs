use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::favorites::TomlFileBackend;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct FavoritesConfig {
    /// Custom favorites file (defaults to the platform data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl FavoritesConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(TomlFileBackend::default_path)
    }
}
