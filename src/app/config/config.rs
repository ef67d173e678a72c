use crate::app::config::binds::BindsConfig;
use crate::app::config::catalog::CatalogConfig;
use crate::app::config::favorites::FavoritesConfig;
use crate::app::config::images::ImagesConfig;
use crate::app::config::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub favorites: FavoritesConfig,
    #[serde(default)]
    pub binds: BindsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Known top-level sections and the fields each accepts
const KNOWN_FIELDS: &[(&str, &[&str])] = &[
    (
        "catalog",
        &[
            "page_size",
            "item_count",
            "source",
            "initial_load_delay_ms",
            "page_load_delay_ms",
            "paginate_threshold",
        ],
    ),
    (
        "images",
        &[
            "max_entries",
            "request_timeout_secs",
            "user_agent",
            "prefetch_ahead",
            "prefetch_behind",
        ],
    ),
    ("favorites", &["path"]),
    (
        "binds",
        &[
            "scroll_up",
            "scroll_down",
            "scroll_up_big",
            "scroll_down_big",
            "go_to_top",
            "go_to_bottom",
            "toggle_favorite",
            "cycle_filter",
            "filter_all",
            "filter_favorites",
            "filter_unfavorites",
            "refresh",
            "clear_image_cache",
            "quit",
        ],
    ),
    (
        "logging",
        &[
            "enabled",
            "level",
            "log_to_console",
            "append_to_file",
            "rotate_logs",
            "rotation_size_mb",
            "keep_log_files",
            "custom_log_path",
        ],
    ),
];

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // Two rows instead of the full matrix
    let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;

        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_chars.len()]
}

/// Closest candidate within a reasonable edit distance
fn find_similar(unknown: &str, candidates: &[&str]) -> Option<String> {
    let unknown_lower = unknown.to_lowercase();

    candidates
        .iter()
        .map(|&candidate| {
            let distance = levenshtein_distance(&unknown_lower, &candidate.to_lowercase());
            (candidate, distance)
        })
        .filter(|&(candidate, distance)| {
            // At least 3 edits allowed, more for long names
            let max_len = unknown.len().max(candidate.len());
            distance <= (max_len / 2).max(3)
        })
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate.to_string())
}

/// Format an unknown config warning with optional "did you mean" suggestion
fn format_unknown_warning(section: Option<&str>, key: &str, suggestion: Option<&str>) -> String {
    match (section, suggestion) {
        (None, Some(s)) => format!("Unknown config section: [{}] (did you mean: [{}]?)", key, s),
        (None, None) => format!("Unknown config section: [{}]", key),
        (Some(section), Some(s)) => format!(
            "Unknown option in [{}]: {} (did you mean: {}?)",
            section, key, s
        ),
        (Some(section), None) => format!("Unknown option in [{}]: {}", section, key),
    }
}

impl Config {
    /// Returns the default config file path based on the platform:
    /// - Linux: ~/.config/shopfront/config.toml (XDG_CONFIG_HOME)
    /// - macOS: ~/Library/Application Support/shopfront/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\shopfront\config.toml
    pub fn default_config_path() -> color_eyre::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine config directory"))?;
        Ok(config_dir.join("shopfront").join("config.toml"))
    }

    /// Load the config, writing a default file if none exists.
    /// Returns the config plus warnings about unknown or unparseable content.
    pub fn load(config_path: Option<PathBuf>) -> color_eyre::Result<(Self, Vec<String>)> {
        let config_path = match config_path {
            Some(path) => path,
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            if let Some(parent) = config_path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }

            let default_config = Config::default();
            let toml_string = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_path, &toml_string)?;

            // Logger is not up yet; main logs the creation afterwards
            return Ok((default_config, Vec::new()));
        }

        let contents = std::fs::read_to_string(&config_path)?;
        Ok(Self::from_toml_str(&contents))
    }

    /// Parse config text, falling back to defaults when it does not parse
    pub fn from_toml_str(contents: &str) -> (Self, Vec<String>) {
        let mut warnings = Self::check_unknown_fields(contents);

        let config = toml::from_str(contents).unwrap_or_else(|e| {
            warnings.push(format!("Failed to parse config file, using defaults: {}", e));
            Config::default()
        });

        (config, warnings)
    }

    /// Check for unknown fields in the config file and return warnings
    fn check_unknown_fields(contents: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        // Let the main parser report syntax errors
        let Ok(table) = toml::from_str::<toml::Table>(contents) else {
            return warnings;
        };

        let section_names: Vec<&str> = KNOWN_FIELDS.iter().map(|(name, _)| *name).collect();

        for (key, value) in &table {
            let Some((section, fields)) = KNOWN_FIELDS
                .iter()
                .find(|(name, _)| *name == key.as_str())
            else {
                let suggestion = find_similar(key, &section_names);
                warnings.push(format_unknown_warning(None, key, suggestion.as_deref()));
                continue;
            };

            if let toml::Value::Table(entries) = value {
                for field in entries.keys() {
                    if !fields.contains(&field.as_str()) {
                        let suggestion = find_similar(field, fields);
                        warnings.push(format_unknown_warning(
                            Some(*section),
                            field,
                            suggestion.as_deref(),
                        ));
                    }
                }
            }
        }

        warnings
    }

    /// Generate a default config file at the specified path
    pub fn generate_default(path: &Path) -> color_eyre::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        if path.exists() {
            return Err(color_eyre::eyre::eyre!(
                "Config file already exists at: {}",
                path.display()
            ));
        }

        let toml_string = toml::to_string_pretty(&Config::default())?;
        std::fs::write(path, &toml_string)?;

        println!("Generated default config at: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("page_size", "page_size"), 0);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_find_similar() {
        let fields = ["page_size", "item_count", "source"];
        assert_eq!(find_similar("page_sise", &fields), Some("page_size".to_string()));
        assert_eq!(find_similar("completely_unrelated_name", &fields), None);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let (config, warnings) = Config::from_toml_str("");
        assert!(warnings.is_empty());
        assert_eq!(config.catalog.page_size, 20);
        assert_eq!(config.catalog.item_count, 120);
        assert_eq!(config.images.max_entries, 64);
        assert!(config.favorites.path.is_none());
    }

    #[test]
    fn test_partial_config() {
        let (config, warnings) = Config::from_toml_str(
            "[catalog]\npage_size = 5\n\n[images]\nmax_entries = 3\n",
        );
        assert!(warnings.is_empty());
        assert_eq!(config.catalog.page_size, 5);
        assert_eq!(config.catalog.paginate_threshold, 5);
        assert_eq!(config.images.max_entries, 3);
        assert_eq!(config.images.prefetch_ahead, 3);
    }

    #[test]
    fn test_unknown_fields_are_reported() {
        let (_, warnings) =
            Config::from_toml_str("[catalgo]\nx = 1\n\n[catalog]\npage_sise = 4\n");
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("did you mean: [catalog]?")));
        assert!(warnings.iter().any(|w| w.contains("did you mean: page_size?")));
    }

    #[test]
    fn test_unparseable_config_falls_back() {
        let (config, warnings) = Config::from_toml_str("[catalog]\npage_size = \"many\"\n");
        assert_eq!(config.catalog.page_size, 20);
        assert!(warnings.iter().any(|w| w.contains("Failed to parse")));
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let (config, _) = Config::from_toml_str("[catalog]\npage_size = 0\n");
        assert_eq!(config.catalog.page_size().get(), 20);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopfront").join("config.toml");

        let (config, warnings) = Config::load(Some(path.clone())).unwrap();
        assert!(warnings.is_empty());
        assert!(path.exists());
        assert_eq!(config.catalog.page_size, 20);

        // A second load reads the generated file back without warnings
        let (_, warnings) = Config::load(Some(path)).unwrap();
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_generate_default_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::generate_default(&path).unwrap();
        assert!(Config::generate_default(&path).is_err());
    }
}
