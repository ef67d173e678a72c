use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stable identifier of a catalog item
pub type ItemId = i64;

/// Number of items produced by the built-in mock catalog
pub const DEFAULT_MOCK_ITEM_COUNT: usize = 120;

/// A catalog product record. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// URL of the product image, also used as the image cache key
    pub image_key: String,
    pub price: String,
}

impl Item {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        image_key: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            image_key: image_key.into(),
            price: price.into(),
        }
    }

    /// Price formatted for display
    pub fn display_price(&self) -> String {
        format!("${}", self.price)
    }
}

/// On-disk catalog format: a list of `[[items]]` tables
#[derive(Debug, Default, Deserialize, Serialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<Item>,
}

/// Generate the built-in demo catalog with ids `1..=count`
pub fn mock_catalog(count: usize) -> Vec<Item> {
    (1..=count as ItemId)
        .map(|id| {
            Item::new(
                id,
                format!("Lace-up Running Shoes {}", id),
                format!("https://picsum.photos/seed/shopfront-{}/300/400", id),
                (id + 5).to_string(),
            )
        })
        .collect()
}

/// Parse a TOML catalog document
pub fn parse_catalog(contents: &str) -> color_eyre::Result<Vec<Item>> {
    let file: CatalogFile = toml::from_str(contents)?;
    Ok(file.items)
}

/// Read a TOML catalog file from disk
pub fn load_catalog_file(path: &Path) -> color_eyre::Result<Vec<Item>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        color_eyre::eyre::eyre!("Failed to read catalog file {}: {}", path.display(), e)
    })?;
    let items = parse_catalog(&contents)?;
    log::info!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}
