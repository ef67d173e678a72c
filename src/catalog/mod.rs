pub mod engine;
pub mod filter;
pub mod item;
pub mod source;

pub use engine::{CatalogListEngine, DEFAULT_PAGE_SIZE, PageTicket};
pub use filter::FilterMode;
pub use item::{
    DEFAULT_MOCK_ITEM_COUNT, Item, ItemId, load_catalog_file, mock_catalog, parse_catalog,
};
pub use source::CatalogSource;
