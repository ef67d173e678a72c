pub mod binds;
pub mod catalog;
#[allow(clippy::module_inception)]
pub mod config;
pub mod favorites;
pub mod images;
pub mod logging;

pub use binds::BindsConfig;
pub use catalog::CatalogConfig;
pub use config::Config;
pub use favorites::FavoritesConfig;
pub use images::ImagesConfig;
pub use logging::LoggingConfig;
