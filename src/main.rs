use clap::Parser;
use shopfront::app::cli::Args;
use shopfront::app::config::Config;
use shopfront::app::constructor::AppConstructor;
use shopfront::app::logging;
use shopfront::app::terminal::{init_terminal, restore_terminal};
use shopfront::app::{App, AppMainLoop};
use shopfront::catalog::CatalogSource;
use shopfront::favorites::FavoriteStore;
use shopfront::images::{HttpImageFetcher, ImageCache};
use std::sync::Arc;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Parse command line arguments
    let args = Args::parse();

    // Handle --generate-config option
    if let Some(path) = &args.generate_config {
        let config_path = if path.is_dir() || path.to_str() == Some(".") {
            path.join("config.toml")
        } else {
            path.clone()
        };
        Config::generate_default(&config_path)?;
        return Ok(());
    }

    // Determine config path for logging later
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };
    let config_existed = config_path.exists();

    // Load config first for logger initialization
    let (mut config, config_warnings) = Config::load(Some(config_path.clone()))?;

    if let Some(catalog) = &args.catalog {
        config.catalog.source = Some(catalog.clone());
    }
    if let Some(page_size) = args.page_size {
        config.catalog.page_size = page_size;
    }

    // Initialize logger first; the handle flushes on drop
    let _logger = if config.logging.enabled {
        logging::ensure_log_directory(&config.logging)?;
        let handle = logging::init_logger(&config.logging)?;
        logging::log_startup_info(&config.logging);
        logging::log_config_loading(&config_path, !config_existed);

        for warning in &config_warnings {
            log::warn!("{}", warning);
        }
        Some(handle)
    } else {
        None
    };

    // A broken catalog file should fail before the terminal is taken over
    let source = CatalogSource::new(config.catalog.source.clone(), config.catalog.item_count);
    if matches!(source, CatalogSource::File(_)) {
        source.load()?;
    }

    let fetcher =
        HttpImageFetcher::new(&config.images.user_agent, config.images.request_timeout())?;
    let images = ImageCache::new(Arc::new(fetcher), config.images.max_entries);

    let favorites = Arc::new(FavoriteStore::open(config.favorites.resolved_path()));

    let logging_enabled = config.logging.enabled;
    let mut app = App::new(config, favorites, images, source);
    app.config_warnings.extend(config_warnings);
    if !app.config_warnings.is_empty() {
        app.status_message = Some(format!(
            "{} config warning(s), see the log file",
            app.config_warnings.len()
        ));
    }

    // Initialize terminal
    let terminal = init_terminal()?;

    // Run application
    let result = app.run(terminal).await;

    // Log shutdown before restoring terminal
    if logging_enabled {
        logging::log_shutdown_info();
    }

    // Restore terminal
    restore_terminal()?;
    result
}
