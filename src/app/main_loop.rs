use std::time::Duration;

use ratatui::DefaultTerminal;
use ratatui_image::picker::Picker;

use super::App;
use crate::app::event_handlers::EventHandlers;
use crate::catalog::{Item, PageTicket};
use crate::images::{FetchResult, prefetch_targets};

/// Font size assumed when the terminal cannot be queried
const FALLBACK_FONT_SIZE: (u16, u16) = (8, 16);

/// Results reported back to the main loop by background tasks
pub enum AppMessage {
    /// A catalog load (initial or refresh) finished
    CatalogLoaded(color_eyre::Result<Vec<Item>>),
    /// The simulated latency of a requested page elapsed
    PageReady(PageTicket),
    /// An image fetch for `key` finished
    ImageLoaded { key: String, result: FetchResult },
}

/// Trait for main application loop
pub trait AppMainLoop {
    async fn run(self, terminal: DefaultTerminal) -> color_eyre::Result<()>
    where
        Self: Sized;
}

impl AppMainLoop for App {
    /// Run the application's main loop.
    async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;

        let mut message_rx = self
            .take_message_rx()
            .ok_or_else(|| color_eyre::eyre::eyre!("Main loop is already running"))?;

        // Set up the image picker
        let mut picker = Picker::from_query_stdio().unwrap_or_else(|e| {
            log::warn!("Could not query terminal graphics support: {:?}", e);
            Picker::from_fontsize(FALLBACK_FONT_SIZE)
        });
        picker.set_background_color([0, 0, 0, 0]);

        // Initial catalog load, with simulated latency
        log::info!("Loading catalog from {}", self.source);
        self.spawn_catalog_load(Duration::from_millis(
            self.config.catalog.initial_load_delay_ms,
        ));

        // Set up signal handlers for graceful shutdown (Unix only)
        #[cfg(unix)]
        let mut sigint =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
        #[cfg(unix)]
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        log::info!("Entering event-driven main loop");

        while self.running {
            let size = terminal.size()?;
            self.dirty.check_terminal_size(size.width, size.height);

            self.bind_selected_image(&picker);

            // Only render when something changed
            if self.dirty.any_dirty() {
                if self.dirty.needs_full_redraw() {
                    terminal.clear()?;
                }
                terminal.draw(|frame| crate::app::ui::render(frame, &mut self))?;

                if let Some(ref mut img) = self.protocol.image
                    && let Some(Err(e)) = img.last_encoding_result()
                {
                    log::debug!("Image encoding failed: {:?}", e);
                }

                self.dirty.clear_all();
            }

            tokio::select! {
                // Keyboard events (with short timeout for responsive UI)
                _ = tokio::time::sleep(Duration::from_millis(10)) => {
                    if crossterm::event::poll(Duration::from_millis(0))? {
                        self.handle_crossterm_events()?;
                    }
                }

                // Background task results
                Some(msg) = message_rx.recv() => {
                    self.handle_message(msg, &picker);
                }
            }

            // Check for Unix signals outside of select! to avoid conditional compilation issues
            #[cfg(unix)]
            {
                use std::pin::Pin;
                use std::task::Poll;

                let waker = futures::task::noop_waker();
                let mut cx = std::task::Context::from_waker(&waker);

                if let Poll::Ready(Some(())) = Pin::new(&mut sigint).poll_recv(&mut cx) {
                    log::info!("Received SIGINT, shutting down gracefully");
                    self.quit();
                }

                if let Poll::Ready(Some(())) = Pin::new(&mut sigterm).poll_recv(&mut cx) {
                    log::info!("Received SIGTERM, shutting down gracefully");
                    self.quit();
                }
            }
        }

        log::info!("Exiting main loop");
        self.images.log_stats();

        Ok(())
    }
}

impl App {
    /// Apply a background task result to the screen state
    pub(crate) fn handle_message(&mut self, msg: AppMessage, picker: &Picker) {
        match msg {
            AppMessage::CatalogLoaded(result) => self.on_catalog_loaded(result),
            AppMessage::PageReady(ticket) => {
                if self.engine.complete_page(ticket) {
                    self.prefetch_neighbors();
                }
                self.dirty.mark_status();
            }
            AppMessage::ImageLoaded { key, result } => {
                // Only update if this is still the selected item's image
                if self.bound_image_key.as_deref() != Some(key.as_str()) {
                    log::trace!("Dropping stale image completion for {}", key);
                    return;
                }

                match result {
                    Ok(image) => {
                        self.protocol.image = Some(picker.new_resize_protocol((*image).clone()));
                        self.image_failed = false;
                        log::debug!("Image loaded for {}", key);
                    }
                    Err(e) => {
                        log::debug!("{}", e);
                        self.protocol.image = None;
                        self.image_failed = true;
                    }
                }
                self.dirty.mark_image();
            }
        }
    }

    fn on_catalog_loaded(&mut self, result: color_eyre::Result<Vec<Item>>) {
        let refreshed = self.catalog_loaded;
        self.catalog_loaded = true;
        self.refreshing = false;
        self.dirty.mark_status();

        let items = match result {
            Ok(items) => items,
            Err(e) => {
                log::error!("Failed to load catalog from {}: {:#}", self.source, e);
                self.status_message = Some(format!("Failed to load catalog: {}", e));
                // Keep what is already shown
                return;
            }
        };

        if refreshed {
            self.engine.load_with_filter(items, self.engine.filter_mode());
            self.status_message = Some("Catalog refreshed".to_string());
        } else {
            self.engine.load(items);
        }

        self.clamp_selection();
    }

    /// Point the image panel at the selected item, using the cache when possible
    pub(crate) fn bind_selected_image(&mut self, picker: &Picker) {
        let key = self
            .list_state
            .selected()
            .and_then(|idx| self.engine.visible_items().get(idx))
            .map(|item| item.image_key.clone());

        if key == self.bound_image_key {
            return;
        }

        self.bound_image_key = key.clone();
        self.protocol.image = None;
        self.image_failed = false;
        self.dirty.mark_image();

        let Some(key) = key else {
            return;
        };

        if let Some(image) = self.images.get_touch(&key) {
            log::trace!("Image cache hit for {}", key);
            self.protocol.image = Some(picker.new_resize_protocol((*image).clone()));
        } else {
            let fetch = self.images.fetch_and_cache(&key);
            let tx = self.message_tx.clone();
            tokio::spawn(async move {
                let result = fetch.await;
                // Send result back (ignore error if receiver dropped)
                let _ = tx.send(AppMessage::ImageLoaded { key, result }).await;
            });
        }

        self.prefetch_neighbors();
    }

    fn prefetch_neighbors(&self) {
        let targets = prefetch_targets(
            self.engine.visible_items(),
            self.list_state.selected(),
            self.config.images.prefetch_ahead,
            self.config.images.prefetch_behind,
        );
        self.images.prefetch(targets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::Config;
    use crate::app::constructor::AppConstructor;
    use crate::catalog::{CatalogSource, FilterMode, mock_catalog};
    use crate::favorites::FavoriteStore;
    use crate::images::{FetchError, ImageCache, ImageFetcher};
    use futures::FutureExt;
    use futures::future::BoxFuture;
    use std::sync::Arc;

    struct NoImages;

    impl ImageFetcher for NoImages {
        fn fetch(&self, key: &str) -> BoxFuture<'static, Result<Vec<u8>, FetchError>> {
            let key = key.to_string();
            async move {
                Err(FetchError::Network {
                    key,
                    reason: "offline".to_string(),
                })
            }
            .boxed()
        }
    }

    fn new_app() -> App {
        App::new(
            Config::default(),
            Arc::new(FavoriteStore::in_memory()),
            ImageCache::new(Arc::new(NoImages), 4),
            CatalogSource::Mock { count: 30 },
        )
    }

    fn picker() -> Picker {
        Picker::from_fontsize(FALLBACK_FONT_SIZE)
    }

    fn offline(key: &str) -> FetchResult {
        Err(FetchError::Network {
            key: key.to_string(),
            reason: "offline".to_string(),
        })
    }

    #[tokio::test]
    async fn test_initial_load_selects_first_row() {
        let mut app = new_app();
        app.handle_message(AppMessage::CatalogLoaded(Ok(mock_catalog(30))), &picker());

        assert!(app.catalog_loaded);
        assert_eq!(app.engine.visible_items().len(), 20);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[tokio::test]
    async fn test_refresh_keeps_filter() {
        let mut app = new_app();
        let picker = picker();
        app.handle_message(AppMessage::CatalogLoaded(Ok(mock_catalog(30))), &picker);
        app.engine.toggle_favorite(3);
        app.engine.apply_filter(FilterMode::FavoritesOnly);

        app.refreshing = true;
        app.handle_message(AppMessage::CatalogLoaded(Ok(mock_catalog(30))), &picker);
        assert!(!app.refreshing);
        assert_eq!(app.engine.filter_mode(), FilterMode::FavoritesOnly);
        assert_eq!(app.engine.visible_items().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_items() {
        let mut app = new_app();
        let picker = picker();
        app.handle_message(AppMessage::CatalogLoaded(Ok(mock_catalog(30))), &picker);
        app.handle_message(
            AppMessage::CatalogLoaded(Err(color_eyre::eyre::eyre!("gone"))),
            &picker,
        );

        assert_eq!(app.engine.all_items().len(), 30);
        assert!(app.status_message.as_deref().unwrap_or("").contains("gone"));
    }

    #[tokio::test]
    async fn test_stale_image_completion_is_dropped() {
        let mut app = new_app();
        let picker = picker();
        app.bound_image_key = Some("current".to_string());

        app.handle_message(
            AppMessage::ImageLoaded {
                key: "previous".to_string(),
                result: offline("previous"),
            },
            &picker,
        );
        assert!(!app.image_failed);

        app.handle_message(
            AppMessage::ImageLoaded {
                key: "current".to_string(),
                result: offline("current"),
            },
            &picker,
        );
        assert!(app.image_failed);
    }

    #[tokio::test]
    async fn test_stale_page_ticket_after_filter_change() {
        let mut app = new_app();
        let picker = picker();
        app.handle_message(AppMessage::CatalogLoaded(Ok(mock_catalog(30))), &picker);

        let ticket = app.engine.request_page().unwrap();
        app.engine.apply_filter(FilterMode::All);
        app.handle_message(AppMessage::PageReady(ticket), &picker);
        assert_eq!(app.engine.visible_items().len(), 20);
    }
}
