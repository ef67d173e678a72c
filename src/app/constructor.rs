use super::{App, AppMessage};
use crate::app::config::Config;
use crate::app::ui::{DirtyFlags, Protocol};
use crate::catalog::{CatalogListEngine, CatalogSource};
use crate::favorites::FavoriteStore;
use crate::images::ImageCache;
use ratatui::widgets::ListState;
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Capacity of the channel background tasks report back on
const MESSAGE_CHANNEL_CAPACITY: usize = 64;

/// Trait for App construction
pub trait AppConstructor {
    fn new(
        config: Config,
        favorites: Arc<FavoriteStore>,
        images: ImageCache,
        source: CatalogSource,
    ) -> Self
    where
        Self: Sized;
}

impl AppConstructor for App {
    /// Construct a new instance of [`App`]. The catalog itself arrives later
    /// through the main loop.
    fn new(
        config: Config,
        favorites: Arc<FavoriteStore>,
        images: ImageCache,
        source: CatalogSource,
    ) -> Self {
        let dirty = Rc::new(DirtyFlags::new());

        let mut engine = CatalogListEngine::new(Arc::clone(&favorites), config.catalog.page_size());
        let observer_flags = Rc::clone(&dirty);
        engine.set_on_update(move || {
            observer_flags.mark_list();
            observer_flags.mark_status();
        });

        let (key_map, bind_warnings) = config.binds.build_key_map();
        for warning in &bind_warnings {
            log::warn!("{}", warning);
        }

        let (message_tx, message_rx) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);

        Self {
            running: false,
            config,
            config_warnings: bind_warnings,
            engine,
            favorites,
            images,
            source,
            catalog_loaded: false,
            refreshing: false,
            list_state: ListState::default(),
            key_map,
            dirty,
            status_message: None,
            protocol: Protocol { image: None },
            bound_image_key: None,
            image_failed: false,
            message_tx,
            message_rx: Some(message_rx),
        }
    }
}

impl App {
    /// Hand the message receiver to the main loop. Only the first call gets it.
    pub(crate) fn take_message_rx(&mut self) -> Option<mpsc::Receiver<AppMessage>> {
        self.message_rx.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock_catalog;
    use crate::images::{FetchError, ImageFetcher};
    use futures::FutureExt;
    use futures::future::BoxFuture;

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

    #[test]
    fn test_engine_observer_marks_list_dirty() {
        let images = ImageCache::new(Arc::new(NoImages), 4);
        let mut app = App::new(
            Config::default(),
            Arc::new(FavoriteStore::in_memory()),
            images,
            CatalogSource::Mock { count: 5 },
        );
        app.dirty.clear_all();

        app.engine.load(mock_catalog(5));
        assert!(app.dirty.any_dirty());
        assert!(!app.catalog_loaded);
        assert!(app.take_message_rx().is_some());
        assert!(app.take_message_rx().is_none());
    }
}
