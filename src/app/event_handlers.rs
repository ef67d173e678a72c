use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use super::{App, AppMessage, CatalogAction};
use crate::app::logging::log_user_interaction;
use crate::catalog::FilterMode;

/// Rows moved by the big scroll actions
const BIG_SCROLL_ROWS: usize = 10;

/// Trait for event handling
pub trait EventHandlers {
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()>;
    fn on_key_event(&mut self, key: KeyEvent);
    fn handle_action(&mut self, action: CatalogAction);
    fn quit(&mut self);
}

impl EventHandlers for App {
    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        match crossterm::event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
            Event::Resize(_, _) => self.dirty.mark_full_redraw(),
            _ => {}
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        if let Some(action) = self.lookup_key(key) {
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: CatalogAction) {
        self.status_message = None;

        match action {
            CatalogAction::ScrollUp => self.move_selection(-1),
            CatalogAction::ScrollDown => self.move_selection(1),
            CatalogAction::ScrollUpBig => self.move_selection(-(BIG_SCROLL_ROWS as isize)),
            CatalogAction::ScrollDownBig => self.move_selection(BIG_SCROLL_ROWS as isize),
            CatalogAction::GoToTop => self.select_index(0),
            CatalogAction::GoToBottom => {
                let len = self.engine.visible_items().len();
                self.select_index(len.saturating_sub(1));
            }
            CatalogAction::ToggleFavorite => self.toggle_selected_favorite(),
            CatalogAction::CycleFilter => {
                let next = self.engine.filter_mode().next();
                self.set_filter(next);
            }
            CatalogAction::FilterAll => self.set_filter(FilterMode::All),
            CatalogAction::FilterFavorites => self.set_filter(FilterMode::FavoritesOnly),
            CatalogAction::FilterUnfavorites => self.set_filter(FilterMode::NonFavoritesOnly),
            CatalogAction::Refresh => self.refresh(),
            CatalogAction::ClearImageCache => {
                log_user_interaction(action.name(), None);
                self.images.clear();
                // Rebinding re-requests the selected image
                self.bound_image_key = None;
                self.status_message = Some("Image cache cleared".to_string());
                self.dirty.mark_status();
            }
            CatalogAction::Quit => {
                log_user_interaction(action.name(), None);
                self.quit();
            }
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

impl App {
    fn lookup_key(&self, key: KeyEvent) -> Option<CatalogAction> {
        if let Some(action) = self.key_map.get(&(key.modifiers, key.code)) {
            return Some(*action);
        }

        // Some terminals report shifted letters without the SHIFT modifier
        if let KeyCode::Char(c) = key.code
            && c.is_ascii_uppercase()
            && !key.modifiers.contains(KeyModifiers::SHIFT)
        {
            return self
                .key_map
                .get(&(key.modifiers | KeyModifiers::SHIFT, key.code))
                .copied();
        }

        None
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.engine.visible_items().len();
        if len == 0 {
            return;
        }

        let current = self.list_state.selected().unwrap_or(0);
        let target = current.saturating_add_signed(delta).min(len - 1);
        self.select_index(target);
    }

    fn select_index(&mut self, index: usize) {
        let len = self.engine.visible_items().len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }

        let index = index.min(len - 1);
        if self.list_state.selected() != Some(index) {
            self.list_state.select(Some(index));
            self.dirty.mark_selection();
        }
        self.maybe_paginate();
    }

    /// Keep the selection inside the visible list after it changed under it
    pub(crate) fn clamp_selection(&mut self) {
        let len = self.engine.visible_items().len();
        let selected = match (len, self.list_state.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(idx)) => Some(idx.min(len - 1)),
        };

        if selected != self.list_state.selected() {
            self.list_state.select(selected);
            self.dirty.mark_selection();
        }
    }

    /// Request the next page when the selection is near the end of the list
    pub(crate) fn maybe_paginate(&mut self) {
        let Some(selected) = self.list_state.selected() else {
            return;
        };

        let len = self.engine.visible_items().len();
        if len.saturating_sub(selected + 1) > self.config.catalog.paginate_threshold {
            return;
        }

        let Some(ticket) = self.engine.request_page() else {
            return;
        };

        self.dirty.mark_status();
        let delay = Duration::from_millis(self.config.catalog.page_load_delay_ms);
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Ignore error if the main loop is gone
            let _ = tx.send(AppMessage::PageReady(ticket)).await;
        });
    }

    fn toggle_selected_favorite(&mut self) {
        let Some(item) = self
            .list_state
            .selected()
            .and_then(|idx| self.engine.visible_items().get(idx))
        else {
            return;
        };

        let id = item.id;
        let name = item.name.clone();
        self.engine.toggle_favorite(id);

        let state = if self.favorites.is_favorite(id) {
            "added to favorites"
        } else {
            "removed from favorites"
        };
        log_user_interaction(
            CatalogAction::ToggleFavorite.name(),
            Some(format!("{} {}", id, state).as_str()),
        );
        self.status_message = Some(format!("{} {}", name, state));

        self.clamp_selection();
    }

    fn set_filter(&mut self, mode: FilterMode) {
        log_user_interaction("filter", Some(mode.label()));
        self.engine.apply_filter(mode);

        let first = if self.engine.visible_items().is_empty() {
            None
        } else {
            Some(0)
        };
        self.list_state.select(first);
        *self.list_state.offset_mut() = 0;
        self.dirty.mark_selection();
    }

    /// Re-read the catalog source after the simulated page latency
    fn refresh(&mut self) {
        if self.refreshing {
            return;
        }
        log_user_interaction(
            CatalogAction::Refresh.name(),
            Some(self.source.to_string().as_str()),
        );

        self.refreshing = true;
        self.dirty.mark_status();
        self.spawn_catalog_load(Duration::from_millis(self.config.catalog.page_load_delay_ms));
    }

    /// Load the catalog source on a background task and report back after `delay`
    pub(crate) fn spawn_catalog_load(&self, delay: Duration) {
        let source = self.source.clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = tokio::task::spawn_blocking(move || source.load())
                .await
                .unwrap_or_else(|e| Err(color_eyre::eyre::eyre!("Catalog loader failed: {}", e)));
            let _ = tx.send(AppMessage::CatalogLoaded(result)).await;
        });
    }
}
