//! Paginated, filterable list state for the catalog screen.
//!
//! The engine owns the full item collection and derives the visible subset
//! from it. Every derivation starts again from `all_items`, the current
//! filter and the page cursor, so favorite toggles can interleave freely with
//! an outstanding page load.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use super::filter::FilterMode;
use super::item::{Item, ItemId};
use crate::favorites::FavoriteStore;

/// Items per page when nothing else is configured
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(20) {
    Some(size) => size,
    None => unreachable!(),
};

/// Handle for a page load started by [`CatalogListEngine::request_page`].
///
/// Completing a ticket consumes it. Only the ticket of the page currently in
/// flight is honored; a `load` or filter change invalidates it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a requested page stays in flight until the ticket is completed"]
pub struct PageTicket {
    sequence: u64,
}

/// Owns the list state and notifies a single observer after each settled change
pub struct CatalogListEngine {
    favorites: Arc<FavoriteStore>,
    all_items: Vec<Item>,
    filter_mode: FilterMode,
    visible_items: Vec<Item>,
    page_cursor: usize,
    page_size: NonZeroUsize,
    is_loading_page: bool,
    /// Sequence number handed to the last issued ticket
    last_ticket: u64,
    /// Ticket of the page in flight, if any
    outstanding_ticket: Option<u64>,
    on_update: Option<Box<dyn FnMut()>>,
}

impl CatalogListEngine {
    pub fn new(favorites: Arc<FavoriteStore>, page_size: NonZeroUsize) -> Self {
        Self {
            favorites,
            all_items: Vec::new(),
            filter_mode: FilterMode::All,
            visible_items: Vec::new(),
            page_cursor: 0,
            page_size,
            is_loading_page: false,
            last_ticket: 0,
            outstanding_ticket: None,
            on_update: None,
        }
    }

    /// Register the update observer, replacing any previous one
    pub fn set_on_update(&mut self, handler: impl FnMut() + 'static) {
        self.on_update = Some(Box::new(handler));
    }

    /// Replace the catalog and show its first page under the `All` filter
    pub fn load(&mut self, items: Vec<Item>) {
        self.load_with_filter(items, FilterMode::All);
    }

    /// Replace the catalog and show it under `mode`
    pub fn load_with_filter(&mut self, items: Vec<Item>, mode: FilterMode) {
        let received = items.len();
        let mut seen: HashSet<ItemId> = HashSet::with_capacity(received);
        self.all_items = items
            .into_iter()
            .filter(|item| seen.insert(item.id))
            .collect();

        let dropped = received - self.all_items.len();
        if dropped > 0 {
            log::warn!("Dropped {} items with duplicate ids", dropped);
        }

        log::info!(
            "Catalog loaded: {} items, filter {}",
            self.all_items.len(),
            mode
        );

        self.reset_to(mode);
        self.notify();
    }

    /// Append the next page if one is available.
    /// Returns whether anything was appended.
    pub fn paginate(&mut self) -> bool {
        match self.request_page() {
            Some(ticket) => self.complete_page(ticket),
            None => false,
        }
    }

    /// Start a page load. Returns `None` while another page is in flight,
    /// under a filter that is not paginated, or when every page is shown.
    pub fn request_page(&mut self) -> Option<PageTicket> {
        if self.is_loading_page {
            log::trace!("Page already in flight, ignoring request");
            return None;
        }
        if !self.has_more_pages() {
            return None;
        }

        self.last_ticket = self.last_ticket.wrapping_add(1);
        self.outstanding_ticket = Some(self.last_ticket);
        self.is_loading_page = true;
        log::debug!("Requesting page {}", self.page_cursor + 1);
        Some(PageTicket {
            sequence: self.last_ticket,
        })
    }

    /// Finish a page load started by [`request_page`](Self::request_page).
    /// Stale tickets are discarded. Returns whether anything was appended.
    pub fn complete_page(&mut self, ticket: PageTicket) -> bool {
        if !self.is_loading_page || self.outstanding_ticket != Some(ticket.sequence) {
            log::debug!(
                "Discarding stale page ticket {} (outstanding: {:?})",
                ticket.sequence,
                self.outstanding_ticket
            );
            return false;
        }

        self.is_loading_page = false;
        self.outstanding_ticket = None;
        if !self.has_more_pages() {
            return false;
        }

        let favorites = self.favorites.all_favorite_ids();
        let source = self.filter_mode.apply(&self.all_items, &favorites);
        let start = self.page_cursor * self.page_size.get();
        let end = (start + self.page_size.get()).min(source.len());

        self.visible_items
            .extend(source[start..end].iter().map(|item| (*item).clone()));
        self.page_cursor += 1;

        log::debug!(
            "Page {} materialized: {} visible of {}",
            self.page_cursor,
            self.visible_items.len(),
            source.len()
        );

        self.notify();
        true
    }

    /// Switch the active filter and rebuild the visible list from scratch
    pub fn apply_filter(&mut self, mode: FilterMode) {
        log::debug!("Applying filter {}", mode);
        self.reset_to(mode);
        self.notify();
    }

    /// Toggle favorite status and re-derive the visible list under the current filter
    pub fn toggle_favorite(&mut self, item_id: ItemId) {
        self.favorites.toggle_favorite(item_id);
        self.rederive();
        self.notify();
    }

    pub fn is_favorite(&self, item: &Item) -> bool {
        self.favorites.is_favorite(item.id)
    }

    pub fn visible_items(&self) -> &[Item] {
        &self.visible_items
    }

    pub fn all_items(&self) -> &[Item] {
        &self.all_items
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn page_cursor(&self) -> usize {
        self.page_cursor
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn is_loading_page(&self) -> bool {
        self.is_loading_page
    }

    /// Whether `paginate` would append anything under the current filter
    pub fn has_more_pages(&self) -> bool {
        if !self.filter_mode.is_paginated() {
            return false;
        }
        let favorites = self.favorites.all_favorite_ids();
        let total = self
            .all_items
            .iter()
            .filter(|item| self.filter_mode.admits(item, &favorites))
            .count();
        self.page_cursor * self.page_size.get() < total
    }

    /// Reset cursor and in-flight state for `mode`, then show its initial view
    fn reset_to(&mut self, mode: FilterMode) {
        self.filter_mode = mode;
        self.page_cursor = 0;
        self.is_loading_page = false;
        self.outstanding_ticket = None;
        self.visible_items.clear();

        if mode.is_paginated() {
            // First page is materialized immediately
            let favorites = self.favorites.all_favorite_ids();
            let has_items = self.all_items.iter().any(|i| mode.admits(i, &favorites));
            if has_items {
                self.page_cursor = 1;
            }
        }
        self.rederive();
    }

    /// Rebuild `visible_items` from `all_items`, the filter and the cursor
    fn rederive(&mut self) {
        let favorites = self.favorites.all_favorite_ids();
        let source = self.filter_mode.apply(&self.all_items, &favorites);

        let shown = if self.filter_mode.is_paginated() {
            (self.page_cursor * self.page_size.get()).min(source.len())
        } else {
            source.len()
        };

        self.visible_items = source[..shown].iter().map(|item| (*item).clone()).collect();
    }

    fn notify(&mut self) {
        if let Some(handler) = self.on_update.as_mut() {
            handler();
        }
    }
}

impl std::fmt::Debug for CatalogListEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogListEngine")
            .field("all_items", &self.all_items.len())
            .field("visible_items", &self.visible_items.len())
            .field("filter_mode", &self.filter_mode)
            .field("page_cursor", &self.page_cursor)
            .field("page_size", &self.page_size)
            .field("is_loading_page", &self.is_loading_page)
            .finish()
    }
}
