//! Dirty region tracking for the catalog screen.
//!
//! The list engine's update observer and the event handlers mark regions
//! here; the main loop only redraws when something is dirty.

use std::cell::Cell;

/// Tracks which UI regions changed since the last render
#[derive(Debug, Default)]
pub struct DirtyFlags {
    /// Visible item list changed (load, page, filter, favorite toggle)
    list: Cell<bool>,
    /// Selected row moved
    selection: Cell<bool>,
    /// Product image for the selection changed
    image: Cell<bool>,
    /// Header/footer status text changed (loading flags, counts)
    status: Cell<bool>,
    /// Terminal size has changed (forces full redraw)
    terminal_size: Cell<bool>,
    /// Force full redraw (initial render, etc.)
    force_full: Cell<bool>,
    last_width: Cell<u16>,
    last_height: Cell<u16>,
}

impl DirtyFlags {
    /// Create new dirty flags with everything marked dirty (forces initial render)
    pub fn new() -> Self {
        let flags = Self::default();
        flags.force_full.set(true);
        flags
    }

    #[inline]
    pub fn mark_list(&self) {
        self.list.set(true);
    }

    #[inline]
    pub fn mark_selection(&self) {
        self.selection.set(true);
    }

    #[inline]
    pub fn mark_image(&self) {
        self.image.set(true);
    }

    #[inline]
    pub fn mark_status(&self) {
        self.status.set(true);
    }

    #[inline]
    pub fn mark_full_redraw(&self) {
        self.force_full.set(true);
    }

    /// Check and update terminal size, marking dirty if changed
    #[inline]
    pub fn check_terminal_size(&self, width: u16, height: u16) {
        if width != self.last_width.get() || height != self.last_height.get() {
            self.terminal_size.set(true);
            self.last_width.set(width);
            self.last_height.set(height);
        }
    }

    #[inline]
    pub fn any_dirty(&self) -> bool {
        self.needs_full_redraw()
            || self.list.get()
            || self.selection.get()
            || self.image.get()
            || self.status.get()
    }

    #[inline]
    pub fn needs_full_redraw(&self) -> bool {
        self.force_full.get() || self.terminal_size.get()
    }

    /// Clear all dirty flags after render
    #[inline]
    pub fn clear_all(&self) {
        self.list.set(false);
        self.selection.set(false);
        self.image.set(false);
        self.status.set(false);
        self.terminal_size.set(false);
        self.force_full.set(false);
    }
}
