use crate::app::config::Config;
use crate::app::ui::{DirtyFlags, Protocol};
use crate::catalog::{CatalogListEngine, CatalogSource};
use crate::favorites::FavoriteStore;
use crate::images::ImageCache;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::widgets::ListState;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::mpsc;

pub use action::CatalogAction;
pub use main_loop::{AppMainLoop, AppMessage};

// Module declarations
pub mod action;
pub mod cli;
pub mod config;
pub mod constructor;
pub mod event_handlers;
pub mod logging;
pub mod main_loop;
pub mod terminal;
pub mod ui;

/// Catalog screen state
pub struct App {
    pub running: bool,
    pub config: Config,
    pub config_warnings: Vec<String>,

    pub engine: CatalogListEngine,
    pub favorites: Arc<FavoriteStore>,
    pub images: ImageCache,
    pub source: CatalogSource,
    /// False until the first (delayed) catalog load has arrived
    pub catalog_loaded: bool,
    /// A refresh is waiting for its delayed reload
    pub refreshing: bool,

    pub list_state: ListState,
    pub key_map: HashMap<(KeyModifiers, KeyCode), CatalogAction>,
    pub dirty: Rc<DirtyFlags>,
    pub status_message: Option<String>,

    /// Image shown for the selected row
    pub protocol: Protocol,
    /// Key the image panel is currently bound to; completions for other keys are stale
    pub bound_image_key: Option<String>,
    pub image_failed: bool,

    pub message_tx: mpsc::Sender<AppMessage>,
    message_rx: Option<mpsc::Receiver<AppMessage>>,
}
