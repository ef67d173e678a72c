//! Persistent set of favorited item ids.
//!
//! The store keeps the set in memory for O(1) lookups and writes it through to
//! a [`FavoritesBackend`] on every toggle. Backend failures never reach the
//! caller: an unreadable store starts empty and a failed save keeps the
//! in-memory state.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::catalog::ItemId;

/// Storage medium behind a [`FavoriteStore`]
pub trait FavoritesBackend: Send + Sync {
    fn load(&self) -> color_eyre::Result<HashSet<ItemId>>;
    fn save(&self, ids: &HashSet<ItemId>) -> color_eyre::Result<()>;
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct FavoritesFile {
    #[serde(default)]
    ids: Vec<ItemId>,
}

/// Favorites kept in a small TOML document (`ids = [..]`)
#[derive(Debug, Clone)]
pub struct TomlFileBackend {
    path: PathBuf,
}

impl TomlFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default favorites file path:
    /// - Linux: ~/.local/share/shopfront/favorites.toml
    /// - macOS: ~/Library/Application Support/shopfront/favorites.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\shopfront\favorites.toml
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shopfront")
            .join("favorites.toml")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesBackend for TomlFileBackend {
    fn load(&self) -> color_eyre::Result<HashSet<ItemId>> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let file: FavoritesFile = toml::from_str(&contents)?;
        Ok(file.ids.into_iter().collect())
    }

    fn save(&self, ids: &HashSet<ItemId>) -> color_eyre::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut sorted: Vec<ItemId> = ids.iter().copied().collect();
        sorted.sort_unstable();
        let contents = toml::to_string(&FavoritesFile { ids: sorted })?;

        // Write next to the target and rename so a crash never leaves half a file
        let tmp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp_path, contents)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// In-memory backend; the saved snapshot outlives any store built on it
#[derive(Debug, Default)]
pub struct MemoryBackend {
    saved: Mutex<HashSet<ItemId>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            saved: Mutex::new(ids.into_iter().collect()),
        }
    }
}

impl FavoritesBackend for MemoryBackend {
    fn load(&self) -> color_eyre::Result<HashSet<ItemId>> {
        Ok(lock(&self.saved).clone())
    }

    fn save(&self, ids: &HashSet<ItemId>) -> color_eyre::Result<()> {
        *lock(&self.saved) = ids.clone();
        Ok(())
    }
}

impl<B: FavoritesBackend + ?Sized> FavoritesBackend for std::sync::Arc<B> {
    fn load(&self) -> color_eyre::Result<HashSet<ItemId>> {
        (**self).load()
    }

    fn save(&self, ids: &HashSet<ItemId>) -> color_eyre::Result<()> {
        (**self).save(ids)
    }
}

/// Single source of truth for favorite membership
pub struct FavoriteStore {
    backend: Box<dyn FavoritesBackend>,
    ids: Mutex<HashSet<ItemId>>,
}

impl FavoriteStore {
    /// Open a store, treating a missing or corrupt backing store as empty
    pub fn new(backend: impl FavoritesBackend + 'static) -> Self {
        let ids = match backend.load() {
            Ok(ids) => {
                log::debug!("Loaded {} favorites", ids.len());
                ids
            }
            Err(e) => {
                log::warn!("Favorites store unreadable, starting empty: {}", e);
                HashSet::new()
            }
        };

        Self {
            backend: Box::new(backend),
            ids: Mutex::new(ids),
        }
    }

    /// Store backed by a TOML file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let backend = TomlFileBackend::new(path);
        log::info!("Favorites file: {}", backend.path().display());
        Self::new(backend)
    }

    /// Store that lives only for the current process
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn is_favorite(&self, id: ItemId) -> bool {
        lock(&self.ids).contains(&id)
    }

    /// Flip membership of `id` and persist before returning.
    /// Returns the new membership status.
    pub fn toggle_favorite(&self, id: ItemId) -> bool {
        let mut ids = lock(&self.ids);
        let now_favorite = if ids.remove(&id) {
            false
        } else {
            ids.insert(id);
            true
        };

        if let Err(e) = self.backend.save(&ids) {
            log::warn!("Failed to persist favorites after toggling {}: {}", id, e);
        }
        log::debug!("Item {} favorite: {}", id, now_favorite);

        now_favorite
    }

    /// Snapshot of the current membership
    pub fn all_favorite_ids(&self) -> HashSet<ItemId> {
        lock(&self.ids).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.ids).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for FavoriteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoriteStore")
            .field("len", &self.len())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
