use std::collections::HashSet;
use std::fmt;

use super::item::{Item, ItemId};

/// Which subset of the catalog is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    #[default]
    All,
    FavoritesOnly,
    NonFavoritesOnly,
}

impl FilterMode {
    /// `All` is shown page by page; the favorite-based filters show everything at once
    pub fn is_paginated(self) -> bool {
        matches!(self, FilterMode::All)
    }

    /// Next mode in the All -> Favorites -> Unfavorites cycle
    pub fn next(self) -> Self {
        match self {
            FilterMode::All => FilterMode::FavoritesOnly,
            FilterMode::FavoritesOnly => FilterMode::NonFavoritesOnly,
            FilterMode::NonFavoritesOnly => FilterMode::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::FavoritesOnly => "Favorites",
            FilterMode::NonFavoritesOnly => "Unfavorites",
        }
    }

    /// Whether `item` belongs to this filter given a favorites snapshot
    pub fn admits(self, item: &Item, favorites: &HashSet<ItemId>) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::FavoritesOnly => favorites.contains(&item.id),
            FilterMode::NonFavoritesOnly => !favorites.contains(&item.id),
        }
    }

    /// Stable filter: keeps the relative order of `items`
    pub fn apply<'a>(self, items: &'a [Item], favorites: &HashSet<ItemId>) -> Vec<&'a Item> {
        items
            .iter()
            .filter(|item| self.admits(item, favorites))
            .collect()
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
