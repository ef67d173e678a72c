/// User-facing actions on the catalog screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogAction {
    // Navigation
    ScrollUp,
    ScrollDown,
    ScrollUpBig,
    ScrollDownBig,
    GoToTop,
    GoToBottom,

    // Favorites
    ToggleFavorite,

    // Filtering
    CycleFilter,
    FilterAll,
    FilterFavorites,
    FilterUnfavorites,

    // Application
    Refresh,
    ClearImageCache,
    Quit,
}

impl CatalogAction {
    /// Short name used in logs and the help line
    pub fn name(self) -> &'static str {
        match self {
            CatalogAction::ScrollUp => "scroll_up",
            CatalogAction::ScrollDown => "scroll_down",
            CatalogAction::ScrollUpBig => "scroll_up_big",
            CatalogAction::ScrollDownBig => "scroll_down_big",
            CatalogAction::GoToTop => "go_to_top",
            CatalogAction::GoToBottom => "go_to_bottom",
            CatalogAction::ToggleFavorite => "toggle_favorite",
            CatalogAction::CycleFilter => "cycle_filter",
            CatalogAction::FilterAll => "filter_all",
            CatalogAction::FilterFavorites => "filter_favorites",
            CatalogAction::FilterUnfavorites => "filter_unfavorites",
            CatalogAction::Refresh => "refresh",
            CatalogAction::ClearImageCache => "clear_image_cache",
            CatalogAction::Quit => "quit",
        }
    }
}
