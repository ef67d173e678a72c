use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::app::action::CatalogAction;

/// Key strings per action, e.g. `"ctrl-c"`, `"shift-g"`, `"pagedown"`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BindsConfig {
    #[serde(default = "BindsConfig::default_scroll_up")]
    pub scroll_up: Vec<String>,
    #[serde(default = "BindsConfig::default_scroll_down")]
    pub scroll_down: Vec<String>,
    #[serde(default = "BindsConfig::default_scroll_up_big")]
    pub scroll_up_big: Vec<String>,
    #[serde(default = "BindsConfig::default_scroll_down_big")]
    pub scroll_down_big: Vec<String>,
    #[serde(default = "BindsConfig::default_go_to_top")]
    pub go_to_top: Vec<String>,
    #[serde(default = "BindsConfig::default_go_to_bottom")]
    pub go_to_bottom: Vec<String>,
    #[serde(default = "BindsConfig::default_toggle_favorite")]
    pub toggle_favorite: Vec<String>,
    #[serde(default = "BindsConfig::default_cycle_filter")]
    pub cycle_filter: Vec<String>,
    #[serde(default = "BindsConfig::default_filter_all")]
    pub filter_all: Vec<String>,
    #[serde(default = "BindsConfig::default_filter_favorites")]
    pub filter_favorites: Vec<String>,
    #[serde(default = "BindsConfig::default_filter_unfavorites")]
    pub filter_unfavorites: Vec<String>,
    #[serde(default = "BindsConfig::default_refresh")]
    pub refresh: Vec<String>,
    #[serde(default = "BindsConfig::default_clear_image_cache")]
    pub clear_image_cache: Vec<String>,
    #[serde(default = "BindsConfig::default_quit")]
    pub quit: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl BindsConfig {
    fn default_scroll_up() -> Vec<String> {
        keys(&["k", "up"])
    }
    fn default_scroll_down() -> Vec<String> {
        keys(&["j", "down"])
    }
    fn default_scroll_up_big() -> Vec<String> {
        keys(&["ctrl-u", "pageup"])
    }
    fn default_scroll_down_big() -> Vec<String> {
        keys(&["ctrl-d", "pagedown"])
    }
    fn default_go_to_top() -> Vec<String> {
        keys(&["g", "home"])
    }
    fn default_go_to_bottom() -> Vec<String> {
        keys(&["shift-g", "end"])
    }
    fn default_toggle_favorite() -> Vec<String> {
        keys(&["space", "enter"])
    }
    fn default_cycle_filter() -> Vec<String> {
        keys(&["f", "tab"])
    }
    fn default_filter_all() -> Vec<String> {
        keys(&["1"])
    }
    fn default_filter_favorites() -> Vec<String> {
        keys(&["2"])
    }
    fn default_filter_unfavorites() -> Vec<String> {
        keys(&["3"])
    }
    fn default_refresh() -> Vec<String> {
        keys(&["r", "f5"])
    }
    fn default_clear_image_cache() -> Vec<String> {
        keys(&["ctrl-l"])
    }
    fn default_quit() -> Vec<String> {
        keys(&["q", "esc", "ctrl-c"])
    }

    /// Every configured (action, key strings) pair
    fn entries(&self) -> [(CatalogAction, &Vec<String>); 14] {
        [
            (CatalogAction::ScrollUp, &self.scroll_up),
            (CatalogAction::ScrollDown, &self.scroll_down),
            (CatalogAction::ScrollUpBig, &self.scroll_up_big),
            (CatalogAction::ScrollDownBig, &self.scroll_down_big),
            (CatalogAction::GoToTop, &self.go_to_top),
            (CatalogAction::GoToBottom, &self.go_to_bottom),
            (CatalogAction::ToggleFavorite, &self.toggle_favorite),
            (CatalogAction::CycleFilter, &self.cycle_filter),
            (CatalogAction::FilterAll, &self.filter_all),
            (CatalogAction::FilterFavorites, &self.filter_favorites),
            (CatalogAction::FilterUnfavorites, &self.filter_unfavorites),
            (CatalogAction::Refresh, &self.refresh),
            (CatalogAction::ClearImageCache, &self.clear_image_cache),
            (CatalogAction::Quit, &self.quit),
        ]
    }

    /// Parse a single key string such as `"ctrl-shift-x"` or `"pagedown"`
    pub fn parse_keybinding(key_str: &str) -> Option<(KeyModifiers, KeyCode)> {
        let key_str = key_str.trim().to_lowercase();

        // Special case for standalone "-" character
        if key_str == "-" {
            return Some((KeyModifiers::NONE, KeyCode::Char('-')));
        }

        let parts: Vec<&str> = key_str.split('-').collect();
        let (key_part, modifier_parts) = parts.split_last()?;

        let mut modifiers = KeyModifiers::NONE;
        for part in modifier_parts {
            match *part {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match *key_part {
            "esc" => KeyCode::Esc,
            "enter" => KeyCode::Enter,
            "backspace" => KeyCode::Backspace,
            "tab" => KeyCode::Tab,
            "delete" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "space" => KeyCode::Char(' '),
            f if f.len() > 1 && f.starts_with('f') => {
                let n: u8 = f[1..].parse().ok()?;
                if !(1..=12).contains(&n) {
                    return None;
                }
                KeyCode::F(n)
            }
            // Shifted letters arrive as uppercase characters
            c if c.chars().count() == 1 => {
                let ch = c.chars().next()?;
                if modifiers.contains(KeyModifiers::SHIFT) {
                    KeyCode::Char(ch.to_ascii_uppercase())
                } else {
                    KeyCode::Char(ch)
                }
            }
            _ => return None,
        };

        Some((modifiers, code))
    }

    /// Build the key lookup table. Unparseable keys are reported as warnings.
    pub fn build_key_map(&self) -> (HashMap<(KeyModifiers, KeyCode), CatalogAction>, Vec<String>) {
        let mut map = HashMap::new();
        let mut warnings = Vec::new();

        for (action, key_strings) in self.entries() {
            for key_str in key_strings {
                match Self::parse_keybinding(key_str) {
                    Some(key) => {
                        if let Some(previous) = map.insert(key, action)
                            && previous != action
                        {
                            warnings.push(format!(
                                "Key '{}' bound to both {} and {}; using {}",
                                key_str,
                                previous.name(),
                                action.name(),
                                action.name()
                            ));
                        }
                    }
                    None => warnings.push(format!(
                        "Invalid key binding for {}: '{}'",
                        action.name(),
                        key_str
                    )),
                }
            }
        }

        (map, warnings)
    }
}

impl Default for BindsConfig {
    fn default() -> Self {
        Self {
            scroll_up: Self::default_scroll_up(),
            scroll_down: Self::default_scroll_down(),
            scroll_up_big: Self::default_scroll_up_big(),
            scroll_down_big: Self::default_scroll_down_big(),
            go_to_top: Self::default_go_to_top(),
            go_to_bottom: Self::default_go_to_bottom(),
            toggle_favorite: Self::default_toggle_favorite(),
            cycle_filter: Self::default_cycle_filter(),
            filter_all: Self::default_filter_all(),
            filter_favorites: Self::default_filter_favorites(),
            filter_unfavorites: Self::default_filter_unfavorites(),
            refresh: Self::default_refresh(),
            clear_image_cache: Self::default_clear_image_cache(),
            quit: Self::default_quit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_modified_keys() {
        assert_eq!(
            BindsConfig::parse_keybinding("j"),
            Some((KeyModifiers::NONE, KeyCode::Char('j')))
        );
        assert_eq!(
            BindsConfig::parse_keybinding("ctrl-d"),
            Some((KeyModifiers::CONTROL, KeyCode::Char('d')))
        );
        assert_eq!(
            BindsConfig::parse_keybinding("shift-g"),
            Some((KeyModifiers::SHIFT, KeyCode::Char('G')))
        );
        assert_eq!(
            BindsConfig::parse_keybinding("PageDown"),
            Some((KeyModifiers::NONE, KeyCode::PageDown))
        );
        assert_eq!(
            BindsConfig::parse_keybinding("f5"),
            Some((KeyModifiers::NONE, KeyCode::F(5)))
        );
        assert_eq!(
            BindsConfig::parse_keybinding("-"),
            Some((KeyModifiers::NONE, KeyCode::Char('-')))
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(BindsConfig::parse_keybinding("hyper-x"), None);
        assert_eq!(BindsConfig::parse_keybinding("f13"), None);
        assert_eq!(BindsConfig::parse_keybinding("banana"), None);
    }

    #[test]
    fn test_default_map_is_clean() {
        let (map, warnings) = BindsConfig::default().build_key_map();
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(
            map.get(&(KeyModifiers::NONE, KeyCode::Char(' '))),
            Some(&CatalogAction::ToggleFavorite)
        );
        assert_eq!(
            map.get(&(KeyModifiers::CONTROL, KeyCode::Char('c'))),
            Some(&CatalogAction::Quit)
        );
    }

    #[test]
    fn test_conflicts_and_invalid_keys_warn() {
        let binds = BindsConfig {
            refresh: vec!["q".to_string(), "nope-x".to_string()],
            ..BindsConfig::default()
        };
        let (map, warnings) = binds.build_key_map();
        assert_eq!(warnings.len(), 2);
        // Later entries win
        assert_eq!(
            map.get(&(KeyModifiers::NONE, KeyCode::Char('q'))),
            Some(&CatalogAction::Quit)
        );
    }
}
