use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
};

use crate::app::ui::utils::{right_align, truncate_by_width};
use crate::catalog::{CatalogListEngine, Item};

const FAVORITE_MARKER: &str = "♥";
const NOT_FAVORITE_MARKER: &str = "♡";

/// Width reserved for the price column
const PRICE_WIDTH: usize = 8;

pub fn create_catalog_list<'a>(
    engine: &CatalogListEngine,
    list_state: &ListState,
    area: Rect,
) -> List<'a> {
    // 2 for borders, 2 for the marker and its space
    let inner_width = area.width.saturating_sub(2) as usize;
    let name_width = inner_width.saturating_sub(2 + PRICE_WIDTH + 1);

    let rows: Vec<ListItem> = engine
        .visible_items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let is_selected = list_state.selected() == Some(i);
            create_row(item, engine.is_favorite(item), is_selected, name_width)
        })
        .collect();

    let title = format!(" {} ", engine.filter_mode().label());

    List::new(rows).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(Line::from(title).bold())
            .border_style(Style::default().fg(Color::DarkGray)),
    )
}

fn create_row<'a>(
    item: &Item,
    is_favorite: bool,
    is_selected: bool,
    name_width: usize,
) -> ListItem<'a> {
    let (marker, marker_style) = if is_favorite {
        (FAVORITE_MARKER, Style::default().fg(Color::Red))
    } else {
        (NOT_FAVORITE_MARKER, Style::default().fg(Color::DarkGray))
    };

    let mut name_style = Style::default().fg(Color::White);
    let mut price_style = Style::default().fg(Color::Green);
    let mut marker_style = marker_style;

    if is_selected {
        name_style = name_style.bg(Color::DarkGray).bold();
        price_style = price_style.bg(Color::DarkGray).bold();
        marker_style = marker_style.bg(Color::DarkGray);
    }

    let name = truncate_by_width(&item.name, name_width);
    let price = right_align(&item.display_price(), PRICE_WIDTH);

    ListItem::new(Line::from(vec![
        Span::styled(format!("{} ", marker), marker_style),
        Span::styled(name, name_style),
        Span::styled(format!(" {}", price), price_style),
    ]))
}
