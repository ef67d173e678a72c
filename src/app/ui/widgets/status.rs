use ratatui::{
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::catalog::CatalogListEngine;

/// Title, active filter and how much of the catalog is shown
pub fn create_header<'a>(engine: &CatalogListEngine, favorite_count: usize) -> Paragraph<'a> {
    let line = Line::from(vec![
        Span::styled(" Shopfront ", Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::raw("  Filter: "),
        Span::styled(engine.filter_mode().label(), Style::default().fg(Color::Cyan).bold()),
        Span::raw(format!(
            "  {} of {} shown  ",
            engine.visible_items().len(),
            engine.all_items().len()
        )),
        Span::styled(format!("♥ {}", favorite_count), Style::default().fg(Color::Red)),
    ]);

    Paragraph::new(line)
}

/// Footer text: in-flight work first, then a status message, then key hints
pub fn footer_text(
    is_loading_page: bool,
    refreshing: bool,
    status_message: Option<&str>,
) -> String {
    if is_loading_page {
        return "Loading more...".to_string();
    }
    if refreshing {
        return "Refreshing...".to_string();
    }
    match status_message {
        Some(message) => message.to_string(),
        None => "j/k move  space favorite  f filter  r refresh  q quit".to_string(),
    }
}

pub fn create_footer<'a>(text: String) -> Paragraph<'a> {
    Paragraph::new(Line::from(text)).style(Style::default().dark_gray())
}
