use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::App;
use crate::app::ui::utils::center_area;
use crate::app::ui::widgets::{
    create_catalog_list, create_footer, create_header, footer_text, image_placeholder,
    render_image_widget,
};

const LOADING_TEXT: &str = "Loading products...";
const EMPTY_TEXT: &str = "No products found";

/// Draw the whole catalog screen
pub fn render(frame: &mut Frame<'_>, app: &mut App) {
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        create_header(&app.engine, app.favorites.len()),
        header_area,
    );

    let footer = footer_text(
        app.engine.is_loading_page(),
        app.refreshing,
        app.status_message.as_deref(),
    );
    frame.render_widget(create_footer(footer), footer_area);

    if !app.catalog_loaded {
        render_centered_text(frame, body_area, LOADING_TEXT);
        return;
    }

    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .areas(body_area);

    if app.engine.visible_items().is_empty() {
        render_centered_text(frame, list_area, EMPTY_TEXT);
    } else {
        let list = create_catalog_list(&app.engine, &app.list_state, list_area);
        frame.render_stateful_widget(list, list_area, &mut app.list_state);
    }

    render_detail_panel(frame, app, detail_area);
}

/// Image of the selected product above its name and price
fn render_detail_panel(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [image_area, info_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(2)]).areas(inner);

    let placeholder = image_placeholder(app.bound_image_key.as_deref(), app.image_failed);
    render_image_widget(frame, &mut app.protocol, placeholder, image_area);

    let selected = app
        .list_state
        .selected()
        .and_then(|idx| app.engine.visible_items().get(idx));

    if let Some(item) = selected {
        let marker = if app.engine.is_favorite(item) {
            Span::styled(" ♥ favorite", Style::default().fg(Color::Red))
        } else {
            Span::raw("")
        };

        let info = Paragraph::new(vec![
            Line::from(item.name.clone()).bold(),
            Line::from(vec![
                Span::styled(item.display_price(), Style::default().fg(Color::Green)),
                marker,
            ]),
        ])
        .centered();
        frame.render_widget(info, info_area);
    }
}

fn render_centered_text(frame: &mut Frame<'_>, area: Rect, text: &str) {
    let width = unicode_width::UnicodeWidthStr::width(text) as u16;
    let text_area = center_area(area, Constraint::Length(width), Constraint::Length(1));
    frame.render_widget(
        Paragraph::new(text).style(Style::default().dark_gray()),
        text_area,
    );
}
