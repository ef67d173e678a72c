use ratatui::{
    layout::{Constraint, Rect},
    style::{Style, Stylize},
    widgets::Paragraph,
};

use crate::app::ui::utils::{Protocol, center_area, center_image};
use ratatui_image::{Resize, StatefulImage};

/// What the image panel shows when there is no decoded image
pub fn image_placeholder(bound_key: Option<&str>, failed: bool) -> &'static str {
    match (bound_key, failed) {
        (None, _) => "",
        (Some(_), true) => "Image unavailable",
        (Some(_), false) => "Loading image...",
    }
}

pub fn render_image_widget(
    frame: &mut ratatui::Frame<'_>,
    protocol: &mut Protocol,
    placeholder: &str,
    image_area: Rect,
) {
    use image::imageops::FilterType;

    if let Some(ref mut img) = protocol.image {
        // Get the image dimensions after resizing for the available area
        let resize = Resize::Scale(Some(FilterType::Lanczos3));
        let img_rect = img.size_for(resize.clone(), image_area);

        // Center the image within the available area
        let centered_area = center_image(img_rect, image_area);

        let image = StatefulImage::default().resize(resize);
        frame.render_stateful_widget(image, centered_area, img);
    } else if !placeholder.is_empty() {
        let width = unicode_width::UnicodeWidthStr::width(placeholder) as u16;
        let placeholder_area =
            center_area(image_area, Constraint::Length(width), Constraint::Length(1));
        let placeholder = Paragraph::new(placeholder).style(Style::default().dark_gray());
        frame.render_widget(placeholder, placeholder_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_placeholder() {
        assert_eq!(image_placeholder(None, false), "");
        assert_eq!(image_placeholder(Some("k"), false), "Loading image...");
        assert_eq!(image_placeholder(Some("k"), true), "Image unavailable");
    }
}
