use ratatui::layout::{Constraint, Flex, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Image state for the product panel
pub struct Protocol {
    pub image: Option<ratatui_image::protocol::StatefulProtocol>,
}

/// Truncate a string to fit within the given display width, handling Unicode properly.
/// Shorter strings are padded with spaces.
pub fn truncate_by_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for ch in s.chars() {
        let char_width = ch.width().unwrap_or(0);
        if current_width + char_width > max_width {
            break;
        }
        result.push(ch);
        current_width += char_width;
    }

    // Pad with spaces if needed
    while current_width < max_width {
        result.push(' ');
        current_width += 1;
    }

    result
}

/// Pad `s` on the left to `width` columns; longer strings are returned unchanged
pub fn right_align(s: &str, width: usize) -> String {
    let display_width = s.width();
    if display_width >= width {
        return s.to_string();
    }
    format!("{}{}", " ".repeat(width - display_width), s)
}

/// Helper function to center a rect within another rect
pub fn center_area(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    area
}

/// Center an image of the given size inside `available_area`
pub fn center_image(image_dimensions: Rect, available_area: Rect) -> Rect {
    let width = image_dimensions.width.min(available_area.width);
    let height = image_dimensions.height.min(available_area.height);
    Rect {
        x: available_area.x + (available_area.width - width) / 2,
        y: available_area.y + (available_area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_by_width() {
        assert_eq!(truncate_by_width("Running Shoes", 7), "Running");
        assert_eq!(truncate_by_width("Tote", 6), "Tote  ");
        // Wide characters never get split
        assert_eq!(truncate_by_width("靴靴靴", 5), "靴靴 ");
    }

    #[test]
    fn test_right_align() {
        assert_eq!(right_align("$12", 5), "  $12");
        assert_eq!(right_align("$12345", 3), "$12345");
    }

    #[test]
    fn test_center_image() {
        let area = Rect::new(10, 5, 40, 20);
        let centered = center_image(Rect::new(0, 0, 20, 10), area);
        assert_eq!(centered, Rect::new(20, 10, 20, 10));

        // Oversized images are clipped to the area
        let clipped = center_image(Rect::new(0, 0, 60, 30), area);
        assert_eq!(clipped, area);
    }
}
