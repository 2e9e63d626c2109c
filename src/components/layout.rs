//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of the customers screen, top to bottom
pub struct CustomersLayout {
    pub header: Rect,
    pub search: Rect,
    pub body: Rect,
    pub footer: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let popup_x = area.x + (area.width - width) / 2;
    let popup_y = area.y + (area.height - height) / 2;

    Rect::new(popup_x, popup_y, width, height)
}

/// Split the screen into header, search box, list body, footer and help bar
pub fn calculate_customers_layout(area: Rect) -> CustomersLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    CustomersLayout {
        header: chunks[0],
        search: chunks[1],
        body: chunks[2],
        footer: chunks[3],
        help: chunks[4],
    }
}
