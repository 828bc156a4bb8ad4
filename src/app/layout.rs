//! Layout calculation helpers for the TUI.
//!
//! Layouts are computed in one place so that `App::update_layout` and the
//! render functions always agree on dimensions.

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Outer frame shared by every screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenLayout {
    /// Title and subtitle (3 lines including a blank spacer).
    pub header: Rect,
    /// Screen content.
    pub body: Rect,
    /// Status indicator (2 lines).
    pub status: Rect,
}

const SCREEN_CONSTRAINTS: [Constraint; 3] = [
    Constraint::Length(3), // Header
    Constraint::Min(6),    // Body
    Constraint::Length(2), // Status + key hints
];

/// Largest width used by screen content; wider terminals get side margins.
pub const MAX_CONTENT_WIDTH: u16 = 96;

/// Calculates the outer frame for `area`.
#[must_use]
pub fn calculate_screen_layout(area: Rect) -> ScreenLayout {
    let [header, body, status] = Layout::vertical(SCREEN_CONSTRAINTS).areas(area);
    let [body] = Layout::horizontal([Constraint::Max(MAX_CONTENT_WIDTH)])
        .flex(Flex::Center)
        .areas(body);
    ScreenLayout {
        header,
        body,
        status,
    }
}

/// Areas of the preview screen body.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewLayout {
    /// "Choose a different tool" link.
    pub back_link: Rect,
    /// Thumbnail panel (left).
    pub thumbnail: Rect,
    /// File facts and actions (right of the thumbnail).
    pub details: Rect,
    /// Error banner; zero height when there is no error.
    pub banner: Rect,
    /// Result card.
    pub result: Rect,
}

/// Calculates the preview screen body layout.
#[must_use]
pub fn calculate_preview_layout(body: Rect, has_error: bool) -> PreviewLayout {
    let banner_height = if has_error { 4 } else { 0 };
    let [back_link, top, banner, result] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Percentage(55),
        Constraint::Length(banner_height),
        Constraint::Min(5),
    ])
    .areas(body);
    let [thumbnail, details] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(top);
    PreviewLayout {
        back_link,
        thumbnail,
        details,
        banner,
        result,
    }
}

/// Returns a `width` x `height` rectangle centered in `area`, clamped to it.
#[must_use]
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
