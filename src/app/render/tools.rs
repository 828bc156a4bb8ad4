//! Tool menu rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

use crate::app::App;
use crate::core::ToolMode;
use crate::tui::widgets::ToolCard;

/// Height of a tool card including borders.
const CARD_HEIGHT: u16 = 7;

impl App {
    /// Renders the two tool cards side by side.
    pub(crate) fn render_tool_select(&self, frame: &mut Frame, area: Rect) {
        let [_, row, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(CARD_HEIGHT),
            Constraint::Min(0),
        ])
        .areas(area);
        let [left, right] = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)])
            .spacing(2)
            .areas(row);

        for ((mode, shortcut), card_area) in ToolMode::all()
            .iter()
            .zip(['1', '2'])
            .zip([left, right])
        {
            let card = ToolCard::new(*mode, *mode == self.tool_highlight, shortcut, &self.theme);
            frame.render_widget(card, card_area);
        }
    }
}
