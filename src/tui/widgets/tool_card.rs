//! Selectable card for one tool on the tool menu.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::core::ToolMode;
use crate::tui::Theme;

pub struct ToolCard<'a> {
    mode: ToolMode,
    highlighted: bool,
    shortcut: char,
    theme: &'a Theme,
}

impl<'a> ToolCard<'a> {
    #[must_use]
    pub const fn new(mode: ToolMode, highlighted: bool, shortcut: char, theme: &'a Theme) -> Self {
        Self {
            mode,
            highlighted,
            shortcut,
            theme,
        }
    }
}

impl Widget for ToolCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (border_type, border_style) = if self.highlighted {
            (BorderType::Thick, self.theme.tool_highlight_style(self.mode))
        } else {
            (BorderType::Rounded, self.theme.border_style())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(border_style);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.mode.title(),
                self.theme.tool_highlight_style(self.mode),
            )),
            Line::from(""),
            Line::from(Span::styled(
                self.mode.description(),
                self.theme.normal_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("[{}]", self.shortcut),
                self.theme.muted_style(),
            )),
        ];

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
