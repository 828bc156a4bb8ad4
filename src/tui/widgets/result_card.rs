//! Result card widget.
//!
//! Shows the model's answer, a placeholder before the first request, or
//! animated dots while a request is running. Long answers are wrapped to the
//! card width and scroll vertically.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
        Widget,
    },
};
use unicode_width::UnicodeWidthChar;

use crate::core::ToolMode;
use crate::tui::Theme;

/// Text shown before any result exists.
pub const RESULT_PLACEHOLDER: &str = "Result will appear here...";

/// Number of dot frames in the loading animation.
const LOADING_FRAMES: u64 = 3;

/// What the card displays.
#[derive(Debug, Clone, Copy)]
pub enum CardContent<'a> {
    Placeholder,
    Loading { tick: u64 },
    Result(&'a str),
}

/// A bordered card holding the result text.
pub struct ResultCard<'a> {
    content: CardContent<'a>,
    mode: ToolMode,
    scroll_offset: usize,
    theme: &'a Theme,
}

impl<'a> ResultCard<'a> {
    #[must_use]
    pub const fn new(content: CardContent<'a>, mode: ToolMode, theme: &'a Theme) -> Self {
        Self {
            content,
            mode,
            scroll_offset: 0,
            theme,
        }
    }

    /// Sets the first visible wrapped line.
    #[must_use]
    pub const fn scroll(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }
}

/// Returns the three-dot loading indicator for animation frame `tick`.
/// The raised dot moves left to right.
#[must_use]
pub fn loading_dots(tick: u64) -> String {
    let raised = tick % LOADING_FRAMES;
    (0..LOADING_FRAMES)
        .map(|i| if i == raised { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Number of visual rows `text` occupies when wrapped to `width` columns.
#[must_use]
pub fn visual_line_count(text: &str, width: usize) -> usize {
    text.lines()
        .map(|line| wrap_line_to_width(line, width).len())
        .sum::<usize>()
        .max(1)
}

/// Wraps one line at `width` display columns, character by character.
fn wrap_line_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![String::new()];
    }

    let mut result = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let char_width = ch.width().unwrap_or(0);
        if current_width + char_width > width {
            result.push(std::mem::take(&mut current_line));
            current_width = 0;
        }
        current_line.push(ch);
        current_width += char_width;
    }
    result.push(current_line);
    result
}

impl Widget for ResultCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Line::from(Span::styled(
                format!(" {} ", self.mode.title()),
                self.theme.tool_highlight_style(self.mode),
            )))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let text = match self.content {
            CardContent::Placeholder => {
                Line::from(Span::styled(RESULT_PLACEHOLDER, self.theme.placeholder_style()))
                    .render(inner, buf);
                return;
            }
            CardContent::Loading { tick } => {
                Line::from(Span::styled(
                    loading_dots(tick),
                    self.theme.tool_highlight_style(self.mode),
                ))
                .render(inner, buf);
                return;
            }
            CardContent::Result(text) => text,
        };

        let visible_height = inner.height as usize;
        // One column is reserved for the scrollbar.
        let content_width = inner.width.saturating_sub(1) as usize;
        let wrapped: Vec<String> = text
            .lines()
            .flat_map(|line| wrap_line_to_width(line, content_width))
            .collect();
        let total = wrapped.len();
        let offset = self.scroll_offset.min(total.saturating_sub(visible_height));

        let lines: Vec<Line> = wrapped
            .into_iter()
            .skip(offset)
            .take(visible_height)
            .map(|line| Line::from(Span::styled(line, self.theme.normal_style())))
            .collect();
        Paragraph::new(lines).render(inner, buf);

        if total > visible_height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"))
                .track_symbol(Some("│"))
                .thumb_symbol("█")
                .track_style(self.theme.scrollbar_track_style())
                .thumb_style(self.theme.scrollbar_thumb_style());
            let mut state = ScrollbarState::new(total)
                .position(offset)
                .viewport_content_length(visible_height);
            scrollbar.render(inner, buf, &mut state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn render_to_string(card: ResultCard<'_>, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(card, frame.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn placeholder_before_any_result() {
        let theme = Theme::default();
        let card = ResultCard::new(CardContent::Placeholder, ToolMode::TextExtract, &theme);
        let out = render_to_string(card, 40, 5);
        assert!(out.contains(RESULT_PLACEHOLDER));
        assert!(out.contains("Text Extractor"));
    }

    #[test]
    fn loading_dots_cycle() {
        assert_eq!(loading_dots(0), "●  ○  ○");
        assert_eq!(loading_dots(1), "○  ●  ○");
        assert_eq!(loading_dots(2), "○  ○  ●");
        assert_eq!(loading_dots(3), loading_dots(0));
    }

    #[test]
    fn loading_replaces_placeholder() {
        let theme = Theme::default();
        let card = ResultCard::new(CardContent::Loading { tick: 1 }, ToolMode::Caption, &theme);
        let out = render_to_string(card, 40, 5);
        assert!(out.contains("○  ●  ○"));
        assert!(!out.contains(RESULT_PLACEHOLDER));
    }

    #[test]
    fn result_text_is_shown_verbatim() {
        let theme = Theme::default();
        let card = ResultCard::new(
            CardContent::Result("A cat on a windowsill."),
            ToolMode::Caption,
            &theme,
        );
        let out = render_to_string(card, 40, 5);
        assert!(out.contains("A cat on a windowsill."));
    }

    #[test]
    fn long_results_wrap_and_scroll() {
        let theme = Theme::default();
        let text = (1..=10).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let card = ResultCard::new(CardContent::Result(&text), ToolMode::TextExtract, &theme)
            .scroll(5);
        let out = render_to_string(card, 30, 5);
        assert!(out.contains("line 6"));
        assert!(!out.contains("line 1 "));
    }

    #[test]
    fn visual_line_count_accounts_for_wrapping() {
        assert_eq!(visual_line_count("", 10), 1);
        assert_eq!(visual_line_count("abcdefghij", 5), 2);
        assert_eq!(visual_line_count("ab\ncd", 5), 2);
        assert_eq!(visual_line_count("日本語", 4), 2);
    }
}
