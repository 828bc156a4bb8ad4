//! Image picker rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::App;
use crate::core::ToolMode;
use crate::tui::widgets::ImageSuggestionPopup;

/// Accepted formats hint below the path input.
pub const UPLOAD_HINT: &str = "PNG, JPG, GIF, WEBP up to 10MB";

impl App {
    /// Renders the path input, format hint and suggestion list.
    pub(crate) fn render_picker(&self, frame: &mut Frame, area: Rect, mode: ToolMode) {
        let [back_link, input_area, hint_area, popup_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        self.render_back_link(frame, back_link);

        let block = Block::bordered()
            .title(Span::styled(
                format!(" {} ", mode.title()),
                self.theme.tool_highlight_style(mode),
            ))
            .title_bottom(Line::from(vec![
                Span::styled(" root: ", self.theme.muted_style()),
                Span::styled(
                    format!("{} ", self.picker.root.display()),
                    self.theme.muted_style(),
                ),
            ]))
            .border_style(self.theme.focus_style());
        let mut textarea = self.picker.input.clone();
        textarea.set_block(block);
        textarea.set_style(self.theme.normal_style());
        textarea.set_placeholder_style(self.theme.placeholder_style());
        frame.render_widget(&textarea, input_area);

        frame.render_widget(
            Paragraph::new(Span::styled(UPLOAD_HINT, self.theme.muted_style())).centered(),
            hint_area,
        );

        let query = self.picker.query();
        let popup = ImageSuggestionPopup::new(&self.picker.popup, &query, &self.theme);
        let height = popup.preferred_height().min(popup_area.height);
        if height == 0 {
            return;
        }
        let popup_rect = Rect {
            height,
            ..popup_area
        };
        frame.render_widget(popup, popup_rect);
    }

    /// Renders the "Choose a different tool" link above tool screens.
    pub(crate) fn render_back_link(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled("← Choose a different tool ", self.theme.muted_style()),
            Span::styled("[Esc]", self.theme.focus_style()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}
