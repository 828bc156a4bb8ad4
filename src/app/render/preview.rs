//! Preview screen rendering: thumbnail, file facts, process button, error
//! banner and result card.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};

use crate::app::{App, calculate_preview_layout};
use crate::core::{Selection, ToolMode, format_size};
use crate::tui::widgets::{CardContent, ResultCard, ThumbnailWidget, spinner_frame};

/// Process button label while a request is running.
pub const PROCESSING_LABEL: &str = "Processing...";

impl App {
    /// Renders the preview screen for the selected file.
    pub(crate) fn render_preview(&self, frame: &mut Frame, area: Rect, mode: ToolMode) {
        let Some(selection) = self.upload.selection() else {
            return;
        };
        let layout = calculate_preview_layout(area, self.upload.error().is_some());

        self.render_back_link(frame, layout.back_link);
        self.render_thumbnail(frame, layout.thumbnail, selection);
        self.render_details(frame, layout.details, selection, mode);
        if let Some(error) = self.upload.error() {
            self.render_error_banner(frame, layout.banner, error);
        }
        self.render_result(frame, layout.result, mode);
    }

    fn render_thumbnail(&self, frame: &mut Frame, area: Rect, selection: &Selection) {
        let block = Block::bordered()
            .title(" Preview ")
            .title_style(self.theme.header_style())
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            ThumbnailWidget::new(selection.preview.thumbnail(), &self.theme)
                .decoding(selection.preview.is_decoding()),
            inner,
        );
    }

    fn render_details(&self, frame: &mut Frame, area: Rect, selection: &Selection, mode: ToolMode) {
        let [facts_area, button_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

        let image = &selection.image;
        let dimensions = match selection.preview.dimensions() {
            Some((w, h)) => format!("{w} x {h}"),
            None if selection.preview.is_decoding() => "...".to_string(),
            None => "unknown".to_string(),
        };
        let fact = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(label, self.theme.muted_style()),
                Span::styled(value, self.theme.normal_style()),
            ])
        };
        let facts = vec![
            Line::from(Span::styled(image.name.clone(), self.theme.header_style())),
            fact("Type: ", image.kind.label().to_string()),
            fact("Size: ", format_size(image.len())),
            fact("Dimensions: ", dimensions),
            Line::from(""),
            Line::from(vec![
                Span::styled("[c] ", self.theme.focus_style()),
                Span::styled("Change image", self.theme.normal_style()),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(facts).wrap(Wrap { trim: false }),
            facts_area,
        );

        let (label, style) = if self.upload.is_loading() {
            (
                format!("{} {PROCESSING_LABEL}", spinner_frame(self.animation_step())),
                self.theme.disabled_button_style(),
            )
        } else if self.upload.can_process() {
            (mode.title().to_string(), self.theme.button_style(mode))
        } else {
            (mode.title().to_string(), self.theme.disabled_button_style())
        };
        let button = Paragraph::new(Line::from(Span::styled(label, style)))
            .centered()
            .style(style)
            .block(Block::bordered().border_style(self.theme.tool_highlight_style(mode)));
        frame.render_widget(button, button_area);
    }

    fn render_error_banner(&self, frame: &mut Frame, area: Rect, error: &str) {
        let banner = Paragraph::new(Span::styled(error, self.theme.error_style()))
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .title(" Error ")
                    .title_style(self.theme.error_style())
                    .border_style(self.theme.error_style()),
            );
        frame.render_widget(banner, area);
    }

    fn render_result(&self, frame: &mut Frame, area: Rect, mode: ToolMode) {
        let content = if self.upload.is_loading() {
            CardContent::Loading {
                tick: self.animation_step(),
            }
        } else if let Some(text) = self.upload.result() {
            CardContent::Result(text)
        } else {
            CardContent::Placeholder
        };
        frame.render_widget(
            ResultCard::new(content, mode, &self.theme).scroll(self.result_scroll),
            area,
        );
    }
}
