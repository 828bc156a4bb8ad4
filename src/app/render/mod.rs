//! Rendering methods for the App.
//!
//! This module contains all UI rendering logic including:
//! - **Auth**: centered login and signup forms
//! - **Tools**: header, tool cards, image picker and preview screen
//!
//! Every screen uses the outer frame from `self.layout.screen`, which is
//! calculated once per frame in `update_layout()`.

mod auth;
mod picker;
mod preview;
mod tools;

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{App, Screen};
use crate::tui::widgets::StatusIndicatorWidget;

/// Application title shown in the header.
pub const APP_TITLE: &str = "AI Image Analyzer";

impl App {
    /// Renders the application UI for the current screen.
    pub fn render(&self, frame: &mut Frame) {
        let layout = self.layout.screen;
        match self.screen() {
            Screen::Login | Screen::Signup => {
                self.render_auth(frame, layout.body);
                self.render_auth_hints(frame, layout.status);
            }
            Screen::ToolSelect => {
                self.render_header(frame, layout.header);
                self.render_tool_select(frame, layout.body);
                self.render_status(frame, layout.status);
            }
            Screen::Picker(mode) => {
                self.render_header(frame, layout.header);
                self.render_picker(frame, layout.body, mode);
                self.render_status(frame, layout.status);
            }
            Screen::Preview(mode) => {
                self.render_header(frame, layout.header);
                self.render_preview(frame, layout.body, mode);
                self.render_status(frame, layout.status);
            }
        }
    }

    /// Renders the title and the subtitle for the selected tool.
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let subtitle = match self.upload.mode() {
            None => "Choose a tool to get started.".to_string(),
            Some(mode) => format!("Upload an image to {}.", mode.action_phrase()),
        };
        let header = vec![
            Line::from(Span::styled(APP_TITLE, self.theme.header_style())),
            Line::from(Span::styled(subtitle, self.theme.muted_style())),
        ];
        frame.render_widget(Paragraph::new(header).centered(), area);
    }

    /// Renders the 2-line status indicator for the upload flow.
    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let status =
            StatusIndicatorWidget::new(self.upload.phase(), self.animation_step(), &self.theme);
        frame.render_widget(status, area);
    }
}
