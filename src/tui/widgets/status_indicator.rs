//! Compact status indicator for the tool screens.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::core::UploadPhase;
use crate::tui::Theme;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Returns the spinner glyph for animation frame `tick`.
#[must_use]
pub fn spinner_frame(tick: u64) -> &'static str {
    let index = usize::try_from(tick % SPINNER_FRAMES.len() as u64).unwrap_or(0);
    SPINNER_FRAMES[index]
}

/// A 2-line status footer: phase on top, key hints below.
pub struct StatusIndicatorWidget<'a> {
    phase: UploadPhase,
    tick: u64,
    theme: &'a Theme,
}

impl<'a> StatusIndicatorWidget<'a> {
    #[must_use]
    pub const fn new(phase: UploadPhase, tick: u64, theme: &'a Theme) -> Self {
        Self { phase, tick, theme }
    }

    fn phase_icon(&self) -> &'static str {
        match self.phase {
            UploadPhase::ModeUnselected
            | UploadPhase::ModeSelected(_)
            | UploadPhase::FileSelected(_) => "·",
            UploadPhase::Processing(_) => spinner_frame(self.tick),
            UploadPhase::Completed(_) => "✓",
            UploadPhase::Failed(_) => "✗",
        }
    }

    fn primary_status(&self) -> String {
        match self.phase {
            UploadPhase::ModeUnselected => "Choose a tool to get started".to_string(),
            UploadPhase::ModeSelected(mode) => format!("{} | Select an image", mode.title()),
            UploadPhase::FileSelected(mode) => {
                format!("{} | Ready to {}", mode.title(), mode.action_phrase())
            }
            UploadPhase::Processing(mode) => format!("{} | Processing...", mode.title()),
            UploadPhase::Completed(mode) => format!("{} | Done", mode.title()),
            UploadPhase::Failed(mode) => format!("{} | Request failed", mode.title()),
        }
    }

    fn key_hints(&self) -> &'static str {
        match self.phase {
            UploadPhase::ModeUnselected => "←/→ move · Enter select · 1/2 pick · q quit",
            UploadPhase::ModeSelected(_) => {
                "type to filter · ↑/↓ move · Tab complete · Enter select · Esc back"
            }
            UploadPhase::Processing(_) => "c change image · Esc choose a different tool",
            UploadPhase::FileSelected(_) | UploadPhase::Completed(_) | UploadPhase::Failed(_) => {
                "Enter process · c change image · Esc choose a different tool"
            }
        }
    }

    fn icon_style(&self) -> Style {
        match self.phase {
            UploadPhase::ModeUnselected => self.theme.muted_style(),
            UploadPhase::ModeSelected(mode)
            | UploadPhase::FileSelected(mode)
            | UploadPhase::Processing(mode) => self.theme.tool_highlight_style(mode),
            UploadPhase::Completed(_) => self.theme.success_style(),
            UploadPhase::Failed(_) => self.theme.error_style(),
        }
    }
}

impl Widget for StatusIndicatorWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let status = Line::from(vec![
            Span::styled(format!(" {} ", self.phase_icon()), self.icon_style()),
            Span::styled(self.primary_status(), self.theme.normal_style()),
        ]);
        if area.height < 2 {
            Paragraph::new(status).render(area, buf);
            return;
        }

        let lines = vec![
            status,
            Line::from(vec![
                Span::raw("   "),
                Span::styled(self.key_hints(), self.theme.muted_style()),
            ]),
        ];
        Paragraph::new(lines).render(area, buf);
    }
}
