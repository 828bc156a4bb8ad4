//! Centralized theme and styling.

use ratatui::style::{Color, Modifier, Style};

use crate::core::ToolMode;

/// Application theme with consistent colors and styles.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Accent/highlight color for chrome that belongs to no tool.
    pub accent: Color,
    /// Accent for the text extraction tool.
    pub extract_accent: Color,
    /// Accent for the caption tool.
    pub caption_accent: Color,
    /// Success color (green).
    pub success: Color,
    /// Error color (red).
    pub error: Color,
    /// Muted/secondary text color.
    pub muted: Color,
    /// Border color.
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            accent: Color::Cyan,
            extract_accent: Color::LightBlue,
            caption_accent: Color::LightMagenta,
            success: Color::Green,
            error: Color::Red,
            muted: Color::DarkGray,
            border: Color::Gray,
        }
    }
}

impl Theme {
    /// Accent color for `mode`.
    #[must_use]
    pub const fn tool_accent(&self, mode: ToolMode) -> Color {
        match mode {
            ToolMode::TextExtract => self.extract_accent,
            ToolMode::Caption => self.caption_accent,
        }
    }

    /// Style for the header/title.
    #[must_use]
    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for normal text.
    #[must_use]
    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Style for muted/secondary text.
    #[must_use]
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for success messages.
    #[must_use]
    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Style for error messages.
    #[must_use]
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Style for borders.
    #[must_use]
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for the focused widget's border or label.
    #[must_use]
    pub fn focus_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a highlighted item in `mode`'s accent.
    #[must_use]
    pub fn tool_highlight_style(&self, mode: ToolMode) -> Style {
        Style::default()
            .fg(self.tool_accent(mode))
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the primary button of `mode`.
    #[must_use]
    pub fn button_style(&self, mode: ToolMode) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.tool_accent(mode))
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a button that cannot be pressed right now.
    #[must_use]
    pub fn disabled_button_style(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::DIM)
    }

    /// Style for scrollbar thumb.
    #[must_use]
    pub fn scrollbar_thumb_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Style for scrollbar track.
    #[must_use]
    pub fn scrollbar_track_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for placeholder text (visible on both light and dark backgrounds).
    #[must_use]
    pub fn placeholder_style(&self) -> Style {
        Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
    }
}
