//! Draws a [`Thumbnail`] with half-block cells.
//!
//! Each terminal cell shows two vertically stacked pixels: the upper one as
//! the foreground of `▀`, the lower one as the background.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::Widget,
};

use crate::core::Thumbnail;
use crate::tui::Theme;

const UPPER_HALF_BLOCK: &str = "▀";

/// Shown while the preview is still decoding.
pub const DECODING_MESSAGE: &str = "Loading preview...";

pub struct ThumbnailWidget<'a> {
    thumbnail: Option<&'a Thumbnail>,
    decoding: bool,
    theme: &'a Theme,
}

impl<'a> ThumbnailWidget<'a> {
    #[must_use]
    pub const fn new(thumbnail: Option<&'a Thumbnail>, theme: &'a Theme) -> Self {
        Self {
            thumbnail,
            decoding: false,
            theme,
        }
    }

    #[must_use]
    pub const fn decoding(mut self, decoding: bool) -> Self {
        self.decoding = decoding;
        self
    }

    /// Cell size of the drawn thumbnail: (columns, rows).
    #[must_use]
    pub fn cell_size(thumbnail: &Thumbnail) -> (u16, u16) {
        let cols = u16::try_from(thumbnail.width).unwrap_or(u16::MAX);
        let rows = u16::try_from(thumbnail.height.div_ceil(2)).unwrap_or(u16::MAX);
        (cols, rows)
    }
}

fn rgb(pixel: [u8; 3]) -> Color {
    Color::Rgb(pixel[0], pixel[1], pixel[2])
}

impl Widget for ThumbnailWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(thumb) = self.thumbnail else {
            let message = if self.decoding {
                DECODING_MESSAGE
            } else {
                "Preview unavailable"
            };
            Line::from(message)
                .style(self.theme.muted_style())
                .centered()
                .render(area, buf);
            return;
        };

        let (cols, rows) = Self::cell_size(thumb);
        let cols = cols.min(area.width);
        let rows = rows.min(area.height);
        // Center inside the area.
        let left = area.x + (area.width - cols) / 2;
        let top = area.y + (area.height - rows) / 2;

        for row in 0..rows {
            for col in 0..cols {
                let x = u32::from(col);
                let upper = thumb.pixel(x, u32::from(row) * 2);
                let lower = thumb.pixel(x, u32::from(row) * 2 + 1);
                let mut style = Style::default();
                if let Some(p) = upper {
                    style = style.fg(rgb(p));
                }
                if let Some(p) = lower {
                    style = style.bg(rgb(p));
                }
                if let Some(cell) = buf.cell_mut((left + col, top + row)) {
                    cell.set_symbol(UPPER_HALF_BLOCK).set_style(style);
                }
            }
        }
    }
}
