//! Image suggestion list for the picker.
//!
//! Displays the images matching the typed path below the picker input.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Widget},
};

use crate::file_search::{ImageMatch, MAX_IMAGE_MATCHES};
use crate::tui::Theme;

/// Maximum number of visible rows in the popup.
pub const MAX_POPUP_ROWS: usize = MAX_IMAGE_MATCHES;

/// State of the suggestion list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PopupState {
    /// Nothing searched yet.
    #[default]
    Hidden,
    /// A search is running.
    Loading,
    /// The last search found nothing.
    NoMatches,
    /// Showing image suggestions.
    Showing {
        matches: Vec<ImageMatch>,
        /// Highlighted index (0-indexed).
        selected: usize,
    },
}

impl PopupState {
    /// Returns true if the popup is visible (not hidden).
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Returns the number of matches if in Showing state.
    #[must_use]
    pub fn match_count(&self) -> usize {
        match self {
            Self::Showing { matches, .. } => matches.len(),
            _ => 0,
        }
    }

    /// Returns the highlighted match, if any.
    #[must_use]
    pub fn selected_match(&self) -> Option<&ImageMatch> {
        match self {
            Self::Showing { matches, selected } => matches.get(*selected),
            _ => None,
        }
    }

    /// Moves the highlight down, wrapping at the end.
    pub fn select_next(&mut self) {
        if let Self::Showing { matches, selected } = self
            && !matches.is_empty()
        {
            *selected = (*selected + 1) % matches.len();
        }
    }

    /// Moves the highlight up, wrapping at the start.
    pub fn select_previous(&mut self) {
        if let Self::Showing { matches, selected } = self
            && !matches.is_empty()
        {
            *selected = selected.checked_sub(1).unwrap_or(matches.len() - 1);
        }
    }
}

/// Widget drawing a [`PopupState`].
pub struct ImageSuggestionPopup<'a> {
    state: &'a PopupState,
    query: &'a str,
    theme: &'a Theme,
}

impl<'a> ImageSuggestionPopup<'a> {
    #[must_use]
    pub const fn new(state: &'a PopupState, query: &'a str, theme: &'a Theme) -> Self {
        Self {
            state,
            query,
            theme,
        }
    }

    /// Height in rows including borders.
    #[must_use]
    pub fn preferred_height(&self) -> u16 {
        match self.state {
            PopupState::Hidden => 0,
            PopupState::Loading | PopupState::NoMatches => 3,
            PopupState::Showing { matches, .. } => {
                // Bounded by MAX_POPUP_ROWS, so it fits in u16.
                #[allow(clippy::cast_possible_truncation)]
                let rows = matches.len().min(MAX_POPUP_ROWS) as u16;
                rows + 2
            }
        }
    }
}

impl Widget for ImageSuggestionPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if matches!(self.state, PopupState::Hidden) {
            return;
        }

        Clear.render(area, buf);

        let title = if self.query.trim().is_empty() {
            " Images ".to_string()
        } else {
            format!(" Images matching \"{}\" ", self.query.trim())
        };
        let block = Block::default()
            .title(title)
            .title_style(self.theme.header_style())
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        match self.state {
            PopupState::Hidden => {}
            PopupState::Loading => {
                Line::from("Searching...")
                    .style(self.theme.muted_style())
                    .render(inner, buf);
            }
            PopupState::NoMatches => {
                Line::from("No images found")
                    .style(self.theme.muted_style())
                    .render(inner, buf);
            }
            PopupState::Showing { matches, selected } => {
                let items: Vec<ListItem> = matches
                    .iter()
                    .enumerate()
                    .take(MAX_POPUP_ROWS)
                    .map(|(i, image)| {
                        let is_selected = i == *selected;
                        let style = if is_selected {
                            self.theme.focus_style()
                        } else {
                            self.theme.normal_style()
                        };
                        let prefix = if is_selected { "> " } else { "  " };
                        ListItem::new(Line::from(vec![
                            Span::styled(prefix, style),
                            Span::styled(image.path.display().to_string(), style),
                            Span::styled(format!("  {}", image.kind.label()), self.theme.muted_style()),
                        ]))
                    })
                    .collect();
                List::new(items).render(inner, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ImageKind;
    use anyhow::Result;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;

    fn matches(count: usize) -> Vec<ImageMatch> {
        (0..count)
            .map(|i| ImageMatch {
                path: PathBuf::from(format!("shots/img_{i}.png")),
                kind: ImageKind::Png,
                score: 100_u32.saturating_sub(u32::try_from(i).unwrap_or(u32::MAX)),
            })
            .collect()
    }

    fn showing(count: usize, selected: usize) -> PopupState {
        PopupState::Showing {
            matches: matches(count),
            selected,
        }
    }

    mod popup_state {
        use super::*;

        #[test]
        fn default_is_hidden() {
            let state = PopupState::default();
            assert!(!state.is_visible());
            assert_eq!(state.match_count(), 0);
            assert!(state.selected_match().is_none());
        }

        #[test]
        fn selection_wraps_both_ways() {
            let mut state = showing(3, 0);
            state.select_previous();
            assert_eq!(
                state.selected_match().map(|m| m.path.clone()),
                Some(PathBuf::from("shots/img_2.png"))
            );
            state.select_next();
            assert_eq!(
                state.selected_match().map(|m| m.path.clone()),
                Some(PathBuf::from("shots/img_0.png"))
            );
        }

        #[test]
        fn moving_without_matches_is_a_no_op() {
            let mut state = PopupState::Showing {
                matches: vec![],
                selected: 0,
            };
            state.select_next();
            state.select_previous();
            assert!(state.selected_match().is_none());

            let mut loading = PopupState::Loading;
            loading.select_next();
            assert_eq!(loading, PopupState::Loading);
        }

        #[test]
        fn preferred_height_tracks_state() {
            let theme = Theme::default();
            let hidden = PopupState::Hidden;
            assert_eq!(ImageSuggestionPopup::new(&hidden, "", &theme).preferred_height(), 0);
            let loading = PopupState::Loading;
            assert_eq!(ImageSuggestionPopup::new(&loading, "", &theme).preferred_height(), 3);
            let three = showing(3, 0);
            assert_eq!(ImageSuggestionPopup::new(&three, "", &theme).preferred_height(), 5);
        }

        #[test]
        fn preferred_height_caps_at_max_rows() -> Result<()> {
            let theme = Theme::default();
            let many = showing(30, 0);
            let expected = u16::try_from(MAX_POPUP_ROWS)? + 2;
            assert_eq!(ImageSuggestionPopup::new(&many, "", &theme).preferred_height(), expected);
            Ok(())
        }
    }

    mod rendering {
        use super::*;

        fn render_popup(state: &PopupState, query: &str) -> Result<Terminal<TestBackend>> {
            let mut terminal = Terminal::new(TestBackend::new(60, 14))?;
            let theme = Theme::default();
            terminal.draw(|f| {
                let popup = ImageSuggestionPopup::new(state, query, &theme);
                f.render_widget(popup, Rect::new(0, 0, 50, 12));
            })?;
            Ok(terminal)
        }

        fn row(terminal: &Terminal<TestBackend>, y: u16) -> String {
            let buffer = terminal.backend().buffer();
            (0..50).map(|x| buffer[(x, y)].symbol()).collect()
        }

        #[test]
        fn hidden_renders_nothing() -> Result<()> {
            let terminal = render_popup(&PopupState::Hidden, "")?;
            assert_eq!(row(&terminal, 0).trim(), "");
            Ok(())
        }

        #[test]
        fn no_matches_shows_message() -> Result<()> {
            let terminal = render_popup(&PopupState::NoMatches, "xyz")?;
            assert!(row(&terminal, 1).contains("No images found"));
            assert!(row(&terminal, 0).contains("\"xyz\""));
            Ok(())
        }

        #[test]
        fn showing_renders_paths_and_kind() -> Result<()> {
            let terminal = render_popup(&showing(3, 1), "")?;
            assert!(row(&terminal, 0).contains("Images"));
            assert!(row(&terminal, 1).contains("shots/img_0.png"));
            assert!(row(&terminal, 1).contains("PNG"));
            assert!(row(&terminal, 2).starts_with("│> "));
            Ok(())
        }
    }
}
