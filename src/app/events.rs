//! Event handling logic for the App.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::App;
use crate::app::state::{AppEvent, AuthField, Screen};
use crate::core::{ToolMode, UploadAction};
use crate::file_search::SearchResult;
use crate::tui::widgets::{PopupState, visual_line_count};

/// Scroll page size for navigation.
const SCROLL_PAGE_SIZE: usize = 10;

/// Removes line breaks and control characters from pasted text.
///
/// Every input in the app is single-line, so newlines are dropped rather
/// than converted.
fn single_line(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

impl App {
    /// Handles pasted text from bracketed paste mode.
    ///
    /// Pasted text goes to the focused auth input or to the picker input.
    /// Other screens ignore it.
    pub fn handle_paste(&mut self, text: &str) {
        let filtered = single_line(text);
        if filtered.is_empty() {
            return;
        }

        match self.screen() {
            Screen::Login | Screen::Signup => {
                if let Some(textarea) = self.auth_form.focused_textarea_mut() {
                    textarea.insert_str(&filtered);
                    self.auth_form.error = None;
                }
            }
            Screen::Picker(_) => {
                self.picker.input.insert_str(&filtered);
                self.update_image_search();
            }
            Screen::ToolSelect | Screen::Preview(_) => {}
        }
    }

    /// Handles a key event.
    ///
    /// `Ctrl+C` quits from every screen; everything else is dispatched on
    /// the current screen.
    pub fn handle_key(&mut self, key: KeyEvent) {
        tracing::trace!(code = ?key.code, modifiers = ?key.modifiers, "key");

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        match self.screen() {
            Screen::Login | Screen::Signup => self.handle_auth_key(key),
            Screen::ToolSelect => self.handle_tool_select_key(key),
            Screen::Picker(_) => self.handle_picker_key(key),
            Screen::Preview(_) => self.handle_preview_key(key),
        }
    }

    /// Handles key events on the login and signup forms.
    ///
    /// ## Key Bindings
    ///
    /// - `Tab` / `Down` - Next field (wraps around)
    /// - `Shift+Tab` / `Up` - Previous field (wraps around)
    /// - `Enter` - Submit, or switch view when the link is focused
    /// - `Ctrl+T` - Switch between login and signup
    /// - `Esc` - Quit
    fn handle_auth_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.auth_form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.auth_form.focus_previous(),
            KeyCode::Enter => {
                if self.auth_form.focus == AuthField::SwitchLink {
                    self.switch_auth_view();
                } else {
                    self.submit_auth_form();
                }
            }
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.switch_auth_view();
            }
            KeyCode::Esc => self.quit(),
            _ => {
                if let Some(textarea) = self.auth_form.focused_textarea_mut()
                    && textarea.input(key)
                {
                    self.auth_form.error = None;
                }
            }
        }
    }

    /// Handles key events on the tool menu.
    fn handle_tool_select_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.tool_highlight = self.tool_highlight.toggle();
            }
            KeyCode::Char('1' | 't') => self.select_tool(ToolMode::TextExtract),
            KeyCode::Char('2' | 'c') => self.select_tool(ToolMode::Caption),
            KeyCode::Enter => self.select_tool(self.tool_highlight),
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            _ => {}
        }
    }

    /// Handles key events in the image picker.
    ///
    /// Keys not bound here edit the path input and refresh the suggestions.
    fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.choose_different_tool(),
            KeyCode::Up => self.picker.popup.select_previous(),
            KeyCode::Down => self.picker.popup.select_next(),
            KeyCode::Tab => {
                if let Some(image) = self.picker.popup.selected_match() {
                    let text = image.path.display().to_string();
                    self.picker.set_query(&text);
                    self.update_image_search();
                }
            }
            KeyCode::Enter => {
                if let Some(path) = self.picker_target() {
                    self.select_file_path(&path);
                }
            }
            _ => {
                if self.picker.input.input(key) {
                    self.update_image_search();
                }
            }
        }
    }

    /// Handles key events on the preview screen.
    fn handle_preview_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('p') => self.process_image(),
            KeyCode::Char('c') => self.change_image(),
            KeyCode::Esc | KeyCode::Char('b') => self.choose_different_tool(),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_result_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_result_down(1),
            KeyCode::PageUp => self.scroll_result_up(SCROLL_PAGE_SIZE),
            KeyCode::PageDown => self.scroll_result_down(SCROLL_PAGE_SIZE),
            KeyCode::Home => self.result_scroll = 0,
            KeyCode::End => self.result_scroll = self.max_result_scroll(),
            _ => {}
        }
    }

    // =========================================================================
    // Result Scrolling
    // =========================================================================

    fn scroll_result_up(&mut self, lines: usize) {
        self.result_scroll = self.result_scroll.saturating_sub(lines);
    }

    fn scroll_result_down(&mut self, lines: usize) {
        self.result_scroll = (self.result_scroll + lines).min(self.max_result_scroll());
    }

    /// Largest useful scroll offset for the current result and card size.
    pub(crate) fn max_result_scroll(&self) -> usize {
        let Some(text) = self.upload.result() else {
            return 0;
        };
        visual_line_count(text, self.layout.result_content_width)
            .saturating_sub(self.layout.result_visible_height)
    }

    // =========================================================================
    // Background Events
    // =========================================================================

    /// Processes pending background events.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::InferenceFinished { ticket, outcome } => {
                    self.result_scroll = 0;
                    self.upload.apply(UploadAction::Finished { ticket, outcome });
                }
                AppEvent::SearchResult { generation, result } => {
                    self.handle_search_result(generation, result);
                }
            }
        }
    }

    /// Handles a search result from the background task.
    ///
    /// Only the result of the latest search is applied.
    fn handle_search_result(&mut self, generation: u64, result: SearchResult) {
        if generation != self.picker.search_generation {
            return;
        }
        if result.had_errors {
            tracing::debug!(
                inaccessible = result.inaccessible_dirs,
                "image search skipped unreadable entries"
            );
        }

        let matches = result.matches;
        self.picker.shown_query.clone_from(&self.picker.last_query);
        self.picker.popup = if matches.is_empty() {
            PopupState::NoMatches
        } else {
            let selected = if let PopupState::Showing {
                selected: prev_selected,
                ..
            } = &self.picker.popup
            {
                (*prev_selected).min(matches.len().saturating_sub(1))
            } else {
                0
            };
            PopupState::Showing { matches, selected }
        };
    }
}
