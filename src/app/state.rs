//! Application state structures.
//!
//! - **`AppEvent`**: messages from background tasks to the UI thread
//! - **`Screen`**: which screen the current state maps to
//! - **`AuthFormState`**: login and signup form fields and focus
//! - **`PickerState`**: image path input and suggestion list
//! - **`LayoutState`**: dynamic layout dimensions

use std::path::PathBuf;

use ratatui::style::Style;
use tokio::sync::mpsc;
use tui_textarea::TextArea;

use crate::app::layout::ScreenLayout;
use crate::core::{AuthView, ConfigurationError, ToolMode};
use crate::file_search::{ImageMatch, SearchResult};
use crate::tui::widgets::PopupState;

/// Mask shown in place of password characters.
pub const PASSWORD_MASK: char = '•';

/// Validation message for an empty required field.
pub const REQUIRED_FIELD_MESSAGE: &str = "Please fill out this field.";

/// Validation message for an email address without `@`.
pub const INVALID_EMAIL_MESSAGE: &str = "Please include an '@' in the email address.";

/// Events sent from background tasks to the UI.
#[derive(Debug)]
pub enum AppEvent {
    /// An inference request finished.
    InferenceFinished {
        /// Ticket of the request.
        ticket: u64,
        /// Result text, or the configuration error for the banner.
        outcome: Result<String, ConfigurationError>,
    },
    /// Image search result received from the background task.
    SearchResult {
        /// The generation of the search request (for cancellation).
        generation: u64,
        /// The search result containing matches.
        result: SearchResult,
    },
}

/// Query sent to the background image search task.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Typed path fragment.
    pub query: String,
    /// Directory to search.
    pub root: PathBuf,
    /// Generation counter for cancellation.
    pub generation: u64,
}

/// The screen shown for the current session and upload state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Signup,
    ToolSelect,
    /// Tool chosen, no file yet.
    Picker(ToolMode),
    /// File chosen, in any processing state.
    Preview(ToolMode),
}

/// Focusable items of the auth form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Email,
    Password,
    Submit,
    /// "Sign up" / "Login" link switching to the other view.
    SwitchLink,
}

impl AuthField {
    /// Focus order for `view`.
    #[must_use]
    pub const fn order(view: AuthView) -> &'static [AuthField] {
        match view {
            AuthView::Login => &[Self::Username, Self::Password, Self::Submit, Self::SwitchLink],
            AuthView::Signup => &[
                Self::Username,
                Self::Email,
                Self::Password,
                Self::Submit,
                Self::SwitchLink,
            ],
        }
    }

    /// Placeholder shown in an empty input.
    #[must_use]
    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::Submit | Self::SwitchLink => "",
        }
    }

    /// True for the text inputs.
    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(self, Self::Username | Self::Email | Self::Password)
    }
}

/// A validation failure pointing at the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    pub field: AuthField,
    pub message: &'static str,
}

/// Login or signup form.
///
/// The form is rebuilt whenever the view changes, so switching views
/// discards whatever was typed.
#[derive(Clone)]
pub struct AuthFormState {
    pub view: AuthView,
    pub focus: AuthField,
    pub username: TextArea<'static>,
    pub email: TextArea<'static>,
    pub password: TextArea<'static>,
    /// Message from the last rejected submit.
    pub error: Option<FormError>,
}

fn input_field(field: AuthField) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_placeholder_text(field.placeholder());
    textarea.set_cursor_line_style(Style::default());
    if field == AuthField::Password {
        textarea.set_mask_char(PASSWORD_MASK);
    }
    textarea
}

impl AuthFormState {
    /// Creates an empty form for `view`, focused on the first input.
    #[must_use]
    pub fn new(view: AuthView) -> Self {
        Self {
            view,
            focus: AuthField::Username,
            username: input_field(AuthField::Username),
            email: input_field(AuthField::Email),
            password: input_field(AuthField::Password),
            error: None,
        }
    }

    /// Moves focus to the next item, wrapping.
    pub fn focus_next(&mut self) {
        let order = AuthField::order(self.view);
        let index = self.focus_index();
        self.focus = order[(index + 1) % order.len()];
    }

    /// Moves focus to the previous item, wrapping.
    pub fn focus_previous(&mut self) {
        let order = AuthField::order(self.view);
        let index = self.focus_index();
        self.focus = order[index.checked_sub(1).unwrap_or(order.len() - 1)];
    }

    fn focus_index(&self) -> usize {
        AuthField::order(self.view)
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0)
    }

    /// Text area for `field`, if it is an input.
    #[must_use]
    pub const fn textarea(&self, field: AuthField) -> Option<&TextArea<'static>> {
        match field {
            AuthField::Username => Some(&self.username),
            AuthField::Email => Some(&self.email),
            AuthField::Password => Some(&self.password),
            AuthField::Submit | AuthField::SwitchLink => None,
        }
    }

    /// Text area with focus, if focus is on an input.
    pub fn focused_textarea_mut(&mut self) -> Option<&mut TextArea<'static>> {
        match self.focus {
            AuthField::Username => Some(&mut self.username),
            AuthField::Email => Some(&mut self.email),
            AuthField::Password => Some(&mut self.password),
            AuthField::Submit | AuthField::SwitchLink => None,
        }
    }

    /// Current value of `field`. Empty for non-inputs.
    #[must_use]
    pub fn value(&self, field: AuthField) -> String {
        self.textarea(field)
            .map(|t| t.lines().join(""))
            .unwrap_or_default()
    }

    /// Checks required fields in focus order and the email shape.
    ///
    /// # Errors
    ///
    /// Returns the first failing field with its message.
    pub fn validate(&self) -> Result<(), FormError> {
        for &field in AuthField::order(self.view).iter().filter(|f| f.is_input()) {
            let value = self.value(field);
            if value.trim().is_empty() {
                return Err(FormError {
                    field,
                    message: REQUIRED_FIELD_MESSAGE,
                });
            }
            if field == AuthField::Email && !value.contains('@') {
                return Err(FormError {
                    field,
                    message: INVALID_EMAIL_MESSAGE,
                });
            }
        }
        Ok(())
    }

    /// Label of the submit button.
    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        self.view.title()
    }

    /// The prompt and link text leading to the other view.
    #[must_use]
    pub const fn switch_prompt(&self) -> (&'static str, &'static str) {
        match self.view {
            AuthView::Login => ("Don't have an account? ", "Sign up"),
            AuthView::Signup => ("Already have an account? ", "Login"),
        }
    }
}

/// Image picker state.
#[derive(Clone)]
pub struct PickerState {
    /// Single-line path input.
    pub input: TextArea<'static>,
    /// Suggestion list.
    pub popup: PopupState,
    /// Directory searched and used to resolve relative paths.
    pub root: PathBuf,
    /// Query of the last search sent.
    pub(crate) last_query: Option<String>,
    /// Query the shown suggestions were searched for.
    pub(crate) shown_query: Option<String>,
    /// Channel sender for search queries to the background task.
    pub(crate) search_tx: mpsc::Sender<SearchQuery>,
    /// Current search generation (incremented for each new search).
    pub(crate) search_generation: u64,
}

/// Placeholder shown in the empty picker input.
pub const PICKER_PLACEHOLDER: &str = "Type or paste an image path...";

impl PickerState {
    #[must_use]
    pub fn new(root: PathBuf, search_tx: mpsc::Sender<SearchQuery>) -> Self {
        Self {
            input: Self::empty_input(),
            popup: PopupState::default(),
            root,
            last_query: None,
            shown_query: None,
            search_tx,
            search_generation: 0,
        }
    }

    fn empty_input() -> TextArea<'static> {
        let mut input = TextArea::default();
        input.set_placeholder_text(PICKER_PLACEHOLDER);
        input.set_cursor_line_style(Style::default());
        input
    }

    /// Current input text.
    #[must_use]
    pub fn query(&self) -> String {
        self.input.lines().join("")
    }

    /// Replaces the input text and moves the cursor to its end.
    pub fn set_query(&mut self, text: &str) {
        let mut input = Self::empty_input();
        input.insert_str(text);
        self.input = input;
    }

    /// Highlighted suggestion, if the list belongs to the current input.
    ///
    /// Suggestions from an older query stay on screen until the next result
    /// arrives, but they are never picked for the newer text.
    #[must_use]
    pub fn current_match(&self) -> Option<&ImageMatch> {
        if self.shown_query.as_deref() != Some(self.query().as_str()) {
            return None;
        }
        self.popup.selected_match()
    }

    /// Clears the input and suggestions, keeping the channel.
    pub fn reset(&mut self) {
        self.input = Self::empty_input();
        self.popup = PopupState::Hidden;
        self.last_query = None;
        self.shown_query = None;
    }
}

/// Dynamic layout dimensions, updated each frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutState {
    pub screen: ScreenLayout,
    /// Inner width of the result card (excluding borders and scrollbar).
    pub result_content_width: usize,
    /// Inner height of the result card.
    pub result_visible_height: usize,
}
