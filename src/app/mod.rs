//! Main application state and logic.
//!
//! This module contains the core App struct and its implementation,
//! organized into submodules:
//! - `events` - Key, paste and background event handling
//! - `layout` - Layout calculation
//! - `render` - UI rendering
//! - `state` - Application state structures
//!
//! ## Screens
//!
//! The screen is derived from the session and upload state, never stored:
//!
//! - **`Login`** / **`Signup`**: mock auth forms shown while logged out
//! - **`ToolSelect`**: two tool cards
//! - **`Picker`**: path input with image suggestions
//! - **`Preview`**: thumbnail, process button, error banner and result card

pub mod events;
mod layout;
mod render;
pub mod state;

#[cfg(test)]
mod tests;

pub use layout::{
    PreviewLayout, ScreenLayout, calculate_preview_layout, calculate_screen_layout, centered_rect,
};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::core::{
    AuthView, InferenceBackend, InferenceJob, PreviewRegistry, SelectedImage, Selection, Session,
    SessionAction, ToolMode, UploadAction, UploadState, infer,
};
use crate::tui::Theme;
use crate::tui::widgets::PopupState;

pub use self::state::{
    AppEvent, AuthField, AuthFormState, FormError, LayoutState, PickerState, Screen, SearchQuery,
};

/// Channel buffer size for app events.
const EVENT_CHANNEL_SIZE: usize = 64;

/// Main loop iterations per animation frame (the loop polls every 50ms).
const FRAMES_PER_ANIMATION_STEP: u64 = 3;

/// Main application state.
pub struct App {
    // =========================================================================
    // Shared State
    // =========================================================================
    /// Theme for styling.
    pub(crate) theme: Theme,
    /// Mock authentication state.
    pub(crate) session: Session,
    /// Tool and upload flow.
    pub(crate) upload: UploadState,
    /// Registry backing preview handles.
    pub(crate) previews: PreviewRegistry,
    /// Inference backend shared with request tasks.
    pub(crate) backend: Arc<dyn InferenceBackend>,
    /// Should quit flag.
    should_quit: bool,
    /// Main loop iteration counter, drives animations.
    frame: u64,

    // =========================================================================
    // Event Channels
    // =========================================================================
    /// Event receiver for background task events.
    event_rx: mpsc::Receiver<AppEvent>,
    /// Event sender (cloned into background tasks).
    event_tx: mpsc::Sender<AppEvent>,

    // =========================================================================
    // Component States
    // =========================================================================
    /// Login/signup form.
    pub(crate) auth_form: AuthFormState,
    /// Highlighted card on the tool menu.
    pub(crate) tool_highlight: ToolMode,
    /// Image picker.
    pub(crate) picker: PickerState,
    /// First visible line of the result card.
    pub(crate) result_scroll: usize,
    /// Dynamic layout dimensions.
    pub(crate) layout: LayoutState,
}

/// Spawns a background task that handles image search queries.
///
/// The walk runs in a blocking task. Results carry the query's generation so
/// the UI can drop stale ones.
fn spawn_search_task(
    mut search_rx: mpsc::Receiver<SearchQuery>,
    event_tx: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        while let Some(query) = search_rx.recv().await {
            let generation = query.generation;
            let search_result = tokio::task::spawn_blocking(move || {
                crate::file_search::search_images(&query.query, &query.root)
            })
            .await;

            match search_result {
                Ok(result) => {
                    let _ = event_tx
                        .send(AppEvent::SearchResult { generation, result })
                        .await;
                }
                Err(e) => tracing::error!("image search task failed: {e}"),
            }
        }
    });
}

impl App {
    /// Creates the application in the logged-out login view.
    ///
    /// Must be called inside a tokio runtime: the image search task is
    /// spawned here.
    #[must_use]
    pub fn new(config: &Config, backend: Arc<dyn InferenceBackend>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
        let (search_tx, search_rx) = mpsc::channel(16);
        spawn_search_task(search_rx, event_tx.clone());

        tracing::info!(
            backend = backend.name(),
            model = %config.model,
            picker_root = %config.picker_root.display(),
            "application started"
        );

        Self {
            theme: Theme::default(),
            session: Session::default(),
            upload: UploadState::new(),
            previews: PreviewRegistry::new(),
            backend,
            should_quit: false,
            frame: 0,
            event_rx,
            event_tx,
            auth_form: AuthFormState::new(AuthView::default()),
            tool_highlight: ToolMode::default(),
            picker: PickerState::new(config.picker_root.clone(), search_tx),
            result_scroll: 0,
            layout: LayoutState::default(),
        }
    }

    /// Returns true if the application should quit.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Requests exit at the end of the current loop iteration.
    pub(crate) fn quit(&mut self) {
        tracing::info!("quit requested");
        self.should_quit = true;
    }

    /// Advances animations. Called once per main loop iteration.
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    /// Current animation step for spinners and loading dots.
    #[must_use]
    pub const fn animation_step(&self) -> u64 {
        self.frame / FRAMES_PER_ANIMATION_STEP
    }

    /// Returns the screen for the current state.
    #[must_use]
    pub fn screen(&self) -> Screen {
        match self.session.auth_view() {
            Some(AuthView::Login) => return Screen::Login,
            Some(AuthView::Signup) => return Screen::Signup,
            None => {}
        }
        match (self.upload.mode(), self.upload.selection()) {
            (None, _) => Screen::ToolSelect,
            (Some(mode), None) => Screen::Picker(mode),
            (Some(mode), Some(_)) => Screen::Preview(mode),
        }
    }

    /// Read access to the upload flow.
    #[must_use]
    pub const fn upload(&self) -> &UploadState {
        &self.upload
    }

    /// Read access to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Registry tracking live preview handles.
    #[must_use]
    pub const fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Updates cached layout dimensions for `terminal_area`.
    ///
    /// Called inside the draw closure so it sees the same area as rendering.
    pub fn update_layout(&mut self, terminal_area: Rect) {
        let screen = calculate_screen_layout(terminal_area);
        let preview = calculate_preview_layout(screen.body, self.upload.error().is_some());
        self.layout = LayoutState {
            screen,
            // Borders on both sides plus the scrollbar column.
            result_content_width: usize::from(preview.result.width.saturating_sub(3)),
            result_visible_height: usize::from(preview.result.height.saturating_sub(2)),
        };
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Applies a session action, rebuilding the form when the view changes.
    pub(crate) fn dispatch_session(&mut self, action: SessionAction) {
        let before = self.session.auth_view();
        self.session.apply(action);
        let after = self.session.auth_view();
        if before != after {
            self.auth_form = AuthFormState::new(after.unwrap_or_default());
        }
    }

    /// Switches between the login and signup views.
    pub(crate) fn switch_auth_view(&mut self) {
        let action = match self.session.auth_view() {
            Some(AuthView::Login) => SessionAction::SwitchToSignup,
            Some(AuthView::Signup) => SessionAction::SwitchToLogin,
            None => return,
        };
        self.dispatch_session(action);
    }

    /// Validates the form and submits it. Invalid forms move focus to the
    /// first offending field and show its message.
    pub(crate) fn submit_auth_form(&mut self) {
        let Some(view) = self.session.auth_view() else {
            return;
        };
        if let Err(error) = self.auth_form.validate() {
            tracing::debug!(field = ?error.field, "auth form rejected");
            self.auth_form.focus = error.field;
            self.auth_form.error = Some(error);
            return;
        }
        let action = match view {
            AuthView::Login => SessionAction::SubmitLogin,
            AuthView::Signup => SessionAction::SubmitSignup,
        };
        // Leaving the form view also drops the typed credentials.
        self.dispatch_session(action);
    }

    // =========================================================================
    // Upload Flow
    // =========================================================================

    fn dispatch_upload(&mut self, action: UploadAction) -> Option<InferenceJob> {
        self.result_scroll = 0;
        self.upload.apply(action)
    }

    /// Selects a tool and opens the picker.
    pub(crate) fn select_tool(&mut self, mode: ToolMode) {
        self.tool_highlight = mode;
        self.dispatch_upload(UploadAction::SelectMode(mode));
        self.open_picker();
    }

    /// Returns to the tool menu, releasing any selected file.
    pub(crate) fn choose_different_tool(&mut self) {
        self.dispatch_upload(UploadAction::ChooseDifferentTool);
        self.picker.reset();
    }

    /// Releases the selected file and reopens the picker.
    pub(crate) fn change_image(&mut self) {
        self.dispatch_upload(UploadAction::ChangeImage);
        self.open_picker();
    }

    fn open_picker(&mut self) {
        self.picker.reset();
        self.perform_image_search("");
    }

    /// Resolves `path` against the picker root.
    #[must_use]
    pub fn resolve_picker_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.picker.root.join(path)
        }
    }

    /// Loads `path` and selects it.
    ///
    /// Missing, unreadable and unsupported files are ignored. Returns true if
    /// the file was selected.
    pub fn select_file_path(&mut self, path: &Path) -> bool {
        if self.upload.mode().is_none() {
            return false;
        }
        let resolved = self.resolve_picker_path(path);
        let image = match SelectedImage::load(&resolved) {
            Ok(image) => image,
            Err(e) => {
                tracing::debug!("ignoring file selection: {e:#}");
                return false;
            }
        };
        let preview = self.previews.acquire(&image);
        self.dispatch_upload(UploadAction::SelectFile(Selection { image, preview }));
        self.upload.selection().is_some()
    }

    /// Starts processing the selected image, if allowed.
    ///
    /// The request runs on a tokio task and reports back through the event
    /// channel.
    pub fn process_image(&mut self) {
        let Some(job) = self.dispatch_upload(UploadAction::Process) else {
            return;
        };
        let backend = Arc::clone(&self.backend);
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let InferenceJob { ticket, request } = job;
            let outcome = infer(backend.as_ref(), &request).await;
            if event_tx
                .send(AppEvent::InferenceFinished { ticket, outcome })
                .await
                .is_err()
            {
                tracing::debug!(ticket, "inference finished after shutdown");
            }
        });
    }

    /// Releases every live preview. Called once at exit.
    pub fn teardown(&mut self) {
        self.upload = UploadState::new();
        self.picker.reset();
        let live = self.previews.live_count();
        if live == 0 {
            tracing::info!(
                acquired = self.previews.acquired(),
                released = self.previews.released(),
                "teardown complete"
            );
        } else {
            tracing::warn!(live, "preview handles still live at teardown");
        }
    }

    // =========================================================================
    // Picker
    // =========================================================================

    /// Sends a search for the picker input if it changed.
    pub(crate) fn update_image_search(&mut self) {
        let query = self.picker.query();
        if self.picker.last_query.as_deref() != Some(query.as_str()) {
            self.perform_image_search(&query);
        }
    }

    pub(crate) fn perform_image_search(&mut self, query: &str) {
        if self.picker.last_query.as_deref() != Some(query)
            && let PopupState::Showing { selected, .. } = &mut self.picker.popup
        {
            *selected = 0;
        }
        self.picker.last_query = Some(query.to_string());
        self.picker.search_generation = self.picker.search_generation.wrapping_add(1);
        if !matches!(self.picker.popup, PopupState::Showing { .. }) {
            self.picker.popup = PopupState::Loading;
        }

        let search_query = SearchQuery {
            query: query.to_string(),
            root: self.picker.root.clone(),
            generation: self.picker.search_generation,
        };
        if let Err(e) = self.picker.search_tx.try_send(search_query) {
            tracing::warn!("image search not queued: {e}");
        }
    }

    /// Path the picker would select on Enter: the highlighted suggestion for
    /// the current input, or the typed text otherwise.
    #[must_use]
    pub fn picker_target(&self) -> Option<PathBuf> {
        if let Some(image) = self.picker.current_match() {
            return Some(image.path.clone());
        }
        let typed = clean_typed_path(&self.picker.query());
        (!typed.is_empty()).then(|| PathBuf::from(typed))
    }
}

/// Trims whitespace and surrounding quotes from a typed or pasted path.
#[must_use]
pub fn clean_typed_path(text: &str) -> String {
    let trimmed = text.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}
