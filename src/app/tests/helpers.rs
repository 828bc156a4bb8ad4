//! Shared test utilities for the app module.
//!
//! This module provides helper functions and utilities for testing:
//! - `create_test_app` - Creates an `App` without background tasks
//! - `MockBackend` - Inference backend with a canned reply and optional gate
//! - `write_png` - Writes a real PNG into a temporary directory
//! - `render_app_to_terminal` - Renders the app to a `TestBackend`
//! - Key event helpers (`key`, `char_key`, `ctrl_key`, `type_text`)

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use tokio::sync::Notify;

use crate::app::{App, AuthFormState, LayoutState, PickerState};
use crate::core::preview::test_support::solid_png;
use crate::core::{
    AuthView, ConfigurationError, InferenceBackend, InferenceError, InferenceRequest,
    PreviewRegistry, Session, ToolMode, UploadState,
};
use crate::tui::Theme;

/// Creates a [`KeyEvent`] for `code` with no modifiers.
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

/// Creates a [`KeyEvent`] for a character key with no modifiers.
pub fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

/// Creates a [`KeyEvent`] for `Ctrl+c`.
pub fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

/// Sends each character of `text` as a key press.
pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(char_key(c));
    }
}

/// What a [`MockBackend`] answers.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(&'static str),
    MissingKey,
    ApiError(&'static str),
}

/// Backend returning a canned reply and counting calls.
///
/// With a gate, each reply waits for `release()`.
pub struct MockBackend {
    reply: MockReply,
    gate: Option<Arc<Notify>>,
    calls: AtomicU32,
}

impl MockBackend {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            gate: None,
            calls: AtomicU32::new(0),
        }
    }

    pub fn gated(reply: MockReply) -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::new(reply)
        }
    }

    /// Lets one gated reply through.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn generate(&self, _request: &InferenceRequest) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            MockReply::Text(text) => Ok((*text).to_string()),
            MockReply::MissingKey => Err(ConfigurationError::MissingApiKey("API_KEY").into()),
            MockReply::ApiError(message) => Err(InferenceError::Api {
                status: 400,
                message: (*message).to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Creates a logged-out `App` searching `root`.
///
/// No background search task runs: tests deliver search results through the
/// event channel themselves.
pub fn create_test_app_with(backend: Arc<dyn InferenceBackend>, root: PathBuf) -> App {
    let (event_tx, event_rx) = tokio::sync::mpsc::channel(64);
    let (search_tx, _search_rx) = tokio::sync::mpsc::channel(16);
    App {
        theme: Theme::default(),
        session: Session::default(),
        upload: UploadState::new(),
        previews: PreviewRegistry::new(),
        backend,
        should_quit: false,
        frame: 0,
        event_rx,
        event_tx,
        auth_form: AuthFormState::new(AuthView::Login),
        tool_highlight: ToolMode::TextExtract,
        picker: PickerState::new(root, search_tx),
        result_scroll: 0,
        layout: LayoutState::default(),
    }
}

/// Creates a logged-out `App` with a backend that answers "ok".
pub fn create_test_app() -> App {
    create_test_app_with(
        Arc::new(MockBackend::new(MockReply::Text("ok"))),
        std::env::temp_dir(),
    )
}

/// Creates an `App` that is already past the login form.
pub fn logged_in_app(backend: Arc<dyn InferenceBackend>, root: PathBuf) -> App {
    let mut app = create_test_app_with(backend, root);
    app.dispatch_session(crate::core::SessionAction::SubmitLogin);
    app
}

/// Writes a small solid PNG named `name` into `dir` and returns its path.
pub fn write_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, solid_png(4, 4, [200, 30, 30])).unwrap();
    path
}

/// Processes events until `done` holds or a second passes.
pub async fn pump_until(app: &mut App, done: impl Fn(&App) -> bool) {
    for _ in 0..100 {
        app.process_events();
        if done(app) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

/// Renders the app to a `TestBackend` terminal.
///
/// This function mimics the main loop behavior by calling `update_layout()`
/// before rendering, ensuring the cached layout is properly initialized.
///
/// # Errors
///
/// Returns an error if terminal creation or rendering fails.
pub fn render_app_to_terminal(
    app: &mut App,
    width: u16,
    height: u16,
) -> Result<Terminal<TestBackend>> {
    use ratatui::layout::Rect;

    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend)?;

    app.update_layout(Rect::new(0, 0, width, height));
    terminal.draw(|f| app.render(f))?;

    Ok(terminal)
}

/// Flattens the rendered buffer into one string per row.
pub fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let width = buffer.area().width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
