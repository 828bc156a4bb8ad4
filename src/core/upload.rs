//! Tool mode and upload flow.
//!
//! [`UploadState`] is a reducer: [`UploadState::apply`] takes an
//! [`UploadAction`] and returns an [`InferenceJob`] when the caller has to
//! start a request. The state never performs I/O itself.
//!
//! ```text
//! ModeUnselected -> ModeSelected -> FileSelected -> Processing -> Completed | Failed
//! ```
//!
//! Each request gets a ticket. A completion is applied only if its ticket is
//! still the one being displayed; otherwise the user moved on and it is
//! dropped. The in-flight slot is freed by the matching completion either
//! way, so at most one request exists at a time.

use super::ToolMode;
use super::file::SelectedImage;
use super::inference::{ConfigurationError, InferenceRequest};
use super::preview::PreviewHandle;

/// A selected file together with its preview handle.
#[derive(Debug)]
pub struct Selection {
    pub image: SelectedImage,
    pub preview: PreviewHandle,
}

/// Transitions accepted by [`UploadState::apply`].
#[derive(Debug)]
pub enum UploadAction {
    SelectMode(ToolMode),
    SelectFile(Selection),
    ChangeImage,
    ChooseDifferentTool,
    Process,
    Finished {
        ticket: u64,
        outcome: Result<String, ConfigurationError>,
    },
}

/// A request the caller must run, then report back with
/// [`UploadAction::Finished`] carrying the same ticket.
#[derive(Debug, Clone)]
pub struct InferenceJob {
    pub ticket: u64,
    pub request: InferenceRequest,
}

/// Observable phase of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    ModeUnselected,
    ModeSelected(ToolMode),
    FileSelected(ToolMode),
    Processing(ToolMode),
    Completed(ToolMode),
    Failed(ToolMode),
}

/// State of the tool screen.
#[derive(Debug, Default)]
pub struct UploadState {
    mode: Option<ToolMode>,
    selection: Option<Selection>,
    result: Option<String>,
    error: Option<String>,
    /// Ticket whose completion is shown as loading.
    loading: Option<u64>,
    /// Ticket of the request still running, displayed or not.
    in_flight: Option<u64>,
    last_ticket: u64,
}

impl UploadState {
    /// Creates the initial state with no tool selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a transition and returns the request to start, if any.
    pub fn apply(&mut self, action: UploadAction) -> Option<InferenceJob> {
        match action {
            UploadAction::SelectMode(mode) => {
                if self.mode.is_none() {
                    tracing::info!(tool = mode.title(), "tool selected");
                    self.mode = Some(mode);
                } else {
                    tracing::debug!(tool = mode.title(), "tool already selected");
                }
                None
            }
            UploadAction::SelectFile(selection) => {
                if self.mode.is_none() {
                    tracing::debug!("ignoring file selection without a tool");
                    return None;
                }
                tracing::info!(
                    name = %selection.image.name,
                    mime_type = selection.image.kind.mime_type(),
                    bytes = selection.image.len(),
                    "image selected"
                );
                // Replacing the selection drops the previous preview handle.
                self.selection = Some(selection);
                self.clear_outcome();
                None
            }
            UploadAction::ChangeImage => {
                self.selection = None;
                self.clear_outcome();
                None
            }
            UploadAction::ChooseDifferentTool => {
                self.selection = None;
                self.mode = None;
                self.clear_outcome();
                None
            }
            UploadAction::Process => self.start_processing(),
            UploadAction::Finished { ticket, outcome } => {
                self.finish(ticket, outcome);
                None
            }
        }
    }

    fn start_processing(&mut self) -> Option<InferenceJob> {
        if let Some(ticket) = self.in_flight {
            tracing::debug!(ticket, "process rejected: request already in flight");
            return None;
        }
        let (Some(mode), Some(selection)) = (self.mode, self.selection.as_ref()) else {
            tracing::debug!("process rejected: no tool or file selected");
            return None;
        };

        self.last_ticket += 1;
        let ticket = self.last_ticket;
        let request = InferenceRequest {
            image_bytes: selection.image.bytes.clone(),
            mime_type: selection.image.kind.mime_type(),
            prompt: mode.prompt(),
        };
        self.result = None;
        self.error = None;
        self.loading = Some(ticket);
        self.in_flight = Some(ticket);
        tracing::info!(ticket, tool = mode.title(), "processing image");
        Some(InferenceJob { ticket, request })
    }

    fn finish(&mut self, ticket: u64, outcome: Result<String, ConfigurationError>) {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
        if self.loading != Some(ticket) {
            tracing::debug!(ticket, "discarding stale inference result");
            return;
        }
        self.loading = None;
        match outcome {
            Ok(text) => self.result = Some(text),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn clear_outcome(&mut self) {
        self.result = None;
        self.error = None;
        self.loading = None;
    }

    /// Selected tool, if any.
    #[must_use]
    pub const fn mode(&self) -> Option<ToolMode> {
        self.mode
    }

    /// Current file and preview, if a file is selected.
    #[must_use]
    pub const fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Result text of the last completed request.
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Error banner text of the last failed request.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while the displayed request has not completed.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// True while any request is running, including one the user navigated
    /// away from.
    #[must_use]
    pub const fn has_request_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True if [`UploadAction::Process`] would start a request.
    #[must_use]
    pub const fn can_process(&self) -> bool {
        self.mode.is_some() && self.selection.is_some() && self.in_flight.is_none()
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> UploadPhase {
        let Some(mode) = self.mode else {
            return UploadPhase::ModeUnselected;
        };
        if self.selection.is_none() {
            return UploadPhase::ModeSelected(mode);
        }
        if self.loading.is_some() {
            UploadPhase::Processing(mode)
        } else if self.error.is_some() {
            UploadPhase::Failed(mode)
        } else if self.result.is_some() {
            UploadPhase::Completed(mode)
        } else {
            UploadPhase::FileSelected(mode)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::core::file::ImageKind;
    use crate::core::preview::PreviewRegistry;
    use crate::core::{CAPTION_PROMPT, EXTRACT_TEXT_PROMPT};

    fn selection(registry: &PreviewRegistry, name: &str, bytes: &[u8]) -> Selection {
        let image = SelectedImage::from_bytes(name, ImageKind::Png, bytes.to_vec());
        let preview = registry.acquire(&image);
        Selection { image, preview }
    }

    fn with_file(mode: ToolMode, registry: &PreviewRegistry) -> UploadState {
        let mut state = UploadState::new();
        state.apply(UploadAction::SelectMode(mode));
        state.apply(UploadAction::SelectFile(selection(registry, "a.png", b"a")));
        state
    }

    #[test]
    fn starts_unselected() {
        let state = UploadState::new();
        assert_eq!(state.phase(), UploadPhase::ModeUnselected);
        assert!(!state.can_process());
    }

    #[test]
    fn select_mode_then_file() {
        let registry = PreviewRegistry::new();
        let mut state = UploadState::new();
        state.apply(UploadAction::SelectMode(ToolMode::Caption));
        assert_eq!(state.phase(), UploadPhase::ModeSelected(ToolMode::Caption));

        state.apply(UploadAction::SelectFile(selection(&registry, "a.png", b"a")));
        assert_eq!(state.phase(), UploadPhase::FileSelected(ToolMode::Caption));
        assert_eq!(state.selection().unwrap().image.name, "a.png");
        assert!(state.can_process());
    }

    #[test]
    fn second_select_mode_is_ignored() {
        let mut state = UploadState::new();
        state.apply(UploadAction::SelectMode(ToolMode::Caption));
        state.apply(UploadAction::SelectMode(ToolMode::TextExtract));
        assert_eq!(state.mode(), Some(ToolMode::Caption));
    }

    #[test]
    fn file_without_mode_is_dropped_and_released() {
        let registry = PreviewRegistry::new();
        let mut state = UploadState::new();
        state.apply(UploadAction::SelectFile(selection(&registry, "a.png", b"a")));
        assert!(state.selection().is_none());
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.released(), 1);
    }

    #[test]
    fn reselecting_file_releases_previous_preview() {
        let registry = PreviewRegistry::new();
        let mut state = with_file(ToolMode::Caption, &registry);
        let first_id = state.selection().unwrap().preview.id();

        state.apply(UploadAction::SelectFile(selection(&registry, "b.png", b"b")));

        assert!(!registry.is_live(first_id));
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.acquired(), 2);
        assert_eq!(registry.released(), 1);
    }

    #[test]
    fn change_image_releases_preview() {
        let registry = PreviewRegistry::new();
        let mut state = with_file(ToolMode::TextExtract, &registry);

        state.apply(UploadAction::ChangeImage);

        assert_eq!(state.phase(), UploadPhase::ModeSelected(ToolMode::TextExtract));
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.acquired(), registry.released());

        // Nothing left to release.
        state.apply(UploadAction::ChangeImage);
        assert_eq!(registry.released(), 1);
    }

    #[test]
    fn choose_different_tool_from_completed_resets_everything() {
        let registry = PreviewRegistry::new();
        let mut state = with_file(ToolMode::Caption, &registry);
        let job = state.apply(UploadAction::Process).unwrap();
        state.apply(UploadAction::Finished {
            ticket: job.ticket,
            outcome: Ok("A cat sitting on a mat.".to_string()),
        });
        assert_eq!(state.phase(), UploadPhase::Completed(ToolMode::Caption));

        state.apply(UploadAction::ChooseDifferentTool);

        assert_eq!(state.phase(), UploadPhase::ModeUnselected);
        assert!(state.mode().is_none());
        assert!(state.selection().is_none());
        assert!(state.result().is_none());
        assert!(state.error().is_none());
        assert!(!state.is_loading());
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn process_builds_request_with_mode_prompt() {
        for (mode, prompt) in [
            (ToolMode::TextExtract, EXTRACT_TEXT_PROMPT),
            (ToolMode::Caption, CAPTION_PROMPT),
        ] {
            let registry = PreviewRegistry::new();
            let mut state = with_file(mode, &registry);
            let job = state.apply(UploadAction::Process).unwrap();
            assert_eq!(job.request.prompt, prompt);
            assert_eq!(job.request.mime_type, "image/png");
            assert_eq!(&*job.request.image_bytes, b"a");
            assert_eq!(state.phase(), UploadPhase::Processing(mode));
            assert!(state.is_loading());
            assert!(state.result().is_none() && state.error().is_none());
        }
    }

    #[test]
    fn prompt_is_independent_of_file_content() {
        let registry = PreviewRegistry::new();
        let mut state = UploadState::new();
        state.apply(UploadAction::SelectMode(ToolMode::TextExtract));
        for bytes in [&b"one"[..], &b"two"[..], &b""[..]] {
            state.apply(UploadAction::SelectFile(selection(&registry, "x.png", bytes)));
            let job = state.apply(UploadAction::Process).unwrap();
            assert_eq!(job.request.prompt, EXTRACT_TEXT_PROMPT);
            state.apply(UploadAction::Finished {
                ticket: job.ticket,
                outcome: Ok(String::new()),
            });
        }
    }

    #[test]
    fn process_without_file_is_rejected() {
        let mut state = UploadState::new();
        assert!(state.apply(UploadAction::Process).is_none());
        state.apply(UploadAction::SelectMode(ToolMode::Caption));
        assert!(state.apply(UploadAction::Process).is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn process_while_loading_is_rejected() {
        let registry = PreviewRegistry::new();
        let mut state = with_file(ToolMode::Caption, &registry);
        let first = state.apply(UploadAction::Process).unwrap();

        assert!(state.apply(UploadAction::Process).is_none());
        assert!(!state.can_process());

        state.apply(UploadAction::Finished {
            ticket: first.ticket,
            outcome: Ok("done".to_string()),
        });
        assert!(state.can_process());
        let second = state.apply(UploadAction::Process).unwrap();
        assert_ne!(first.ticket, second.ticket);
    }

    #[test]
    fn success_completes_with_result() {
        let registry = PreviewRegistry::new();
        let mut state = with_file(ToolMode::Caption, &registry);
        let job = state.apply(UploadAction::Process).unwrap();

        state.apply(UploadAction::Finished {
            ticket: job.ticket,
            outcome: Ok("A cat sitting on a mat.".to_string()),
        });

        assert_eq!(state.phase(), UploadPhase::Completed(ToolMode::Caption));
        assert_eq!(state.result(), Some("A cat sitting on a mat."));
        assert!(state.error().is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn configuration_error_fails_with_banner() {
        let registry = PreviewRegistry::new();
        let mut state = with_file(ToolMode::TextExtract, &registry);
        let job = state.apply(UploadAction::Process).unwrap();

        state.apply(UploadAction::Finished {
            ticket: job.ticket,
            outcome: Err(ConfigurationError::MissingApiKey("API_KEY")),
        });

        assert_eq!(state.phase(), UploadPhase::Failed(ToolMode::TextExtract));
        assert!(state.error().unwrap().contains("API_KEY"));
        assert!(state.result().is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn failure_text_is_a_completed_result() {
        let registry = PreviewRegistry::new();
        let mut state = with_file(ToolMode::TextExtract, &registry);
        let job = state.apply(UploadAction::Process).unwrap();

        state.apply(UploadAction::Finished {
            ticket: job.ticket,
            outcome: Ok("An error occurred: request failed: connection refused".to_string()),
        });

        assert_eq!(state.phase(), UploadPhase::Completed(ToolMode::TextExtract));
        assert!(state.result().unwrap().starts_with("An error occurred:"));
        assert!(state.error().is_none());
    }

    #[test]
    fn new_file_clears_previous_outcome() {
        let registry = PreviewRegistry::new();
        let mut state = with_file(ToolMode::Caption, &registry);
        let job = state.apply(UploadAction::Process).unwrap();
        state.apply(UploadAction::Finished {
            ticket: job.ticket,
            outcome: Err(ConfigurationError::MissingApiKey("API_KEY")),
        });

        state.apply(UploadAction::SelectFile(selection(&registry, "b.png", b"b")));

        assert_eq!(state.phase(), UploadPhase::FileSelected(ToolMode::Caption));
        assert!(state.error().is_none());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let registry = PreviewRegistry::new();
        let mut state = with_file(ToolMode::Caption, &registry);
        let job = state.apply(UploadAction::Process).unwrap();

        state.apply(UploadAction::ChangeImage);
        state.apply(UploadAction::SelectFile(selection(&registry, "b.png", b"b")));
        assert!(!state.is_loading());
        assert!(state.has_request_in_flight());
        assert!(state.apply(UploadAction::Process).is_none());

        state.apply(UploadAction::Finished {
            ticket: job.ticket,
            outcome: Ok("caption for a.png".to_string()),
        });

        assert_eq!(state.phase(), UploadPhase::FileSelected(ToolMode::Caption));
        assert!(state.result().is_none());
        assert!(!state.has_request_in_flight());
        assert!(state.can_process());
    }

    #[test]
    fn unknown_ticket_is_ignored() {
        let registry = PreviewRegistry::new();
        let mut state = with_file(ToolMode::Caption, &registry);
        let job = state.apply(UploadAction::Process).unwrap();

        state.apply(UploadAction::Finished {
            ticket: job.ticket + 7,
            outcome: Ok("bogus".to_string()),
        });

        assert!(state.is_loading());
        assert!(state.has_request_in_flight());
    }

    #[test]
    fn dropping_state_releases_preview() {
        let registry = PreviewRegistry::new();
        let state = with_file(ToolMode::Caption, &registry);
        assert_eq!(registry.live_count(), 1);
        drop(state);
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.acquired(), registry.released());
    }
}
