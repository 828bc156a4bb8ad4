//! Core state machines and the remote inference client.
//!
//! Nothing in here knows about the terminal. The presentation layer in
//! [`crate::app`] drives these types through their reducer-style `apply`
//! methods and renders whatever state results.

pub mod file;
pub mod inference;
pub mod preview;
pub mod prompts;
pub mod session;
pub mod upload;

pub use file::{ImageKind, SelectedImage, format_size};
pub use inference::{
    ConfigurationError, GeminiClient, InferenceBackend, InferenceError, InferenceRequest, infer,
};
pub use preview::{PreviewHandle, PreviewRegistry, Thumbnail};
pub use prompts::{CAPTION_PROMPT, EXTRACT_TEXT_PROMPT};
pub use session::{AuthView, Session, SessionAction};
pub use upload::{InferenceJob, Selection, UploadAction, UploadPhase, UploadState};

/// The two tools offered once a user is signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    /// Extract printed and handwritten text.
    #[default]
    TextExtract,
    /// Generate a caption describing the image.
    Caption,
}

impl ToolMode {
    /// Returns the display title for the tool.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::TextExtract => "Text Extractor",
            Self::Caption => "Caption Generator",
        }
    }

    /// Returns the one-line description shown on the tool card.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::TextExtract => "Extract printed and handwritten text from any image.",
            Self::Caption => "Create a creative and fitting caption for your image.",
        }
    }

    /// Returns the verb phrase used in the header subtitle.
    #[must_use]
    pub const fn action_phrase(&self) -> &'static str {
        match self {
            Self::TextExtract => "extract its text",
            Self::Caption => "generate a caption",
        }
    }

    /// Returns the fixed prompt sent to the model for this tool.
    ///
    /// The prompt never depends on the image content.
    #[must_use]
    pub const fn prompt(&self) -> &'static str {
        match self {
            Self::TextExtract => EXTRACT_TEXT_PROMPT,
            Self::Caption => CAPTION_PROMPT,
        }
    }

    /// Returns the other tool.
    #[must_use]
    pub const fn toggle(&self) -> Self {
        match self {
            Self::TextExtract => Self::Caption,
            Self::Caption => Self::TextExtract,
        }
    }

    /// Returns all tools in card order.
    #[must_use]
    pub const fn all() -> &'static [ToolMode] {
        &[ToolMode::TextExtract, ToolMode::Caption]
    }
}

#[cfg(test)]
mod tool_mode_tests {
    use super::*;

    #[test]
    fn tool_toggle_is_an_involution() {
        for mode in ToolMode::all() {
            assert_ne!(mode.toggle(), *mode);
            assert_eq!(mode.toggle().toggle(), *mode);
        }
    }

    #[test]
    fn tool_prompts_are_fixed() {
        assert_eq!(ToolMode::TextExtract.prompt(), EXTRACT_TEXT_PROMPT);
        assert_eq!(ToolMode::Caption.prompt(), CAPTION_PROMPT);
        assert_ne!(ToolMode::TextExtract.prompt(), ToolMode::Caption.prompt());
    }

    #[test]
    fn tool_titles() {
        assert_eq!(ToolMode::TextExtract.title(), "Text Extractor");
        assert_eq!(ToolMode::Caption.title(), "Caption Generator");
    }

    #[test]
    fn tool_texts_are_not_empty() {
        for mode in ToolMode::all() {
            assert!(!mode.description().is_empty());
            assert!(!mode.action_phrase().is_empty());
        }
    }

    #[test]
    fn tool_all_lists_cards_in_order() {
        assert_eq!(ToolMode::all(), &[ToolMode::TextExtract, ToolMode::Caption]);
    }
}
