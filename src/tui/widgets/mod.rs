//! Custom TUI widgets.

pub mod file_popup;
pub mod result_card;
pub mod status_indicator;
pub mod thumbnail;
pub mod tool_card;

pub use file_popup::{ImageSuggestionPopup, MAX_POPUP_ROWS, PopupState};
pub use result_card::{CardContent, RESULT_PLACEHOLDER, ResultCard, loading_dots, visual_line_count};
pub use status_indicator::{StatusIndicatorWidget, spinner_frame};
pub use thumbnail::ThumbnailWidget;
pub use tool_card::ToolCard;
