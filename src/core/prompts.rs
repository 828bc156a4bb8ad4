//! Fixed prompt texts sent alongside the image.

/// Prompt used by the text extraction tool.
pub const EXTRACT_TEXT_PROMPT: &str = "Extract all text from this image. Respond with only the text content. If no text is found, state that clearly.";

/// Prompt used by the caption tool.
pub const CAPTION_PROMPT: &str =
    "Generate a short, engaging, and descriptive caption for this image.";
