//! Image files accepted by the picker.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};

/// Image formats the tools accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageKind {
    /// Detects the kind from a path's extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Returns the mime type sent with the inline image data.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    /// Short label used in the preview panel.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Gif => "GIF",
            Self::Webp => "WEBP",
        }
    }
}

/// An image file chosen by the user, read fully into memory.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    /// Path as entered or picked.
    pub path: PathBuf,
    /// File name for display.
    pub name: String,
    /// Detected format.
    pub kind: ImageKind,
    /// File contents.
    pub bytes: Arc<[u8]>,
}

impl SelectedImage {
    /// Builds a selection from bytes already in memory.
    #[must_use]
    pub fn from_bytes(path: impl Into<PathBuf>, kind: ImageKind, bytes: Vec<u8>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self {
            path,
            name,
            kind,
            bytes: bytes.into(),
        }
    }

    /// Reads an image file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not a supported image type or
    /// the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let Some(kind) = ImageKind::from_path(path) else {
            bail!("Unsupported image type: {}", path.display());
        };
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        Ok(Self::from_bytes(path, kind, bytes))
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Formats a byte count as `B`, `KB` or `MB`.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Display only
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
