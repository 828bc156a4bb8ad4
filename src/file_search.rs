//! Image file search for the picker.
//!
//! Walks the picker root with the `ignore` crate and ranks image paths with
//! `nucleo-matcher`. Only files with a supported image extension are returned.

use ignore::WalkBuilder;
use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use std::path::{Path, PathBuf};

use crate::core::ImageKind;

/// Maximum number of matches to return.
pub const MAX_IMAGE_MATCHES: usize = 10;

/// A single image match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMatch {
    /// Path relative to the search root.
    pub path: PathBuf,
    /// Detected image type.
    pub kind: ImageKind,
    /// Fuzzy match score (higher is better). Zero for an empty query.
    pub score: u32,
}

/// Result of a search.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Matches, best first.
    pub matches: Vec<ImageMatch>,
    /// Number of directories that could not be read.
    pub inaccessible_dirs: usize,
    /// True if the walk reported any error.
    pub had_errors: bool,
}

/// Searches `root` for image files whose relative path matches `query`.
///
/// An empty query lists images alphabetically. At most
/// [`MAX_IMAGE_MATCHES`] results are returned.
#[must_use]
pub fn search_images(query: &str, root: &Path) -> SearchResult {
    let mut result = SearchResult::default();

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_exclude(true)
        .follow_links(true)
        .add_custom_ignore_filename(".gitignore")
        .build();

    let mut images: Vec<(PathBuf, ImageKind)> = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    continue;
                }
                let Some(kind) = ImageKind::from_path(entry.path()) else {
                    continue;
                };
                if let Ok(relative) = entry.path().strip_prefix(root) {
                    images.push((relative.to_path_buf(), kind));
                }
            }
            Err(e) => {
                result.had_errors = true;
                if let Some(io_error) = e.io_error()
                    && io_error.kind() == std::io::ErrorKind::PermissionDenied
                {
                    result.inaccessible_dirs += 1;
                }
            }
        }
    }

    let query = query.trim();
    if query.is_empty() {
        images.sort_by(|a, b| a.0.cmp(&b.0));
        result.matches = images
            .into_iter()
            .take(MAX_IMAGE_MATCHES)
            .map(|(path, kind)| ImageMatch {
                path,
                kind,
                score: 0,
            })
            .collect();
        return result;
    }

    let mut matcher = Matcher::new(Config::DEFAULT.match_paths());
    let atom = Atom::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
        false,
    );

    let mut buf = Vec::new();
    let mut matches: Vec<ImageMatch> = images
        .into_iter()
        .filter_map(|(path, kind)| {
            let haystack_str = path.to_string_lossy().into_owned();
            let haystack = Utf32Str::new(&haystack_str, &mut buf);
            atom.score(haystack, &mut matcher).map(|score| ImageMatch {
                path,
                kind,
                score: u32::from(score),
            })
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.path.cmp(&b.path)));
    matches.truncate(MAX_IMAGE_MATCHES);
    tracing::debug!(query, matches = matches.len(), "image search finished");
    result.matches = matches;
    result
}
