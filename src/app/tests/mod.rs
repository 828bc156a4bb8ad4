//! Tests for the app module.
//!
//! This module is organized into submodules by functionality:
//! - `helpers` - Shared test utilities
//! - `session` - Login and signup forms
//! - `picker` - Image suggestions, path entry and paste handling
//! - `upload` - Tool selection, processing and stale results
//! - `render` - Rendered screens

#[allow(clippy::unwrap_used, clippy::expect_used)]
pub mod helpers;
