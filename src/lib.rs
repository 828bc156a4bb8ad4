//! AI Image Analyzer - terminal front end for a multimodal model
//!
//! Signs the user in with a mock login, then extracts text from an image or
//! writes a caption for it.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod file_search;
pub mod logging;
pub mod tui;
