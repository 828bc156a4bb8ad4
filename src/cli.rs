//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

/// AI Image Analyzer
///
/// Extract text from images or generate captions with a hosted multimodal
/// model. The API credential is read from the `API_KEY` environment variable.
#[derive(Parser, Debug)]
#[command(name = "image-analyzer", version, about, long_about = None)]
pub struct Args {
    /// Model identifier to request (default: gemini-2.5-flash)
    #[arg(long)]
    pub model: Option<String>,

    /// Directory the image picker searches (default: current directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Log file path (default: image-analyzer.log in the temp directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
