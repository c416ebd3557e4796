use clap::Parser;
use copywriter_core::Language;
use std::path::PathBuf;

/// Generate and refine product copy from a product photo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Product image to analyze on startup
    #[arg(index = 1)] // Positional argument
    pub image: Option<PathBuf>,

    /// Language for prompts, copy and messages (en or id)
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Enable Google Search grounding for chat turns
    #[arg(short, long, default_value_t = false)]
    pub search: bool,

    /// Send one refinement after the analysis, print the result and exit
    #[arg(short, long, requires = "image")]
    pub prompt: Option<String>,

    /// Path to the config file (defaults to ~/.config/product-copywriter/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Gemini API key
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Gemini model to use
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
