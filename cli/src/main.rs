use anyhow::Context;
use clap::Parser;
use colored::*;
use copywriter_core::{ConversationController, CopywriterConfig, GeminiClient, Session};
use tracing::info;

mod app;
mod cli;
mod logging;
mod output;

use crate::cli::Args;
use crate::logging::log_error;

/// Overrides taken from the command line; unset flags leave config values alone
fn config_overrides(args: &Args) -> CopywriterConfig {
    let mut overrides = CopywriterConfig::empty();
    overrides.api_key = args.api_key.clone();
    overrides.model_name = args.model.clone();
    overrides.language = args.language;
    overrides.search_enabled = args.search.then_some(true);
    overrides
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let file_config = match &args.config {
        Some(path) => CopywriterConfig::load_from_file(path),
        None => CopywriterConfig::load_default(),
    }
    .context("Failed to load configuration")?;

    let config = file_config.merge(&config_overrides(&args)).with_env_api_key();

    let log_level = if args.verbose {
        "debug"
    } else {
        config.log_level.as_deref().unwrap_or("info")
    };
    logging::init(log_level);

    let client = match GeminiClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            log_error(&format!("Failed to initialize Gemini client: {}", e));
            eprintln!(
                "{}",
                "Set GEMINI_API_KEY, pass --api-key, or add api_key to the config file.".yellow()
            );
            return Err(e.into());
        }
    };
    info!(model = client.model_name(), "Initialized Gemini client");

    let session = Session::new(
        config.language_or_default(),
        config.search_enabled_or_default(),
    );
    let mut controller = ConversationController::new(client, session);

    match (&args.image, &args.prompt) {
        (Some(image), Some(prompt)) => {
            app::run_single_query(&mut controller, image, prompt).await
        }
        _ => app::run_interactive_chat(&mut controller, args.image.clone()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copywriter_core::Language;

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "copywriter",
            "--language",
            "en",
            "--model",
            "gemini-2.0-flash",
        ])
        .unwrap();

        let merged = CopywriterConfig::default().merge(&config_overrides(&args));
        assert_eq!(merged.language, Some(Language::En));
        assert_eq!(merged.model_name.as_deref(), Some("gemini-2.0-flash"));
        // --search absent keeps the configured value
        assert_eq!(merged.search_enabled, Some(false));
    }

    #[test]
    fn test_missing_key_flag_keeps_file_key() {
        let args = Args::try_parse_from(["copywriter"]).unwrap();
        assert_eq!(args.api_key, None);

        let mut file = CopywriterConfig::default();
        file.api_key = Some("from-file".to_string());
        let merged = file.merge(&config_overrides(&args)).with_env_api_key();
        assert_eq!(merged.api_key.as_deref(), Some("from-file"));
    }
}
