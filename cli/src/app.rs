use anyhow::{bail, Context, Result};
use colored::*;
use copywriter_core::capture::load_image;
use copywriter_core::{
    translate, CallError, ConversationController, CopyGenerator, Language, RejectedCall, TextKey,
    TurnError,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::logging::log_error;
use crate::output::{
    print_header, print_help, print_last_error, print_message, print_placeholder, print_sources,
};

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Image(PathBuf),
    Search(bool),
    Lang(Language),
    Sources,
    History,
    Help,
    Exit,
    Chat(String),
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return Command::Exit;
    }
    if !trimmed.starts_with('/') {
        return Command::Chat(line.trim_end_matches(['\r', '\n']).to_string());
    }

    let (name, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (trimmed, ""),
    };

    match name {
        "/image" if !rest.is_empty() => Command::Image(PathBuf::from(rest)),
        "/image" => Command::Invalid("Usage: /image <path>".to_string()),
        "/search" => match rest.to_lowercase().as_str() {
            "on" => Command::Search(true),
            "off" => Command::Search(false),
            _ => Command::Invalid("Usage: /search on|off".to_string()),
        },
        "/lang" => match rest.parse::<Language>() {
            Ok(language) => Command::Lang(language),
            Err(e) => Command::Invalid(e),
        },
        "/sources" => Command::Sources,
        "/history" => Command::History,
        "/help" => Command::Help,
        other => Command::Invalid(format!("Unknown command '{}'. Type /help.", other)),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Load `path` and run the image analysis, printing the generated copy
pub async fn ingest_file<G: CopyGenerator>(
    controller: &mut ConversationController<G>,
    path: &Path,
) -> Result<()> {
    let image = load_image(path).with_context(|| format!("Cannot use {}", path.display()))?;
    info!(path = %path.display(), "Loaded product image");

    let progress = spinner("Analyzing product image...");
    let result = controller.ingest_image(image).await;
    progress.finish_and_clear();

    report(controller, result)
}

/// Send one refinement request, printing the reply and its sources
pub async fn send<G: CopyGenerator>(
    controller: &mut ConversationController<G>,
    text: &str,
) -> Result<()> {
    let search_enabled = controller.session().search_enabled();
    debug!(search_enabled, "Sending refinement request");

    let progress = spinner("Refining copy...");
    let result = controller.send_message(text, search_enabled).await;
    progress.finish_and_clear();

    report(controller, result)
}

fn report<G: CopyGenerator>(
    controller: &ConversationController<G>,
    result: std::result::Result<(), CallError>,
) -> Result<()> {
    let session = controller.session();
    match result {
        Ok(()) => {
            if let Some(message) = session.conversation().last() {
                print_message(message);
            }
            print_sources(session);
            Ok(())
        }
        Err(CallError::Failed(kind)) => {
            error!(error = %kind, "Turn failed");
            print_last_error(session);
            Err(kind.into())
        }
        Err(CallError::Rejected(RejectedCall::EmptyMessage)) => Ok(()),
        Err(CallError::Rejected(RejectedCall::Busy)) => {
            bail!("A request is still in progress")
        }
    }
}

/// Turn failures were already shown from the session; print anything else
fn surface(e: anyhow::Error) {
    if e.downcast_ref::<TurnError>().is_some() {
        debug!(error = %e, "Turn did not complete");
    } else {
        log_error(&format!("{:#}", e));
    }
}

/// Analyze `image`, apply one refinement, then exit
pub async fn run_single_query<G: CopyGenerator>(
    controller: &mut ConversationController<G>,
    image: &Path,
    prompt: &str,
) -> Result<()> {
    ingest_file(controller, image).await?;
    println!();
    send(controller, prompt).await
}

/// Interactive refinement loop
pub async fn run_interactive_chat<G: CopyGenerator>(
    controller: &mut ConversationController<G>,
    initial_image: Option<PathBuf>,
) -> Result<()> {
    print_header(controller.session());
    print_help();

    match initial_image {
        Some(path) => {
            if let Err(e) = ingest_file(controller, &path).await {
                surface(e);
            }
        }
        None => print_placeholder(controller.session()),
    }

    loop {
        let language = controller.session().language();
        println!(
            "{}",
            translate(TextKey::ChatInputPlaceholder, language).dimmed()
        );
        print!("{}: ", "You".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            // EOF
            break;
        }

        match parse_command(&input) {
            Command::Empty => continue,
            Command::Exit => {
                println!("Exiting chat session.");
                break;
            }
            Command::Help => print_help(),
            Command::Invalid(message) => println!("{}", message.yellow()),
            Command::Image(path) => {
                if let Err(e) = ingest_file(controller, &path).await {
                    surface(e);
                }
            }
            Command::Search(enabled) => {
                controller.set_search_enabled(enabled);
                println!(
                    "{}: {}",
                    translate(TextKey::ToggleSearchTooltip, language),
                    if enabled { "on" } else { "off" }
                );
            }
            Command::Lang(language) => {
                controller.set_language(language);
                print_header(controller.session());
            }
            Command::Sources => print_sources(controller.session()),
            Command::History => {
                for message in controller.session().conversation() {
                    print_message(message);
                }
                print_last_error(controller.session());
            }
            Command::Chat(text) => {
                if controller.session().active_image().is_none() {
                    print_placeholder(controller.session());
                    continue;
                }
                if let Err(e) = send(controller, &text).await {
                    surface(e);
                }
            }
        }

        println!(); // Add spacing between interactions
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_chat() {
        assert_eq!(
            parse_command("make it shorter\n"),
            Command::Chat("make it shorter".to_string())
        );
        assert_eq!(parse_command("   \n"), Command::Empty);
        assert_eq!(parse_command("QUIT"), Command::Exit);
    }

    #[test]
    fn test_commands() {
        assert_eq!(
            parse_command("/image  ./photos/mug 1.png\n"),
            Command::Image(PathBuf::from("./photos/mug 1.png"))
        );
        assert_eq!(parse_command("/search ON"), Command::Search(true));
        assert_eq!(parse_command("/search off"), Command::Search(false));
        assert_eq!(parse_command("/lang en"), Command::Lang(Language::En));
        assert_eq!(parse_command("/sources"), Command::Sources);
        assert_eq!(parse_command("/history"), Command::History);
        assert_eq!(parse_command("/help"), Command::Help);
    }

    #[test]
    fn test_invalid_commands() {
        assert!(matches!(parse_command("/image"), Command::Invalid(_)));
        assert!(matches!(parse_command("/search maybe"), Command::Invalid(_)));
        assert!(matches!(parse_command("/lang fr"), Command::Invalid(_)));
        assert!(matches!(parse_command("/frobnicate"), Command::Invalid(_)));
    }
}
