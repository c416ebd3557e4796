use colored::*;
use copywriter_core::{translate, Message, Role, Session, Source, TextKey};
use pulldown_cmark::{Event as MdEvent, HeadingLevel, Options, Parser as MdParser, Tag};

/// Print one chat message with a role prefix
pub fn print_message(message: &Message) {
    match message.role {
        Role::Model => println!("{}: {}", "Copywriter".blue().bold(), render_markdown(&message.text)),
        Role::User => println!("{}: {}", "You".green().bold(), message.text),
    }
}

/// Print the citations of the last grounded turn, if any
pub fn print_sources(session: &Session) {
    let sources = session.grounding_sources();
    if sources.is_empty() {
        return;
    }
    println!("{}", translate(TextKey::SourcesTitle, session.language()).cyan());
    for line in format_sources(sources) {
        println!("{}", line);
    }
}

pub fn format_sources(sources: &[Source]) -> Vec<String> {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let title = if source.title.is_empty() {
                source.uri.as_str()
            } else {
                source.title.as_str()
            };
            format!("  {}. {} <{}>", i + 1, title, source.uri)
        })
        .collect()
}

/// Print the localized error left by a failed turn
pub fn print_last_error(session: &Session) {
    if let Some(error) = session.last_error() {
        println!("{}", error.message.red());
    }
}

pub fn print_header(session: &Session) {
    let language = session.language();
    println!("{}", translate(TextKey::HeaderTitle, language).bold());
    println!("{}", translate(TextKey::ChatHeader, language).dimmed());
    println!();
}

/// Shown while there is no image to talk about
pub fn print_placeholder(session: &Session) {
    let language = session.language();
    println!("{}", translate(TextKey::ChatPlaceholderTitle, language).bold());
    println!("{}", translate(TextKey::ChatPlaceholderSubtitle, language));
}

pub fn print_help() {
    println!("{}", "Commands:".yellow().bold());
    println!("  {}   Upload a product image and generate copy", "/image <path>".green());
    println!("  {}  Toggle Google Search grounding", "/search on|off".green());
    println!("  {}     Switch language", "/lang en|id".green());
    println!("  {}        Show sources of the last answer", "/sources".green());
    println!("  {}        Show the conversation so far", "/history".green());
    println!("  {}           Show this help", "/help".green());
    println!("  {}      Leave", "exit | quit".green());
    println!("Anything else is sent to the copywriter as a refinement request.");
    println!();
}

/// Render markdown copy for the terminal
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = MdParser::new_ext(markdown, options);

    let mut output = String::new();
    let mut heading: Option<HeadingLevel> = None;
    let mut heading_text = String::new();

    for event in parser {
        match event {
            MdEvent::Start(Tag::Heading(level, ..)) => {
                heading = Some(level);
                heading_text.clear();
            }
            MdEvent::End(Tag::Heading(..)) => {
                let styled = match heading.take() {
                    Some(HeadingLevel::H1) | Some(HeadingLevel::H2) => {
                        // Style sections start on a fresh block
                        if !output.is_empty() && !output.ends_with("\n\n") {
                            output.push('\n');
                        }
                        heading_text.bright_cyan().bold().to_string()
                    }
                    _ => heading_text.yellow().bold().to_string(),
                };
                output.push_str(&styled);
                output.push('\n');
            }
            MdEvent::Start(Tag::Paragraph) => {}
            MdEvent::End(Tag::Paragraph) => {
                output.push_str("\n\n");
            }
            MdEvent::Start(Tag::List(_)) => {}
            MdEvent::End(Tag::List(_)) => {
                output.push('\n');
            }
            MdEvent::Start(Tag::Item) => {
                output.push_str(&format!("{}  ", "•".yellow()));
            }
            MdEvent::End(Tag::Item) => {
                if !output.ends_with('\n') {
                    output.push('\n');
                }
            }
            MdEvent::Code(ref code) => {
                let code = format!("`{}`", code);
                if heading.is_some() {
                    heading_text.push_str(&code);
                } else {
                    output.push_str(&code);
                }
            }
            MdEvent::Text(ref text) => {
                if heading.is_some() {
                    heading_text.push_str(text);
                } else {
                    output.push_str(text);
                }
            }
            MdEvent::SoftBreak => output.push(' '),
            MdEvent::HardBreak => output.push('\n'),
            _ => {}
        }
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_copy_sections() {
        colored::control::set_override(false);
        let copy = "## Formal Style\n### Headline\nTimeless **leather**.\n\n### CTA\nShop now.";

        let rendered = render_markdown(copy);

        assert_eq!(
            rendered,
            "Formal Style\nHeadline\nTimeless leather.\n\nCTA\nShop now."
        );
    }

    #[test]
    fn test_render_list_items() {
        colored::control::set_override(false);
        let rendered = render_markdown("- one\n- two");
        assert_eq!(rendered, "•  one\n•  two");
    }

    #[test]
    fn test_inline_code_stays_in_heading() {
        colored::control::set_override(false);
        let rendered = render_markdown("## The `Mug` Style\nBody");
        assert_eq!(rendered, "The `Mug` Style\nBody");
    }

    #[test]
    fn test_format_sources_falls_back_to_uri() {
        let sources = vec![
            Source {
                uri: "https://a.example".to_string(),
                title: "A".to_string(),
            },
            Source {
                uri: "https://b.example".to_string(),
                title: String::new(),
            },
        ];
        assert_eq!(
            format_sources(&sources),
            vec![
                "  1. A <https://a.example>".to_string(),
                "  2. https://b.example <https://b.example>".to_string(),
            ]
        );
    }
}
