use std::io::Write;
use std::sync::Arc;

use mira_core::gateway::SavedPropertiesGateway;
use mira_core::{ChatSession, QuickFilters};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;
use crate::util::{Connection, EXIT_FAILED, EXIT_OK};

const SEARCHING: &str = "        Searching for properties...";
const FILTER_USAGE: &str = "usage: /filter location=<city> budget=<range> bedrooms=<n>";

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
pub enum ChatInput {
    Empty,
    Text(String),
    Filter(QuickFilters),
    Save(String),
    Saved,
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_line(line: &str) -> ChatInput {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ChatInput::Text(line.to_string());
    };

    let (command, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    match command.to_lowercase().as_str() {
        "filter" | "f" => parse_filter(args),
        "save" => match args.trim() {
            "" => ChatInput::Invalid("usage: /save <property-id>".to_string()),
            id => ChatInput::Save(id.to_string()),
        },
        "saved" => ChatInput::Saved,
        "help" | "?" => ChatInput::Help,
        "quit" | "exit" | "q" => ChatInput::Quit,
        other => ChatInput::Invalid(format!("unknown command /{other}, try /help")),
    }
}

fn parse_filter(args: &str) -> ChatInput {
    let mut filters = QuickFilters::default();
    for token in args.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            return ChatInput::Invalid(format!("expected key=value, got '{token}'"));
        };
        let slot = match key.to_lowercase().as_str() {
            "location" | "city" => &mut filters.location,
            "budget" => &mut filters.budget,
            "bedrooms" | "beds" | "bhk" => &mut filters.bedrooms,
            other => {
                return ChatInput::Invalid(format!(
                    "unknown filter '{other}' (use location, budget or bedrooms)"
                ));
            }
        };
        *slot = Some(value.to_string());
    }
    if filters.is_empty() {
        return ChatInput::Invalid(FILTER_USAGE.to_string());
    }
    ChatInput::Filter(filters)
}

fn show_new(session: &ChatSession, shown: &mut usize) {
    let entries = session.entries_since(*shown);
    *shown += entries.len();
    for e in &entries {
        if let Some(text) = render::entry(e) {
            println!("{text}");
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

pub async fn run(conn: Connection) -> i32 {
    let gateway = Arc::new(conn.gateway);
    let session = ChatSession::new(conn.context, gateway.clone(), gateway.clone());
    let mut shown = 0;

    show_new(&session, &mut shown);
    println!("        (type /help for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "failed to read input");
                return EXIT_FAILED;
            }
        };

        match parse_line(&line) {
            ChatInput::Empty => continue,
            ChatInput::Quit => break,
            ChatInput::Help => println!("{}", render::HELP),
            ChatInput::Invalid(message) => println!("{message}"),
            ChatInput::Text(text) => {
                println!("{SEARCHING}");
                session.submit_text(&text).await;
            }
            ChatInput::Filter(filters) => {
                println!("{SEARCHING}");
                session.apply_quick_filter(&filters).await;
            }
            ChatInput::Save(id) => {
                println!("        Saving {id}...");
                session.save(&id).await;
            }
            ChatInput::Saved => match gateway.list_saved(session.context().user_id()).await {
                Ok(ids) if ids.is_empty() => println!("mira  > You have no saved listings yet."),
                Ok(ids) => println!("mira  > Saved listings: {}", ids.join(", ")),
                Err(e) => {
                    tracing::warn!(error = %e, "listing saved properties failed");
                    println!("mira  > Could not load your saved listings. Please try again.");
                }
            },
        }
        show_new(&session, &mut shown);
    }

    EXIT_OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_trimmed() {
        assert_eq!(
            parse_line("  2BHK in Pune under 1Cr \n"),
            ChatInput::Text("2BHK in Pune under 1Cr".to_string())
        );
        assert_eq!(parse_line("   "), ChatInput::Empty);
    }

    #[test]
    fn filter_command_fills_known_keys() {
        assert_eq!(
            parse_line("/filter city=Mumbai budget=50L-1Cr bedrooms=2"),
            ChatInput::Filter(QuickFilters::new(Some("Mumbai"), Some("50L-1Cr"), Some("2")))
        );
    }

    #[test]
    fn filter_without_values_prints_usage() {
        let usage = ChatInput::Invalid(FILTER_USAGE.to_string());
        assert_eq!(parse_line("/filter"), usage);
        assert_eq!(parse_line("/filter location= budget="), usage);
    }

    #[test]
    fn filter_command_rejects_bad_tokens() {
        assert!(matches!(parse_line("/filter Mumbai"), ChatInput::Invalid(_)));
        assert!(matches!(parse_line("/filter floor=3"), ChatInput::Invalid(_)));
    }

    #[test]
    fn save_requires_an_id() {
        assert_eq!(parse_line("/save x1"), ChatInput::Save("x1".to_string()));
        assert!(matches!(parse_line("/save"), ChatInput::Invalid(_)));
    }

    #[test]
    fn other_commands() {
        assert_eq!(parse_line("/saved"), ChatInput::Saved);
        assert_eq!(parse_line("/HELP"), ChatInput::Help);
        assert_eq!(parse_line("/quit"), ChatInput::Quit);
        assert!(matches!(parse_line("/dance"), ChatInput::Invalid(_)));
    }
}
