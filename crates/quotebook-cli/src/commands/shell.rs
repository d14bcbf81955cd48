//! Interactive shell
//!
//! Reads commands from stdin and runs them against one `QuoteApp`. When sync
//! is configured a ticker requests a scheduled reconcile every
//! [`SYNC_INTERVAL`]; ticks and typed commands share one `select!` loop, so
//! they never run at the same time.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use quotebook_core::sync::{spawn_sync_ticker, SyncTicker, SyncTrigger, TickerEvent, SYNC_INTERVAL};
use quotebook_core::{Config, QuoteApp};

use crate::commands;
use crate::display::TerminalDisplay;
use crate::output::Output;

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Show(Option<String>),
    List(Option<String>),
    Categories,
    Filter(Option<String>),
    /// `add` alone opens the form; `add <text> | <category>` submits directly
    Add(Option<(String, String)>),
    Export(Option<PathBuf>),
    Import(PathBuf),
    Sync,
    Last,
    Status,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

/// Two-step add form
#[derive(Debug, Clone, PartialEq, Eq)]
enum Form {
    Idle,
    Text,
    Category { text: String },
}

impl Form {
    fn prompt(&self) -> &'static str {
        match self {
            Form::Idle => "quotebook> ",
            Form::Text => "  quote text: ",
            Form::Category { .. } => "  category: ",
        }
    }
}

/// Parse one line of shell input
pub fn parse_command(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Empty;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    match word.to_ascii_lowercase().as_str() {
        "show" | "next" => ShellCommand::Show(arg),
        "list" | "ls" => ShellCommand::List(arg),
        "categories" => ShellCommand::Categories,
        "filter" => ShellCommand::Filter(arg),
        "add" => match arg {
            None => ShellCommand::Add(None),
            Some(arg) => match arg.split_once('|') {
                Some((text, category)) => ShellCommand::Add(Some((
                    text.trim().to_string(),
                    category.trim().to_string(),
                ))),
                None => ShellCommand::Invalid("usage: add <text> | <category>".to_string()),
            },
        },
        "export" => ShellCommand::Export(arg.map(PathBuf::from)),
        "import" => match arg {
            Some(path) => ShellCommand::Import(PathBuf::from(path)),
            None => ShellCommand::Invalid("usage: import <path>".to_string()),
        },
        "sync" => ShellCommand::Sync,
        "last" => ShellCommand::Last,
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => ShellCommand::Invalid(format!("unknown command '{}', try 'help'", other)),
    }
}

/// Run the shell until `quit` or end of input
pub async fn run(app: &mut QuoteApp, config: &Config, output: &Output) -> Result<()> {
    let mut ticker = app
        .sync_agent()
        .is_some()
        .then(|| spawn_sync_ticker(SYNC_INTERVAL));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut form = Form::Idle;

    {
        let mut display = TerminalDisplay::new(output);
        app.show_quote(&mut display);
    }
    prompt(output, &form);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Failed to read input: {}", e);
                        break;
                    }
                };

                form = match form {
                    Form::Idle => {
                        let command = parse_command(&line);
                        if command == ShellCommand::Quit {
                            break;
                        }
                        execute(app, config, output, command).await
                    }
                    Form::Text => Form::Category { text: line },
                    Form::Category { text } => {
                        let mut display = TerminalDisplay::new(output);
                        // Failures were reported to the display
                        let _ = app.add_quote(&text, &line, &mut display).await;
                        Form::Idle
                    }
                };
                prompt(output, &form);
            }
            Some(TickerEvent::Tick) = next_tick(&mut ticker) => {
                debug!("Scheduled sync");
                let mut display = TerminalDisplay::new(output);
                let _ = app.sync(SyncTrigger::Scheduled, &mut display).await;
                prompt(output, &form);
            }
        }
    }

    if let Some(ticker) = ticker {
        ticker.shutdown().await;
    }
    Ok(())
}

async fn next_tick(ticker: &mut Option<SyncTicker>) -> Option<TickerEvent> {
    match ticker {
        Some(ticker) => ticker.event_rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Run one command, returning the form state to continue in
async fn execute(
    app: &mut QuoteApp,
    config: &Config,
    output: &Output,
    command: ShellCommand,
) -> Form {
    let result = match command {
        ShellCommand::Show(category) => commands::quote::show(app, category, output),
        ShellCommand::List(category) => commands::quote::list(app, category, output),
        ShellCommand::Categories => commands::category::list(app, output),
        ShellCommand::Filter(value) => commands::category::filter(app, value, output),
        ShellCommand::Add(None) => return Form::Text,
        ShellCommand::Add(Some((text, category))) => {
            commands::quote::add(app, text, category, output).await
        }
        ShellCommand::Export(path) => commands::transfer::export(app, path, output),
        ShellCommand::Import(path) => commands::transfer::import(app, path, output).await,
        ShellCommand::Sync => commands::sync::sync(app, config, output).await,
        ShellCommand::Last => last(app, output),
        ShellCommand::Status => commands::status::show(app, config, output),
        ShellCommand::Help => {
            print_help();
            Ok(())
        }
        ShellCommand::Invalid(message) => {
            output.warning(&message);
            Ok(())
        }
        ShellCommand::Quit | ShellCommand::Empty => Ok(()),
    };

    if let Err(e) = result {
        if commands::needs_report(&e) {
            output.warning(&format!("{:#}", e));
        }
    }
    Form::Idle
}

fn last(app: &QuoteApp, output: &Output) -> Result<()> {
    match app.last_viewed()? {
        Some(quote) => output.print_quote(&quote),
        None => output.message("No quote shown yet in this session."),
    }
    Ok(())
}

fn prompt(output: &Output, form: &Form) {
    if output.is_quiet() || output.is_json() {
        return;
    }
    print!("{}", form.prompt());
    let _ = std::io::stdout().flush();
}

fn print_help() {
    println!("Commands:");
    println!("  show [category]         Show a random quote (alias: next)");
    println!("  list [category]         List quotes");
    println!("  categories              List categories");
    println!("  filter [category|all]   Show or set the category filter");
    println!("  add                     Add a quote (prompts for text and category)");
    println!("  add <text> | <category> Add a quote in one line");
    println!("  export [path]           Write quotes to a JSON file");
    println!("  import <path>           Merge quotes from a JSON file");
    println!("  sync                    Sync with the remote collection");
    println!("  last                    Show the last quote from this session");
    println!("  status                  Show status");
    println!("  quit                    Leave the shell");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command(""), ShellCommand::Empty);
        assert_eq!(parse_command("  sync "), ShellCommand::Sync);
        assert_eq!(parse_command("EXIT"), ShellCommand::Quit);
        assert_eq!(parse_command("next"), ShellCommand::Show(None));
        assert_eq!(
            parse_command("show Life"),
            ShellCommand::Show(Some("Life".to_string()))
        );
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(parse_command("add"), ShellCommand::Add(None));
        assert_eq!(
            parse_command("add Stay hungry. | Motivation"),
            ShellCommand::Add(Some((
                "Stay hungry.".to_string(),
                "Motivation".to_string()
            )))
        );
        assert!(matches!(
            parse_command("add no category here"),
            ShellCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_parse_paths_and_unknown() {
        assert_eq!(
            parse_command("import backup.json"),
            ShellCommand::Import(PathBuf::from("backup.json"))
        );
        assert_eq!(parse_command("export"), ShellCommand::Export(None));
        assert!(matches!(parse_command("import"), ShellCommand::Invalid(_)));
        assert!(matches!(parse_command("dance"), ShellCommand::Invalid(_)));
    }

    #[test]
    fn test_form_prompts() {
        assert_eq!(Form::Idle.prompt(), "quotebook> ");
        assert_eq!(Form::Text.prompt(), "  quote text: ");
        assert_eq!(
            Form::Category {
                text: "x".to_string()
            }
            .prompt(),
            "  category: "
        );
    }
}
