//! `dost chat`: interactive tutoring session.

use std::io::Write;
use std::path::{Path, PathBuf};

use dost_agent::ChatSession;
use dost_core::message::{Role, Turn};
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line of user input, classified.
#[derive(Debug, PartialEq)]
enum Input {
    Message(String),
    Clear,
    Export(Option<PathBuf>),
    History,
    Help,
    Exit,
    Empty,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }

    match trimmed {
        "exit" | "quit" | ":q" => return Input::Exit,
        _ => {}
    }

    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Message(trimmed.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "clear" => Input::Clear,
        "export" if arg.is_empty() => Input::Export(None),
        "export" => Input::Export(Some(PathBuf::from(arg))),
        "history" => Input::History,
        "help" => Input::Help,
        "exit" | "quit" => Input::Exit,
        other => Input::Unknown(other.to_string()),
    }
}

fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        _ => "Bot",
    }
}

fn print_turn(turn: &Turn) {
    println!();
    for line in turn.content.lines() {
        println!("  {} > {line}", speaker(turn.role));
    }
    println!();
}

fn print_help() {
    println!();
    println!("  /clear           Start over from the greeting");
    println!("  /export [path]   Save the conversation as a PDF");
    println!("  /history         Show the whole conversation");
    println!("  /help            Show this help");
    println!("  /exit            Leave (also: exit, quit, :q, Ctrl+D)");
    println!();
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

pub async fn run(export_on_exit: Option<PathBuf>) -> dost_core::Result<()> {
    let super::Startup {
        config,
        mut session,
        renderer,
        credential_source,
    } = super::start()?;

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║            Dost: DSA Tutor Chat              ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", session.provider_name());
    println!("  Model:     {}", session.model());
    println!("  Key from:  {credential_source}");
    println!("  Window:    last {} turns", session.window_size());
    println!("  Export:    {} font", renderer.font_mode());
    println!("  Session:   {}", session.id());
    println!();
    println!("  Type your question and press Enter. /help lists commands.");

    if let Some(seed) = session.transcript().last() {
        print_turn(seed);
    }

    let title = config.export.title.clone();
    let default_path = PathBuf::from(&config.export.file_name);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Input::Empty => {}
            Input::Exit => break,
            Input::Help => print_help(),
            Input::Clear => {
                session.clear();
                println!("\n  Conversation cleared.");
                if let Some(seed) = session.transcript().last() {
                    print_turn(seed);
                }
            }
            Input::History => {
                for turn in session.transcript().turns() {
                    print_turn(turn);
                }
            }
            Input::Export(path) => {
                let path = path.unwrap_or_else(|| default_path.clone());
                export_and_report(&session, &renderer, &title, &path);
            }
            Input::Unknown(name) => {
                eprintln!("  Unknown command /{name}. Type /help for the list.");
            }
            Input::Message(text) => {
                eprint!("  ...");
                let outcome = session.submit(text).await;
                eprint!("\r     \r");
                match outcome {
                    Ok(reply) => print_turn(reply),
                    Err(e) => {
                        eprintln!("  [Error] {e}");
                        if let Some(turn) = session.transcript().last() {
                            print_turn(turn);
                        }
                    }
                }
            }
        }
        prompt()?;
    }

    if let Some(path) = export_on_exit {
        export_and_report(&session, &renderer, &title, &path);
    }

    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

/// Export failures are reported and the session carries on.
fn export_and_report(
    session: &ChatSession,
    renderer: &dost_export::DocumentRenderer,
    title: &str,
    path: &Path,
) {
    match super::export(session, renderer, title, path) {
        Ok(written) => println!("\n  Saved transcript to {}\n", written.display()),
        Err(e) => eprintln!("  [Export Error] {e}"),
    }
}
