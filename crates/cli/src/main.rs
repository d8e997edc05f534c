//! ragchat CLI
//!
//! Interactive retrieval-augmented chat over an uploaded dataset: load a
//! CSV, JSON, or txt file, then ask free-text questions answered by a
//! hosted model conditioned on the most similar rows.

mod history;
mod session;

use clap::Parser;
use ragchat_core::{config::AppConfig, logging, AppResult};
use ragchat_llm::create_client;
use ragchat_rag::embeddings::{self, create_provider};
use session::Session;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Chat with your dataset using retrieval-augmented generation
#[derive(Parser, Debug)]
#[command(name = "ragchat")]
#[command(about = "Chat with your dataset using retrieval-augmented generation", long_about = None)]
#[command(version)]
struct Cli {
    /// Dataset file to load at startup (csv, json, or txt)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Model identifier
    #[arg(short, long, env = "RAGCHAT_MODEL")]
    model: Option<String>,

    /// Directory for exported chat history
    #[arg(short, long, env = "RAGCHAT_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, env = "RAGCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // Load base configuration from environment, then apply CLI overrides
    let config = AppConfig::load()?;
    let config = config.with_overrides(
        cli.model,
        cli.config,
        cli.output_dir,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("ragchat starting");
    tracing::debug!("Model: {}", config.model);

    println!("ragchat — retrieval-augmented chat over your dataset");
    println!("Model: {}", config.model);
    println!();

    // Every failure from here on is surfaced as an in-session message; the
    // process exits cleanly either way.
    if let Err(e) = run_session(&config, cli.file).await {
        eprintln!("Error: {}", e);
        tracing::error!("Session halted: {}", e);
    }

    Ok(())
}

/// Run one interactive session from configuration check to REPL exit.
async fn run_session(config: &AppConfig, initial_file: Option<PathBuf>) -> AppResult<()> {
    config.validate()?;

    // Missing credential halts the session before any upload is accepted
    let api_key = config.require_api_key()?;

    let llm = create_client("groq", None, Some(api_key.as_str()))?;
    let embedder = create_provider("trigram", embeddings::DEFAULT_DIMENSIONS)?;
    let mut session = Session::new(&config.model, llm, embedder);

    if let Some(path) = initial_file {
        if let Err(e) = session.load(&path).await {
            eprintln!("Error: {}", e);
        }
    } else {
        println!("Load a dataset with :load <path> to get started.");
    }

    print_help();

    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix(':') {
            if !handle_command(command, &mut session, config).await {
                break;
            }
        } else {
            handle_question(line, &mut session).await;
        }
    }

    println!("Goodbye.");
    Ok(())
}

/// Dispatch a `:command` line. Returns false when the session should end.
async fn handle_command(command: &str, session: &mut Session, config: &AppConfig) -> bool {
    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("");
    let argument = parts.next().map(str::trim);

    match name {
        "load" => match argument {
            Some(path) if !path.is_empty() => {
                if let Err(e) = session.load(Path::new(path)).await {
                    eprintln!("Error: {}", e);
                }
            }
            _ => println!("Usage: :load <path>"),
        },
        "history" => {
            if session.history().is_empty() {
                println!("No questions asked yet.");
            } else {
                print!("{}", session.history().render());
            }
        }
        "save" => match session.export_history(&config.output_dir) {
            Ok(path) => println!("Chat history saved to {}", path.display()),
            Err(e) => eprintln!("Error: {}", e),
        },
        "help" => print_help(),
        "quit" | "exit" => return false,
        other => println!("Unknown command :{}. Type :help for commands.", other),
    }

    true
}

/// Answer a free-text question and redisplay the history, newest first.
async fn handle_question(question: &str, session: &mut Session) {
    match session.ask(question).await {
        Ok(answer) => {
            println!();
            println!("{}", answer);
            println!();
            print!("{}", session.history().render());
        }
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  :load <path>   load a dataset (csv, json, or txt)");
    println!("  :history       show the conversation, newest first");
    println!("  :save          export the conversation to chat_history.txt");
    println!("  :help          show this help");
    println!("  :quit          leave the session");
    println!("Anything else is treated as a question about the loaded dataset.");
    println!();
}
