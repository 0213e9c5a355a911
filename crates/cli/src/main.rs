// gridmate CLI - chat with a spreadsheet from the terminal
//
// The REPL and one-shot `ask` run against an in-memory sheet surface,
// optionally seeded from a CSV file. All spreadsheet effects stay in
// process; the point is the translation pipeline, not persistence.

mod exit_codes;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use gridmate_assistant::ChatSession;
use gridmate_config::{
    credentials::API_KEY_ENV, CredentialStore, Credentials, FileCredentialStore, Settings,
};
use gridmate_surface::{CellValue, MemorySurface};

use exit_codes::{EXIT_AI_MISSING_KEY, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "gridmate")]
#[command(about = "Natural-language spreadsheet assistant (terminal chat)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session against an in-memory sheet
    #[command(after_help = "\
Examples:
  gridmate chat
  gridmate chat --load sales.csv")]
    Chat {
        /// Seed the sheet from a CSV file (loaded at A1)
        #[arg(long)]
        load: Option<PathBuf>,
    },

    /// One-shot request; prints the assistant reply and exits
    #[command(after_help = "\
Examples:
  gridmate ask \"sum column B\" --load sales.csv
  gridmate ask \"create revenue table\"")]
    Ask {
        /// The request to translate
        message: String,

        /// Seed the sheet from a CSV file (loaded at A1)
        #[arg(long)]
        load: Option<PathBuf>,
    },

    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Store an API key
    Set { value: String },
    /// Erase the stored API key
    Clear,
    /// Show whether a key is configured and where it came from
    Status,
}

/// CLI failure carrying its exit code.
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(e.code)
        }
    }
}

fn run(cli: Cli) -> Result<u8, CliError> {
    match cli.command {
        Commands::Chat { load } => run_chat(load),
        Commands::Ask { message, load } => run_ask(&message, load),
        Commands::Key { action } => run_key(action),
    }
}

fn new_session() -> ChatSession<FileCredentialStore> {
    ChatSession::new(Settings::load(), FileCredentialStore::new())
}

fn run_chat(load: Option<PathBuf>) -> Result<u8, CliError> {
    let mut surface = build_surface(load.as_deref())?;
    let mut session = new_session();

    println!("{}", session.greeting());
    println!("(type \"exit\" to leave)");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("failed to read input: {}", e),
            hint: None,
        })? == 0
        {
            break; // EOF
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        let reply = session.submit(&mut surface, input);
        println!("{}", reply);
    }

    Ok(EXIT_SUCCESS)
}

fn run_ask(message: &str, load: Option<PathBuf>) -> Result<u8, CliError> {
    let mut surface = build_surface(load.as_deref())?;
    let mut session = new_session();

    if !session.has_credential() && !is_key_command(message) {
        return Err(CliError {
            code: EXIT_AI_MISSING_KEY,
            message: "no API key configured".to_string(),
            hint: Some(format!(
                "run `gridmate key set <KEY>` or set {}",
                API_KEY_ENV
            )),
        });
    }

    let reply = session.submit(&mut surface, message);
    println!("{}", reply);
    Ok(EXIT_SUCCESS)
}

// Mirrors the session's command matching: ASCII-case-insensitive,
// compared against the input itself rather than a lowercased copy.
fn is_key_command(message: &str) -> bool {
    const SET_PREFIX: &str = "set ai key ";
    let message = message.trim();
    (message.len() >= SET_PREFIX.len()
        && message.is_char_boundary(SET_PREFIX.len())
        && message[..SET_PREFIX.len()].eq_ignore_ascii_case(SET_PREFIX))
        || message.eq_ignore_ascii_case("clear ai key")
}

fn run_key(action: KeyAction) -> Result<u8, CliError> {
    let mut store = FileCredentialStore::new();
    match action {
        KeyAction::Set { value } => {
            let value = value.trim();
            if value.is_empty() {
                return Err(CliError {
                    code: EXIT_USAGE,
                    message: "API key must not be empty".to_string(),
                    hint: None,
                });
            }
            store
                .save(&Credentials::new(value.to_string()))
                .map_err(|e| CliError { code: EXIT_ERROR, message: e, hint: None })?;
            println!("API key saved to {}", FileCredentialStore::path().display());
            Ok(EXIT_SUCCESS)
        }
        KeyAction::Clear => {
            store
                .clear()
                .map_err(|e| CliError { code: EXIT_ERROR, message: e, hint: None })?;
            println!("API key cleared");
            Ok(EXIT_SUCCESS)
        }
        KeyAction::Status => {
            if FileCredentialStore::path().exists() {
                println!("API key: present (file)");
            } else if std::env::var(API_KEY_ENV).map(|v| !v.is_empty()).unwrap_or(false) {
                println!("API key: present (environment)");
            } else {
                println!("API key: not configured");
            }
            Ok(EXIT_SUCCESS)
        }
    }
}

// ── CSV seeding ─────────────────────────────────────────────────────

/// Load a CSV file into the surface starting at A1. Numeric-looking
/// fields become numbers so sum/search behave like they would on real
/// sheet data.
fn build_surface(load: Option<&Path>) -> Result<MemorySurface, CliError> {
    let mut surface = MemorySurface::new();

    let Some(path) = load else {
        return Ok(surface);
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| CliError {
            code: EXIT_USAGE,
            message: format!("cannot read {}: {}", path.display(), e),
            hint: None,
        })?;

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| CliError {
            code: EXIT_USAGE,
            message: format!("CSV parse error in {}: {}", path.display(), e),
            hint: None,
        })?;
        for (col, field) in record.iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            let value = match field.parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::Text(field.to_string()),
            };
            surface.set_cell(row, col, value);
        }
    }

    Ok(surface)
}
