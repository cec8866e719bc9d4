//! hanlua command-line front end
//!
//! Translates Korean-keyword Lua source files and runs them through a Lua
//! interpreter, streaming program output to the terminal.

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use chrono::Local;
use hanlua::{OutputEvent, RunState, Session, StopOutcome, TokenCategory, VocabularyEntry};

/// Printed after a run finishes
const FINISH_MARKER: &str = "-- 실행 종료 --";

/// Exit code after a second Ctrl+C (128 + SIGINT)
const INTERRUPTED_EXIT: u8 = 130;

#[derive(Parser)]
#[command(name = "hanlua")]
#[command(version)]
#[command(about = "Write Lua with Korean keywords")]
#[command(long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a source file and print (or write) the Lua result
    Translate {
        /// Korean-keyword source file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the translation here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Translate a source file and run it
    Run {
        /// Korean-keyword source file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Interpreter executable (overrides configuration)
        #[arg(short, long)]
        interpreter: Option<PathBuf>,
    },

    /// List the keyword vocabulary
    Vocab {
        /// Only show one category (e.g. loop, math, boolean)
        #[arg(long)]
        category: Option<String>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let debug = debug
        || env::var("HANLUA_DEBUG").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let log_level = if debug { "debug" } else { "info" };

    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

async fn dispatch(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Translate { file, output } => {
            let session = open_session(cli.config.as_deref());
            translate_file(session, &file, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run { file, interpreter } => {
            let session = open_session(cli.config.as_deref());
            run_file(session, &file, interpreter).await
        }
        Commands::Vocab { category, json } => {
            list_vocabulary(category.as_deref(), json)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Session from --config, $HANLUA_CONFIG, or the default locations
fn open_session(path: Option<&Path>) -> Session {
    let path = path
        .map(Path::to_path_buf)
        .or_else(|| env::var("HANLUA_CONFIG").ok().map(PathBuf::from));

    match &path {
        Some(path) => hanlua::init_with_config(path).unwrap_or_else(|e| {
            warn!("{}; falling back to default configuration", e);
            Session::default()
        }),
        None => hanlua::init(),
    }
}

fn read_source(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

fn translate_file(mut session: Session, file: &Path, output: Option<&Path>) -> Result<()> {
    let source = read_source(file)?;
    let translated = session.translate(&source);

    match output {
        Some(out) => {
            fs::write(out, translated)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!("Wrote translation to {}", out.display());
        }
        None => print!("{}", translated),
    }
    Ok(())
}

async fn run_file(
    mut session: Session,
    file: &Path,
    interpreter: Option<PathBuf>,
) -> Result<ExitCode> {
    let source = read_source(file)?;
    if let Some(interpreter) = interpreter {
        session.set_interpreter(interpreter);
    }

    session.translate(&source);
    let mut events = session.run()?;

    let mut stdout = std::io::stdout();
    let mut interrupts = 0u32;
    let mut listening = true;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(OutputEvent::Stdout(text)) => {
                    stdout.write_all(text.as_bytes())?;
                    stdout.flush()?;
                }
                Some(OutputEvent::Stderr(text)) => eprint!("{}", text),
                Some(OutputEvent::Completed) | None => break,
            },
            signal = tokio::signal::ctrl_c(), if listening => {
                if let Err(e) = signal {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    listening = false;
                    continue;
                }
                interrupts += 1;
                match on_interrupt(interrupts) {
                    Interrupt::Stop => {
                        if session.stop() == StopOutcome::NothingToStop {
                            info!("Nothing to stop");
                        }
                    }
                    Interrupt::Exit => {
                        // Dropping the session terminates the interpreter.
                        warn!("Interrupted again; not waiting for the program to exit");
                        return Ok(ExitCode::from(INTERRUPTED_EXIT));
                    }
                }
            }
        }
    }
    println!("\n{}", FINISH_MARKER);

    if let Some(started) = session.started_at() {
        let elapsed = Local::now().signed_duration_since(started);
        info!(
            "Run finished as {} after {} ms",
            session.status(),
            elapsed.num_milliseconds()
        );
    }

    Ok(match session.status() {
        RunState::Failed => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

/// What a Ctrl+C does while a program runs
#[derive(Debug, PartialEq, Eq)]
enum Interrupt {
    /// Ask the program to stop and keep streaming until it exits
    Stop,
    /// Give up waiting and leave immediately
    Exit,
}

/// The first Ctrl+C stops the program; any later one exits
fn on_interrupt(count: u32) -> Interrupt {
    if count <= 1 {
        Interrupt::Stop
    } else {
        Interrupt::Exit
    }
}

fn list_vocabulary(category: Option<&str>, json: bool) -> Result<()> {
    let categories: Vec<TokenCategory> = match category {
        Some(name) => match TokenCategory::from_name(name) {
            Some(category) => vec![category],
            None => bail!(
                "unknown category '{}' (expected one of: {})",
                name,
                TokenCategory::ALL.map(TokenCategory::name).join(", ")
            ),
        },
        None => TokenCategory::ALL.to_vec(),
    };

    let vocabulary = hanlua::Vocabulary::korean_lua();
    if json {
        let entries: Vec<&VocabularyEntry> = categories
            .iter()
            .flat_map(|&category| vocabulary.by_category(category))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for category in categories {
        println!("[{}]", category);
        for entry in vocabulary.by_category(category) {
            println!("  {} → {}", entry.surface, entry.canonical);
        }
    }
    Ok(())
}
