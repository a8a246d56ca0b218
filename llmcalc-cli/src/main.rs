//! # llmcalc CLI
//!
//! Command-line front end for the LLM-backed calculator.
//!
//! Usage:
//!   llmcalc <operation>...
//!   llmcalc                 (interactive: one operation per line)
//!
//! Examples:
//!   llmcalc "3*7"
//!   llmcalc --json "sqrt(2)^2"
//!   llmcalc -vv --model gpt-4o "integral of x from 0 to 1"

use clap::Parser;
use colored::Colorize;
use llmcalc_agent::Calculator;
use llmcalc_core::config::{DEFAULT_BASE_URL, DEFAULT_CREDENTIAL_URL, DEFAULT_MODEL};
use llmcalc_core::{CalculatorConfig, ErrorKind, EvaluationResult, Phase, Screen, Surface, Surfaces, Tone, UiState};
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "llmcalc")]
#[command(author, version, about = "llmcalc - evaluate math operations with an LLM")]
struct Cli {
    /// Operation to evaluate (interactive mode when omitted)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    operation: Vec<String>,

    /// Key-distribution endpoint returning [{"apiKey": ...}]
    #[arg(long, env = "LLMCALC_CREDENTIAL_URL", default_value = DEFAULT_CREDENTIAL_URL)]
    credential_url: String,

    /// OpenAI-compatible base URL (".../chat/completions" is appended)
    #[arg(long, env = "LLMCALC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Completion model
    #[arg(short, long, env = "LLMCALC_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Print the evaluation result as JSON instead of the panels
    #[arg(long)]
    json: bool,

    /// Log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> CalculatorConfig {
        CalculatorConfig::new()
            .with_credential_url(&self.credential_url)
            .with_base_url(&self.base_url)
            .with_model(&self.model)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn styled(surface: &Surface) -> String {
    match surface.tone {
        Tone::Neutral => surface.text.dimmed().to_string(),
        Tone::Success => surface.text.green().to_string(),
        Tone::Error => surface.text.red().to_string(),
    }
}

/// Terminal rendering of the surfaces after a transition
fn render(surfaces: &Surfaces, state: UiState) -> String {
    match state {
        UiState::Loading(_) => format!("... {}", styled(&surfaces.status)),
        UiState::Validating => styled(&surfaces.status),
        UiState::Idle => "(cleared)".dimmed().to_string(),
        UiState::Success | UiState::Error => format!(
            "{}\n  result: {}\n  latex:  {}",
            styled(&surfaces.status),
            surfaces.value.text,
            surfaces.latex.text,
        ),
    }
}

fn screen(json: bool) -> Screen {
    Screen::new().with_render_callback(move |surfaces, state| {
        match state {
            // progress goes to stderr so stdout only carries results
            UiState::Loading(Phase::Credential | Phase::Evaluation) => {
                eprintln!("{}", render(surfaces, state));
            }
            UiState::Success if json => {}
            _ => println!("{}", render(surfaces, state)),
        }
    })
}

fn json_text(result: &EvaluationResult, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
}

/// Print `result` as JSON on stdout; serialization errors go to stderr
fn print_json(result: &EvaluationResult, pretty: bool) -> bool {
    match json_text(result, pretty) {
        Ok(text) => {
            println!("{}", text);
            true
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            false
        }
    }
}

fn exit_code(kind: ErrorKind) -> ExitCode {
    if kind.is_local() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

async fn run_once(calc: &Calculator<llmcalc_core::ReqwestTransport>, operation: &str, json: bool) -> ExitCode {
    let mut screen = screen(json);
    screen.set_input(operation);

    match calc.run(operation, &mut screen).await {
        Ok(result) => {
            if json && !print_json(&result, true) {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(err) => exit_code(err.kind()),
    }
}

async fn run_interactive(calc: &Calculator<llmcalc_core::ReqwestTransport>, json: bool) -> ExitCode {
    eprintln!("{}", "llmcalc - type an operation, :clear to reset, :quit to exit".dimmed());

    let mut screen = screen(json);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                return ExitCode::FAILURE;
            }
        };

        match line.trim() {
            ":quit" | ":q" => break,
            ":clear" => calc.clear(&mut screen),
            _ => {
                screen.set_input(line.as_str());
                if let Ok(result) = calc.run(&line, &mut screen).await {
                    if json {
                        print_json(&result, false);
                    }
                }
            }
        }
    }

    ExitCode::SUCCESS
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let calc = match Calculator::new(cli.config()) {
        Ok(calc) => calc,
        Err(e) => {
            eprintln!("Error: {}", e.message());
            tracing::debug!(error = ?e, "startup failed");
            return exit_code(e.kind());
        }
    };

    if cli.operation.is_empty() {
        run_interactive(&calc, cli.json).await
    } else {
        let operation = cli.operation.join(" ");
        run_once(&calc, &operation, cli.json).await
    }
}
