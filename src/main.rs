use clap::Parser;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use zen_lisp::cli::{generate_completions, Args, Commands};
use zen_lisp::config::AppConfig;
use zen_lisp::convert;
use zen_lisp::diagnostic::render_diagnostics;
use zen_lisp::format::{display_result, value_to_json_string};
use zen_lisp::interpreter::{parse_and_run_with_diagnostics, Environment, Evaluator};

const PROMPT: &str = "> ";
const REPL_ORIGIN: &str = "<repl>";

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);
    init_logging(&config);

    let env = Environment::new();
    if let Err(e) = bind_inputs(&args, &env) {
        error_message(&config, &e.to_string());
        std::process::exit(1);
    }

    let evaluator = Evaluator::new(config.eval);
    debug!(max_depth = config.eval.max_depth, "evaluator ready");

    match read_source(&args) {
        Ok(Some((source, origin))) => execute(&source, &origin, &env, &evaluator, &args.out, &config),
        Ok(None) => run_interactive_mode(&env, &evaluator, &config),
        Err(e) => {
            error_message(&config, &e);
            std::process::exit(1);
        }
    }
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(config.color_enabled)
        .init();
}

fn bind_inputs(args: &Args, env: &Environment) -> Result<(), convert::InputError> {
    let count = if let Some(path) = &args.input_file {
        debug!(path = %path.display(), "reading inputs from file");
        convert::bind_inputs_from_file(env, path)?
    } else if let Some(json) = &args.input {
        debug!("reading inputs from command-line argument");
        convert::bind_inputs(env, json)?
    } else {
        0
    };
    debug!(count, "bound inputs");
    Ok(())
}

/// The source text and the name diagnostics refer to it by, or `None` for
/// an interactive session.
fn read_source(args: &Args) -> Result<Option<(String, String)>, String> {
    if let Some(file) = &args.file {
        debug!(path = %file.display(), "reading source from file");
        let source = read_file(file)?;
        Ok(Some((source, file.display().to_string())))
    } else if let Some(source) = &args.source {
        debug!("reading source from command-line argument");
        Ok(Some((source.clone(), "<source>".to_string())))
    } else {
        Ok(None)
    }
}

fn execute(
    source: &str,
    origin: &str,
    env: &Environment,
    evaluator: &Evaluator,
    out_file: &Option<PathBuf>,
    config: &AppConfig,
) {
    let output = match parse_and_run_with_diagnostics(source, env, evaluator) {
        Ok(value) => {
            debug!("evaluation succeeded");
            format!("{}\n", value_to_json_string(&value, config.compact))
        }
        Err(diagnostics) => {
            let rendered = render_diagnostics(source, origin, &diagnostics, config.color_enabled);
            eprint!("{}", rendered);
            std::process::exit(1);
        }
    };

    match out_file {
        Some(path) => {
            debug!(path = %path.display(), "writing output to file");
            if let Err(e) = std::fs::write(path, output) {
                error_message(config, &format!("Error writing to output file: {}", e));
                std::process::exit(1);
            }
        }
        None => {
            print!("{}", output);
            let _ = io::stdout().flush();
        }
    }
}

/// One long-lived environment; each line is evaluated on its own and errors
/// do not end the session.
fn run_interactive_mode(env: &Environment, evaluator: &Evaluator, config: &AppConfig) {
    debug!("entering interactive mode");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", PROMPT);
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                error_message(config, &format!("Error reading input: {}", e));
                break;
            }
            None => break,
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }

        match parse_and_run_with_diagnostics(trimmed, env, evaluator) {
            Ok(value) => println!("{}", display_result(&value)),
            Err(diagnostics) => {
                eprint!(
                    "{}",
                    render_diagnostics(trimmed, REPL_ORIGIN, &diagnostics, config.color_enabled)
                );
            }
        }
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
