//! rawline-demo - read a name from the terminal with rawline.
//!
//! # Usage
//!
//! ```bash
//! rawline-demo
//! rawline-demo --max-length 12 --no-insert-highlight
//! rawline-demo --highlight-style '<\e[7m%s\e[0m>' --save
//! ```
//!
//! Up fills in a sample name, Down upper-cases the line and Escape clears it
//! and ends the read.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rawline::config::{
    ConfigFlags, clear_config_flags, expand_escapes, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use rawline::perf;
use rawline::{Action, CallbackResult, Callbacks};

const DEFAULT_PROMPT: &str = "Enter your name: ";
const SAMPLE_NAME: &str = "Crash Test Dummy";

/// An interactive single-line editor demo
#[derive(Parser, Debug)]
#[command(name = "rawline-demo", version, about, long_about = None)]
struct Cli {
    /// Maximum number of characters accepted
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    max_length: Option<u64>,

    /// Prompt printed before the line
    #[arg(long, value_name = "TEXT")]
    prompt: Option<String>,

    /// Disable every highlight message
    #[arg(long)]
    no_highlight: bool,

    /// Disable the Escape highlight
    #[arg(long)]
    no_escape_highlight: bool,

    /// Disable the Insert highlight
    #[arg(long)]
    no_insert_highlight: bool,

    /// Disable the empty-line highlight
    #[arg(long)]
    no_empty_highlight: bool,

    /// Highlight template; `%s` is replaced by the message, `\e` by ESC
    #[arg(long, value_name = "STYLE")]
    highlight_style: Option<String>,

    /// How long a highlight stays up, in microseconds
    #[arg(long, value_name = "MICROS")]
    highlight_time: Option<u64>,

    /// Message shown when Escape is pressed
    #[arg(long, value_name = "TEXT")]
    escape_message: Option<String>,

    /// Message shown when Insert is pressed
    #[arg(long, value_name = "TEXT")]
    insert_message: Option<String>,

    /// Message shown when the line becomes empty
    #[arg(long, value_name = "TEXT")]
    empty_message: Option<String>,

    /// Write key and callback events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Print read timing to stderr
    #[arg(long)]
    perf: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn demo_callbacks() -> Callbacks {
    Callbacks::new()
        .on(Action::Up, |_, _, _| {
            CallbackResult::none().with_string(SAMPLE_NAME).with_pos(2)
        })
        .on(Action::Down, |line, _, _| {
            CallbackResult::none().with_string(line.to_uppercase())
        })
        .on(Action::Escape, |_, _, _| {
            CallbackResult::none().with_string("").with_end(true)
        })
}

#[cfg(unix)]
fn read_line(effective: &ConfigFlags) -> Result<String> {
    use std::io::Write;

    let prompt = effective
        .prompt
        .as_deref()
        .map_or_else(|| DEFAULT_PROMPT.to_string(), expand_escapes);
    let mut stdout = std::io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    rawline::read_with(effective.to_read_options(), demo_callbacks()).context("Read error")
}

#[cfg(not(unix))]
fn read_line(_effective: &ConfigFlags) -> Result<String> {
    anyhow::bail!("rawline-demo needs a Unix terminal")
}

fn main() -> Result<()> {
    // Logs go to stderr so they never land inside the edited line
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed arguments");
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_timing(effective.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os(perf::DEBUG_LOG_ENV).map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize debug log {}: {}",
            debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    let line = read_line(&effective)?;
    println!("\n\nRESULT: {line}");
    Ok(())
}
