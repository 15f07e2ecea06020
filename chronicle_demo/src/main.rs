//! Terminal front end for the EVE Chronicle demo.
//!
//! Usage: `chronicle [config.toml]`
//!
//! Commands, one per line: `w`/`k` up, `s`/`j` down, empty line to confirm,
//! `q` to quit. Anything else counts as "any key".

use anyhow::{Context, Result};
use chronicle_demo::{DemoConfig, DemoSession, Input, Signal};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn parse_command(line: &str) -> Option<Input> {
    match line.trim().to_ascii_lowercase().as_str() {
        "q" | "quit" => None,
        "w" | "k" | "up" => Some(Input::Up),
        "s" | "j" | "down" => Some(Input::Down),
        "" | "enter" => Some(Input::Confirm),
        _ => Some(Input::Any),
    }
}

fn main() -> Result<()> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => DemoConfig::load(&path)
            .with_context(|| format!("loading config from {:?}", path))?,
        None => DemoConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    info!("Starting {}", config.title);
    let mut session = DemoSession::new(config);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        write!(stdout, "\n{}> ", session.view())?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("reading input")?;

        let Some(input) = parse_command(&line) else {
            break;
        };
        if session.handle_input(input) == Signal::Quit {
            break;
        }
    }

    info!("Goodbye, capsuleer");
    Ok(())
}
