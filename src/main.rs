//! CLI entry point for the billfetch tool.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use billfetch_core::{AuthStateStore, PeriodRules};

mod cli;

use cli::{Args, AuthCommand, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    match args.command {
        Command::Periods { platform } => periods(&platform),
        Command::Auth { command } => match command {
            AuthCommand::List { state_dir } => auth_list(&state_dir),
            AuthCommand::Show {
                platform,
                state_dir,
            } => auth_show(&platform, &state_dir).await,
            AuthCommand::Clear {
                platform,
                state_dir,
            } => auth_clear(&platform, &state_dir),
        },
    }
}

fn periods(platform: &str) -> Result<()> {
    let rules = PeriodRules::standard();
    let periods = rules.periods_to_download(platform)?;

    info!(platform, year = rules.year(), count = periods.len(), "period plan");
    for period in periods {
        println!("{period}");
    }
    Ok(())
}

fn auth_list(state_dir: &Path) -> Result<()> {
    let entries = match std::fs::read_dir(state_dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            info!(state_dir = %state_dir.display(), "no state directory yet");
            return Ok(());
        }
        Err(error) => {
            return Err(error)
                .with_context(|| format!("reading state directory {}", state_dir.display()));
        }
    };

    let mut platforms: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            } else {
                None
            }
        })
        .collect();
    platforms.sort();

    for platform in platforms {
        println!("{platform}");
    }
    Ok(())
}

async fn auth_show(platform: &str, state_dir: &Path) -> Result<()> {
    let store = AuthStateStore::new(state_dir);
    let Some(state) = store.load(platform).await? else {
        warn!(platform, "no persisted session state");
        return Ok(());
    };

    println!("platform: {platform}");
    println!("cookies: {}", state.cookies.len());
    for origin in &state.origins {
        println!(
            "origin: {} (localStorage: {}, sessionStorage: {})",
            origin.origin,
            origin.local_storage.len(),
            origin.session_storage.len()
        );
    }
    Ok(())
}

fn auth_clear(platform: &str, state_dir: &Path) -> Result<()> {
    let store = AuthStateStore::new(state_dir);
    let path = store.state_path(platform);
    match std::fs::remove_file(&path) {
        Ok(()) => {
            info!(platform, path = %path.display(), "cleared session state");
            Ok(())
        }
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            warn!(platform, "no session state to clear");
            Ok(())
        }
        Err(error) => {
            Err(error).with_context(|| format!("removing session state {}", path.display()))
        }
    }
}
