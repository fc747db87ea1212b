// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pangan::config::Settings;
use pangan::loader::{LoadOutcome, Loader};
use pangan::state::{Action, AppState};
use pangan::{cli, commands};

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pangan={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    init_tracing(matches.get_count("verbose"));
    let settings = Settings::load()?.merge_cli(&matches);
    debug!(?settings, "settings");

    let loader = if matches.get_flag("offline") {
        None
    } else {
        Some(Loader::new(&settings)?)
    };

    if let Some(("commodity", sub)) = matches.subcommand() {
        return commands::commodity::handle(loader.as_ref(), sub);
    }

    let mut state = AppState::new(settings.page_size, settings.sparkline);
    let seq = state.begin_fetch();
    let outcome = match &loader {
        Some(l) => l.load(),
        None => LoadOutcome::offline(),
    };
    state.apply(Action::Loaded { seq, outcome });

    let interactive = matches!(matches.subcommand(), Some(("browse", _)));
    if !interactive {
        for notice in state.take_notices() {
            eprintln!("warning: {}", notice);
        }
    }

    match matches.subcommand() {
        Some(("markets", sub)) => commands::markets::handle(&state, sub)?,
        Some(("list", sub)) => commands::dashboard::handle(&mut state, sub)?,
        Some(("history", sub)) => commands::history::handle(&state, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&state, sub)?,
        Some(("browse", _)) => commands::browse::handle(&mut state, loader.as_ref())?,
        Some(("doctor", _)) => commands::doctor::handle(&state)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
