// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::dashboard::write_page;
use super::history::write_history;
use crate::loader::{LoadOutcome, Loader};
use crate::models::{MarketFilter, TrendFilter};
use crate::state::{Action, AppState};
use anyhow::Result;
use std::io::{BufRead, Write};

const HELP: &str = "\
commands:
  search TEXT        filter by commodity name (empty clears)
  market NAME|all    switch market
  trend up|down|flat|all
  page N | next | prev
  open N             price history of card N
  markets            list markets
  refresh            fetch the data again
  help | quit";

pub fn handle(state: &mut AppState, loader: Option<&Loader>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run(state, loader, stdin.lock(), &mut stdout)
}

/// Read commands line by line until `quit` or end of input, redrawing the
/// page after every state change.
pub fn run<R: BufRead, W: Write>(
    state: &mut AppState,
    loader: Option<&Loader>,
    input: R,
    out: &mut W,
) -> Result<()> {
    redraw(state, out)?;
    for line in input.lines() {
        let line = line?;
        let (cmd, arg) = match line.trim().split_once(char::is_whitespace) {
            Some((c, a)) => (c.to_lowercase(), a.trim().to_string()),
            None => (line.trim().to_lowercase(), String::new()),
        };
        match cmd.as_str() {
            "" => continue,
            "quit" | "exit" | "q" => break,
            "help" | "?" => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            "search" => {
                state.apply(Action::SetSearch(arg));
            }
            "market" => {
                state.apply(Action::SetMarket(MarketFilter::parse(&arg)));
            }
            "trend" => match arg.parse::<TrendFilter>() {
                Ok(t) => {
                    state.apply(Action::SetTrend(t));
                }
                Err(e) => {
                    writeln!(out, "{}", e)?;
                    continue;
                }
            },
            "page" => match arg.parse::<usize>() {
                Ok(p) => {
                    state.apply(Action::SetPage(p));
                }
                Err(_) => {
                    writeln!(out, "Invalid page '{}'", arg)?;
                    continue;
                }
            },
            "next" | "n" => {
                state.apply(Action::NextPage);
            }
            "prev" | "p" => {
                state.apply(Action::PrevPage);
            }
            "open" => {
                open_card(state, &arg, out)?;
                continue;
            }
            "markets" => {
                for c in &state.dataset.categories {
                    writeln!(out, "  {}", c.name)?;
                }
                continue;
            }
            "refresh" => {
                let seq = state.begin_fetch();
                let outcome = match loader {
                    Some(l) => l.load(),
                    None => LoadOutcome::offline(),
                };
                state.apply(Action::Loaded { seq, outcome });
            }
            other => {
                writeln!(out, "Unknown command '{}'. Type 'help'.", other)?;
                continue;
            }
        }
        redraw(state, out)?;
    }
    Ok(())
}

fn redraw<W: Write>(state: &mut AppState, out: &mut W) -> Result<()> {
    for notice in state.take_notices() {
        writeln!(out, "warning: {}", notice)?;
    }
    let view = state.view();
    write_page(out, state, &view)
}

fn open_card<W: Write>(state: &AppState, arg: &str, out: &mut W) -> Result<()> {
    let view = state.view();
    let card = arg
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(view.offset().saturating_add(1)))
        .and_then(|i| view.items.get(i));
    match card {
        Some(card) => write_history(out, state, &card.commodity.name, &MarketFilter::All),
        None => {
            writeln!(out, "No card '{}' on this page", arg)?;
            Ok(())
        }
    }
}
