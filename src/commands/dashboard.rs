// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{render_sparkline, Page, SparklineMode};
use crate::models::{Trend, TrendFilter, TrendResult};
use crate::state::{Action, AppState, Card};
use crate::utils::{fmt_percent, fmt_rupiah, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use comfy_table::Table;
use std::io::Write;

pub fn handle(state: &mut AppState, m: &clap::ArgMatches) -> Result<()> {
    if let Some(s) = m.get_one::<String>("search") {
        state.apply(Action::SetSearch(s.clone()));
    }
    state.apply(Action::SetMarket(super::market_filter(m)));
    let trend: TrendFilter = m
        .get_one::<String>("trend")
        .map(|s| s.parse::<TrendFilter>())
        .transpose()
        .context("Invalid --trend")?
        .unwrap_or_default();
    state.apply(Action::SetTrend(trend));
    if let Some(mode) = m.get_one::<String>("sparkline") {
        state.sparkline = mode.parse::<SparklineMode>()?;
    }
    state.apply(Action::SetPage(*m.get_one::<usize>("page").unwrap_or(&1)));

    let view = state.view();
    if m.get_flag("json") {
        return maybe_print_json(true, false, &view).map(|_| ());
    }
    if maybe_print_json(false, m.get_flag("jsonl"), &view.items)? {
        return Ok(());
    }
    write_page(&mut std::io::stdout().lock(), state, &view)
}

pub fn trend_cell(t: &TrendResult) -> String {
    match t.trend {
        Trend::Flat => format!("{} {}", t.trend.arrow(), t.trend),
        _ => format!(
            "{} {} {} ({})",
            t.trend.arrow(),
            t.trend,
            fmt_percent(&t.percentage),
            fmt_rupiah(&t.change)
        ),
    }
}

pub fn cards_table(view: &Page<Card>) -> Table {
    let offset = view.offset();
    let rows = view
        .items
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let c = &card.commodity;
            vec![
                (offset + i + 1).to_string(),
                c.name.clone(),
                c.market.clone().unwrap_or_else(|| "-".into()),
                fmt_rupiah(&c.price),
                if c.unit.is_empty() { "-".into() } else { c.unit.clone() },
                trend_cell(&card.trend),
                render_sparkline(&card.sparkline),
            ]
        })
        .collect();
    pretty_table(
        &["#", "Commodity", "Market", "Price", "Unit", "Trend", "7-day"],
        rows,
    )
}

/// Cards table plus the page footer.
pub fn write_page<W: Write>(out: &mut W, state: &AppState, view: &Page<Card>) -> Result<()> {
    if state.loading {
        writeln!(out, "Loading prices...")?;
    }
    if state.dataset.is_fallback() {
        writeln!(out, "Some APIs could not be reached; showing sample data.")?;
    }
    writeln!(out, "Market: {}", state.filters.market)?;
    if view.items.is_empty() {
        writeln!(out, "No commodities match the current filters.")?;
    } else {
        writeln!(out, "{}", cards_table(view))?;
    }
    writeln!(
        out,
        "Page {}/{} ({} records)",
        view.page,
        view.total_pages.max(1),
        view.total_records
    )?;
    Ok(())
}
