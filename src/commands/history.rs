// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{chart_series, classify_trend, matching_history, ChartData};
use crate::models::MarketFilter;
use crate::state::AppState;
use crate::utils::{fmt_rupiah, maybe_print_json, pretty_table};
use anyhow::Result;
use comfy_table::Table;
use std::io::Write;

pub fn handle(state: &AppState, m: &clap::ArgMatches) -> Result<()> {
    let name = m.get_one::<String>("commodity").unwrap().trim();
    let market = super::market_filter(m);
    show(state, name, &market, m.get_flag("json"), m.get_flag("jsonl"))
}

pub fn show(
    state: &AppState,
    name: &str,
    market: &MarketFilter,
    json_flag: bool,
    jsonl_flag: bool,
) -> Result<()> {
    if json_flag || jsonl_flag {
        let matched = matching_history(&state.dataset.history, name, market);
        maybe_print_json(json_flag, jsonl_flag, &chart_series(&matched))?;
        return Ok(());
    }
    write_history(&mut std::io::stdout().lock(), state, name, market)
}

pub fn write_history<W: Write>(
    out: &mut W,
    state: &AppState,
    name: &str,
    market: &MarketFilter,
) -> Result<()> {
    let history = &state.dataset.history;
    let matched = matching_history(history, name, market);
    let chart = chart_series(&matched);
    if chart.is_empty() {
        writeln!(out, "No price history for '{}'.", name)?;
        return Ok(());
    }
    writeln!(out, "{} ({})", name, market)?;
    writeln!(out, "{}", history_table(&chart))?;
    let trend = classify_trend(history, name, market);
    writeln!(out, "Trend: {}", super::dashboard::trend_cell(&trend))?;
    Ok(())
}

/// One row per date, one column per market, `-` where a market has no price.
pub fn history_table(chart: &ChartData) -> Table {
    let mut headers = vec!["Date"];
    headers.extend(chart.series.iter().map(|s| s.market.as_str()));
    let rows = chart
        .dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let mut row = vec![date.clone()];
            row.extend(chart.series.iter().map(|s| {
                s.points[i]
                    .as_ref()
                    .map(fmt_rupiah)
                    .unwrap_or_else(|| "-".to_string())
            }));
            row
        })
        .collect();
    pretty_table(&headers, rows)
}
