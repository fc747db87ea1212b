// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::chart::{render_png, render_svg};
use crate::engine::{chart_series, matching_history};
use crate::models::PriceRecord;
use crate::state::AppState;
use crate::utils::slug;
use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;

pub fn handle(state: &AppState, m: &clap::ArgMatches) -> Result<()> {
    let name = m.get_one::<String>("commodity").unwrap().trim();
    let fmt = m.get_one::<String>("format").unwrap().trim().to_lowercase();
    let market = super::market_filter(m);
    let size = (
        *m.get_one::<u32>("width").unwrap_or(&960),
        *m.get_one::<u32>("height").unwrap_or(&480),
    );

    let default_name = match fmt.as_str() {
        "csv" => format!("{}-data.csv", slug(name)),
        "svg" | "png" => format!("{}-chart.{}", slug(name), fmt),
        _ => bail!("Unknown format: {} (use csv|svg|png)", fmt),
    };
    let out = m
        .get_one::<String>("out")
        .map(|s| PathBuf::from(s.trim()))
        .unwrap_or_else(|| PathBuf::from(default_name));

    let matched = matching_history(&state.dataset.history, name, &market);
    if matched.is_empty() {
        return Err(anyhow!("No price history for '{}'", name));
    }

    match fmt.as_str() {
        "csv" => {
            let body = history_csv(&matched, name)?;
            std::fs::write(&out, body).with_context(|| format!("Write {}", out.display()))?;
        }
        "svg" => {
            let svg = render_svg(name, &chart_series(&matched), size)?;
            std::fs::write(&out, svg).with_context(|| format!("Write {}", out.display()))?;
        }
        _ => render_png(&out, name, &chart_series(&matched), size)?,
    }
    println!("Exported {} history to {}", name, out.display());
    Ok(())
}

/// `date,price,commodity` with one line per record after the header.
pub fn history_csv(records: &[&PriceRecord], commodity: &str) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["date", "price", "commodity"])?;
    for r in records {
        let price = r.price.to_string();
        wtr.write_record([r.date.as_str(), price.as_str(), commodity])?;
    }
    let bytes = wtr.into_inner().map_err(|e| anyhow!("CSV flush failed: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}
