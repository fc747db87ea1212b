// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dataset::Dataset;
use crate::engine::{matching_history, TREND_WINDOW};
use crate::models::MarketFilter;
use crate::state::AppState;
use crate::utils::{date_key, pretty_table};
use anyhow::Result;

pub fn handle(state: &AppState) -> Result<()> {
    let rows = diagnose(&state.dataset);
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// `[issue, detail]` pairs for everything that looks inconsistent.
pub fn diagnose(ds: &Dataset) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    if ds.is_fallback() {
        rows.push(vec!["sample_data".into(), "price history not loaded".into()]);
    }

    // 1) Commodity markets without a category
    for c in &ds.commodities {
        if let Some(m) = &c.market {
            if !ds.markets().any(|cat| &cat.name == m) {
                rows.push(vec!["market_without_category".into(), format!("{} @ {}", c.name, m)]);
            }
        }
    }

    // 2) Dates that cannot be ordered
    for r in &ds.history {
        if date_key(&r.date).is_none() {
            rows.push(vec![
                "unparseable_date".into(),
                format!("{} {} '{}'", r.commodity, r.market, r.date),
            ]);
        }
    }

    // 3) Zero trailing mean makes the percentage change meaningless
    for c in &ds.commodities {
        let market = c
            .market
            .as_deref()
            .map(|m| MarketFilter::Named(m.to_string()))
            .unwrap_or_default();
        let mut matched = matching_history(&ds.history, &c.name, &market);
        if matched.len() < 2 {
            continue;
        }
        matched.sort_by_key(|r| date_key(&r.date));
        let rest = &matched[..matched.len() - 1];
        let window = &rest[rest.len().saturating_sub(TREND_WINDOW)..];
        if window.iter().all(|r| r.price.is_zero()) {
            rows.push(vec!["zero_trend_baseline".into(), format!("{} @ {}", c.name, market)]);
        }
    }

    rows
}
