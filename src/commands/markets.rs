// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::state::AppState;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(state: &AppState, m: &clap::ArgMatches) -> Result<()> {
    let categories = &state.dataset.categories;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), categories)? {
        return Ok(());
    }
    if categories.is_empty() {
        println!("No markets available.");
        return Ok(());
    }
    let data = categories
        .iter()
        .map(|c| {
            let count = state
                .dataset
                .commodities
                .iter()
                .filter(|x| c.is_all() || x.market.as_deref() == Some(c.name.as_str()))
                .count();
            vec![c.id.to_string(), c.name.clone(), count.to_string()]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "Market", "Commodities"], data));
    Ok(())
}
