// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::loader::Loader;
use crate::models::Commodity;
use crate::utils::{fmt_rupiah, maybe_print_json, pretty_table};
use anyhow::{bail, Context, Result};

/// `loader` is `None` in offline mode, where these endpoints are unavailable.
pub fn handle(loader: Option<&Loader>, m: &clap::ArgMatches) -> Result<()> {
    let Some(loader) = loader else {
        bail!("The commodity endpoints need the network; drop --offline.");
    };
    match m.subcommand() {
        Some(("list", sub)) => {
            let items = match loader.fetch_all_commodities() {
                Ok(items) => items,
                Err(e) => {
                    eprintln!("Failed to fetch commodities: {}", e);
                    Vec::new()
                }
            };
            print(&items, sub)?;
        }
        Some(("show", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let c = loader
                .fetch_commodity_by_id(id)
                .with_context(|| format!("Commodity {} not available", id))?;
            print(std::slice::from_ref(&c), sub)?;
        }
        _ => {}
    }
    Ok(())
}

fn print(items: &[Commodity], m: &clap::ArgMatches) -> Result<()> {
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &items)? {
        return Ok(());
    }
    let rows = items
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.name.clone(),
                fmt_rupiah(&c.price),
                c.unit.clone(),
                c.image.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "Commodity", "Price", "Unit", "Image"], rows));
    Ok(())
}
