// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod browse;
pub mod commodity;
pub mod dashboard;
pub mod doctor;
pub mod exporter;
pub mod history;
pub mod markets;

use crate::models::MarketFilter;

pub(crate) fn market_filter(m: &clap::ArgMatches) -> MarketFilter {
    m.get_one::<String>("market")
        .map(|s| MarketFilter::parse(s))
        .unwrap_or_default()
}
