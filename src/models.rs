// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One price observation as reported by the monthly progression endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "komoditi_id")]
    pub commodity_id: Option<i64>,
    #[serde(rename = "komoditi")]
    pub commodity: String,
    #[serde(default, rename = "gambar")]
    pub image: Option<String>,
    #[serde(rename = "tanggal")]
    pub date: String,
    #[serde(rename = "harga")]
    pub price: Decimal,
    #[serde(default, rename = "harga_sebelumnya")]
    pub previous_price: Option<Decimal>,
    #[serde(default, rename = "satuan")]
    pub unit: Option<String>,
    #[serde(rename = "pasar")]
    pub market: String,
}

impl PriceRecord {
    pub fn new(date: &str, price: Decimal, commodity: &str, market: &str) -> Self {
        Self {
            id: None,
            commodity_id: None,
            commodity: commodity.to_string(),
            image: None,
            date: date.to_string(),
            price,
            previous_price: None,
            unit: None,
            market: market.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commodity {
    pub id: i64,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "harga")]
    pub price: Decimal,
    #[serde(default, rename = "satuan")]
    pub unit: String,
    #[serde(default, rename = "gambar")]
    pub image: Option<String>,
    #[serde(default, rename = "pasar")]
    pub market: Option<String>,
}

/// A market. Id 0 is reserved for the synthetic "All markets" entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "nama")]
    pub name: String,
}

pub const ALL_MARKETS: &str = "All markets";

impl Category {
    pub fn all_markets() -> Self {
        Self {
            id: 0,
            name: ALL_MARKETS.to_string(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.id == 0
    }
}

/// Entry of the commodity listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub id: i64,
    #[serde(rename = "nama")]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Up => "Up",
            Trend::Down => "Down",
            Trend::Flat => "Flat",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
            Trend::Flat => "■",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Trend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "naik" => Ok(Trend::Up),
            "down" | "turun" => Ok(Trend::Down),
            "flat" | "tetap" => Ok(Trend::Flat),
            other => Err(anyhow::anyhow!(
                "Unknown trend '{}', expected up|down|flat",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendResult {
    pub trend: Trend,
    /// Absolute difference between the latest price and the window mean.
    pub change: Decimal,
    pub percentage: Decimal,
}

impl TrendResult {
    pub fn flat() -> Self {
        Self {
            trend: Trend::Flat,
            change: Decimal::ZERO,
            percentage: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum MarketFilter {
    #[default]
    All,
    Named(String),
}

impl MarketFilter {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") || s == ALL_MARKETS {
            MarketFilter::All
        } else {
            MarketFilter::Named(s.to_string())
        }
    }

    /// Case-insensitive unanchored match against a market name.
    pub fn matches(&self, market: &str) -> bool {
        match self {
            MarketFilter::All => true,
            MarketFilter::Named(m) => market.to_lowercase().contains(&m.to_lowercase()),
        }
    }
}

impl fmt::Display for MarketFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketFilter::All => f.write_str(ALL_MARKETS),
            MarketFilter::Named(m) => f.write_str(m),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TrendFilter {
    #[default]
    All,
    Only(Trend),
}

impl TrendFilter {
    pub fn matches(&self, trend: Trend) -> bool {
        match self {
            TrendFilter::All => true,
            TrendFilter::Only(t) => *t == trend,
        }
    }
}

impl FromStr for TrendFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("semua") {
            Ok(TrendFilter::All)
        } else {
            Ok(TrendFilter::Only(s.parse()?))
        }
    }
}

/// Current filter state of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Filters {
    pub search: String,
    pub market: MarketFilter,
    pub trend: TrendFilter,
}
