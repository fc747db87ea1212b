// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Filtering, trend classification and aggregation over a price snapshot.
//!
//! Everything here is a pure function of its arguments.

use crate::models::{
    Commodity, Filters, MarketFilter, PriceRecord, Trend, TrendFilter, TrendResult,
};
use crate::utils::date_key;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of records before the latest one that form the comparison window.
pub const TREND_WINDOW: usize = 7;
pub const SPARKLINE_POINTS: usize = 7;

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Arithmetic mean, `None` for an empty slice or when even the scaled-down
/// sum does not fit in a `Decimal`.
fn mean_of(values: &[Decimal]) -> Option<Decimal> {
    let n = Decimal::from(values.len());
    match values.iter().try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v)) {
        Some(sum) => sum.checked_div(n),
        None => values
            .iter()
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v.checked_div(n)?)),
    }
}

fn sort_by_date(records: &mut [&PriceRecord]) {
    records.sort_by_key(|r| date_key(&r.date));
}

/// History records whose commodity name contains `name` and whose market
/// matches `market`, both case-insensitively.
pub fn matching_history<'a>(
    history: &'a [PriceRecord],
    name: &str,
    market: &MarketFilter,
) -> Vec<&'a PriceRecord> {
    history
        .iter()
        .filter(|r| contains_ci(&r.commodity, name) && market.matches(&r.market))
        .collect()
}

/// Compare the latest price against the mean of up to seven preceding
/// observations. Moves within 2% of the mean are flat.
pub fn classify_trend(history: &[PriceRecord], name: &str, market: &MarketFilter) -> TrendResult {
    let mut matched = matching_history(history, name, market);
    if matched.len() < 2 {
        return TrendResult::flat();
    }
    sort_by_date(&mut matched);

    let (latest, rest) = match matched.split_last() {
        Some(v) => v,
        None => return TrendResult::flat(),
    };
    let window = &rest[rest.len().saturating_sub(TREND_WINDOW)..];
    if window.is_empty() {
        return TrendResult::flat();
    }

    let prices: Vec<Decimal> = window.iter().map(|r| r.price).collect();
    let Some(mean) = mean_of(&prices) else {
        return TrendResult::flat();
    };
    let Some(diff) = latest.price.checked_sub(mean) else {
        return TrendResult::flat();
    };
    let threshold = mean.checked_mul(Decimal::new(2, 2)).unwrap_or(Decimal::ZERO);

    let trend = if diff > threshold {
        Trend::Up
    } else if diff < -threshold {
        Trend::Down
    } else {
        Trend::Flat
    };
    let change = diff.abs();
    // A zero mean, or a ratio too large to represent, has no meaningful
    // relative change.
    let percentage = change
        .checked_div(mean)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .map(|p| p.abs())
        .unwrap_or(Decimal::ZERO);

    TrendResult {
        trend,
        change,
        percentage,
    }
}

/// Apply search, market and trend filters, in that order.
pub fn filter_commodities<'a>(
    commodities: &'a [Commodity],
    history: &[PriceRecord],
    filters: &Filters,
) -> Vec<&'a Commodity> {
    let search = filters.search.trim();
    commodities
        .iter()
        .filter(|c| search.is_empty() || contains_ci(&c.name, search))
        .filter(|c| match (&filters.market, c.market.as_deref()) {
            (MarketFilter::All, _) => true,
            (m, Some(market)) => m.matches(market),
            (_, None) => false,
        })
        .filter(|c| match filters.trend {
            TrendFilter::All => true,
            t => t.matches(classify_trend(history, &c.name, &filters.market).trend),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_records: usize,
}

impl<T> Page<T> {
    /// Number of records before the first item of this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// Slice one 1-based page out of `items`. Page 0 is treated as page 1 and a
/// page past the end is empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total_records = items.len();
    let total_pages = total_records.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size).min(total_records);
    let end = start.saturating_add(page_size).min(total_records);
    Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total_pages,
        total_records,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SparklineMode {
    /// Mean of all markets per date.
    #[default]
    Average,
    /// Only the selected market; averages when none is selected.
    PerMarket,
}

impl std::str::FromStr for SparklineMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "average" | "avg" => Ok(SparklineMode::Average),
            "per-market" | "market" => Ok(SparklineMode::PerMarket),
            other => Err(anyhow::anyhow!(
                "Unknown sparkline mode '{}', expected average|per-market",
                other
            )),
        }
    }
}

/// Last seven aggregated price points for a commodity, oldest first.
pub fn sparkline(
    history: &[PriceRecord],
    name: &str,
    market: &MarketFilter,
    mode: SparklineMode,
) -> Vec<Decimal> {
    let scope = match mode {
        SparklineMode::PerMarket => market.clone(),
        SparklineMode::Average => MarketFilter::All,
    };
    let matched = matching_history(history, name, &scope);

    let mut by_date: BTreeMap<Option<chrono::NaiveDateTime>, Vec<Decimal>> = BTreeMap::new();
    for r in matched {
        by_date.entry(date_key(&r.date)).or_default().push(r.price);
    }
    let points: Vec<Decimal> = by_date.values().filter_map(|prices| mean_of(prices)).collect();
    points[points.len().saturating_sub(SPARKLINE_POINTS)..].to_vec()
}

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render points as a row of unicode block characters.
pub fn render_sparkline(points: &[Decimal]) -> String {
    let (Some(min), Some(max)) = (points.iter().min(), points.iter().max()) else {
        return String::new();
    };
    let span = max.checked_sub(*min).unwrap_or(Decimal::ZERO);
    points
        .iter()
        .map(|p| {
            if span.is_zero() {
                BARS[3]
            } else {
                let scaled = (*p - *min) / span * Decimal::from(BARS.len() - 1);
                let idx = scaled.round().to_usize().unwrap_or(0);
                BARS[idx.min(BARS.len() - 1)]
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub market: String,
    /// One slot per entry of `ChartData::dates`; `None` is a gap.
    pub points: Vec<Option<Decimal>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub dates: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn price_range(&self) -> Option<(Decimal, Decimal)> {
        let mut it = self.series.iter().flat_map(|s| s.points.iter().flatten());
        let first = *it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))))
    }
}

/// Split matched records into one line per market over a shared date axis.
pub fn chart_series(records: &[&PriceRecord]) -> ChartData {
    let mut sorted = records.to_vec();
    sort_by_date(&mut sorted);

    let mut dates: Vec<String> = Vec::new();
    for r in &sorted {
        if !dates.iter().any(|d| d == &r.date) {
            dates.push(r.date.clone());
        }
    }

    let mut markets: Vec<String> = Vec::new();
    for r in records {
        if !markets.iter().any(|m| m == &r.market) {
            markets.push(r.market.clone());
        }
    }

    let series = markets
        .into_iter()
        .map(|market| {
            let points = dates
                .iter()
                .map(|d| {
                    sorted
                        .iter()
                        .find(|r| r.market == market && &r.date == d)
                        .map(|r| r.price)
                })
                .collect();
            Series { market, points }
        })
        .collect();

    ChartData { dates, series }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, price: i64, name: &str, market: &str) -> PriceRecord {
        PriceRecord::new(date, Decimal::from(price), name, market)
    }

    #[test]
    fn sparkline_average_merges_markets() {
        let history = vec![
            rec("2025-01-01", 100, "Beras", "Pasar Manis"),
            rec("2025-01-01", 200, "Beras", "Pasar Subuh"),
            rec("2025-01-02", 300, "Beras", "Pasar Manis"),
        ];
        let pts = sparkline(&history, "beras", &MarketFilter::All, SparklineMode::Average);
        assert_eq!(pts, vec![Decimal::from(150), Decimal::from(300)]);

        let subuh = MarketFilter::Named("subuh".into());
        let pts = sparkline(&history, "beras", &subuh, SparklineMode::PerMarket);
        assert_eq!(pts, vec![Decimal::from(200)]);
    }

    #[test]
    fn sparkline_keeps_last_seven() {
        let history: Vec<_> = (1..=10)
            .map(|d| rec(&format!("2025-01-{:02}", d), d * 10, "Gula", "Pasar Manis"))
            .collect();
        let pts = sparkline(&history, "gula", &MarketFilter::All, SparklineMode::Average);
        assert_eq!(pts.len(), 7);
        assert_eq!(pts[0], Decimal::from(40));
        assert_eq!(pts[6], Decimal::from(100));
    }

    #[test]
    fn render_sparkline_scales_to_blocks() {
        let pts = [0, 2, 14].map(Decimal::from);
        assert_eq!(render_sparkline(&pts), "▁▂█");
        assert_eq!(render_sparkline(&[Decimal::ONE, Decimal::ONE]), "▄▄");
        assert_eq!(render_sparkline(&[]), "");
    }

    #[test]
    fn chart_series_leaves_gaps() {
        let history = vec![
            rec("2025-01-02", 110, "Cabe", "Pasar Manis"),
            rec("2025-01-01", 100, "Cabe", "Pasar Manis"),
            rec("2025-01-02", 90, "Cabe", "Pasar Subuh"),
        ];
        let matched = matching_history(&history, "cabe", &MarketFilter::All);
        let chart = chart_series(&matched);
        assert_eq!(chart.dates, vec!["2025-01-01", "2025-01-02"]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].market, "Pasar Manis");
        assert_eq!(
            chart.series[0].points,
            vec![Some(Decimal::from(100)), Some(Decimal::from(110))]
        );
        assert_eq!(chart.series[1].points, vec![None, Some(Decimal::from(90))]);
        assert_eq!(
            chart.price_range(),
            Some((Decimal::from(90), Decimal::from(110)))
        );
    }
}
