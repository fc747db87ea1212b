// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Commodity, PriceRecord};
use crate::utils::date_key;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// One fetched snapshot. Refetching replaces it as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub commodities: Vec<Commodity>,
    pub categories: Vec<Category>,
    pub history: Vec<PriceRecord>,
}

impl Dataset {
    /// Normalize a flat history into commodities (latest price per
    /// name/market pair) and categories (distinct markets).
    pub fn from_records(history: Vec<PriceRecord>) -> Self {
        let mut latest: BTreeMap<(String, String), &PriceRecord> = BTreeMap::new();
        for rec in &history {
            let key = (rec.commodity.trim().to_string(), rec.market.trim().to_string());
            match latest.get(&key) {
                Some(cur) if date_key(&cur.date) > date_key(&rec.date) => {}
                _ => {
                    latest.insert(key, rec);
                }
            }
        }

        let commodities = latest
            .iter()
            .enumerate()
            .map(|(i, ((name, market), rec))| Commodity {
                id: i as i64 + 1,
                name: name.clone(),
                price: rec.price,
                unit: rec.unit.clone().unwrap_or_default(),
                image: rec.image.clone(),
                market: if market.is_empty() {
                    None
                } else {
                    Some(market.clone())
                },
            })
            .collect();

        let mut markets: Vec<String> = Vec::new();
        for rec in &history {
            let m = rec.market.trim();
            if !m.is_empty() && !markets.iter().any(|x| x == m) {
                markets.push(m.to_string());
            }
        }
        markets.sort();
        let mut categories = vec![Category::all_markets()];
        categories.extend(markets.into_iter().enumerate().map(|(i, name)| Category {
            id: i as i64 + 1,
            name,
        }));

        Self {
            commodities,
            categories,
            history,
        }
    }

    /// Sample commodities shown when the price API cannot be reached.
    pub fn fallback() -> Self {
        let sample = [
            (1, "Beras Medium", 13500, "kg"),
            (2, "Cabe Merah Keriting", 42000, "kg"),
            (3, "Bawang Merah", 38000, "kg"),
            (4, "Bawang Putih", 36000, "kg"),
            (5, "Gula Pasir", 17500, "kg"),
            (6, "Minyak Goreng Curah", 16000, "liter"),
        ];
        let commodities = sample
            .into_iter()
            .map(|(id, name, price, unit)| Commodity {
                id,
                name: name.to_string(),
                price: Decimal::from(price),
                unit: unit.to_string(),
                image: None,
                market: None,
            })
            .collect();
        Self {
            commodities,
            categories: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Market categories without the synthetic "All markets" entry.
    pub fn markets(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|c| !c.is_all())
    }

    pub fn is_fallback(&self) -> bool {
        self.history.is_empty() && self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, price: i64, name: &str, market: &str) -> PriceRecord {
        PriceRecord::new(date, Decimal::from(price), name, market)
    }

    #[test]
    fn keeps_latest_price_per_pair() {
        let ds = Dataset::from_records(vec![
            rec("2025-03-02", 41000, "Cabe Merah", "Pasar Manis"),
            rec("2025-03-01", 40000, "Cabe Merah", "Pasar Manis"),
            rec("2025-03-01", 39000, "Cabe Merah", "Pasar Subuh"),
            rec("2025-03-01", 13000, "Beras", "Pasar Manis"),
        ]);
        assert_eq!(ds.commodities.len(), 3);
        assert_eq!(ds.commodities[0].name, "Beras");
        let manis = ds
            .commodities
            .iter()
            .find(|c| c.name == "Cabe Merah" && c.market.as_deref() == Some("Pasar Manis"))
            .unwrap();
        assert_eq!(manis.price, Decimal::from(41000));
        assert_eq!(
            ds.commodities.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn same_date_prefers_later_record() {
        let ds = Dataset::from_records(vec![
            rec("2025-03-01", 100, "Gula", "Pasar Manis"),
            rec("2025-03-01", 120, "Gula", "Pasar Manis"),
        ]);
        assert_eq!(ds.commodities[0].price, Decimal::from(120));
        assert_eq!(ds.history.len(), 2);
    }

    #[test]
    fn categories_are_distinct_markets_after_all() {
        let ds = Dataset::from_records(vec![
            rec("2025-03-01", 1, "A", "Pasar Subuh"),
            rec("2025-03-01", 1, "B", "Pasar Manis"),
            rec("2025-03-02", 1, "A", "Pasar Subuh"),
        ]);
        let names: Vec<_> = ds.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["All markets", "Pasar Manis", "Pasar Subuh"]);
        for c in &ds.commodities {
            let m = c.market.as_deref().unwrap();
            assert!(ds.markets().any(|cat| cat.name == m));
        }
    }

    #[test]
    fn fallback_has_six_commodities_and_nothing_else() {
        let ds = Dataset::fallback();
        assert_eq!(ds.commodities.len(), 6);
        assert!(ds.categories.is_empty());
        assert!(ds.history.is_empty());
        assert!(ds.is_fallback());
    }
}
