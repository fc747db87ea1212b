// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::dataset::Dataset;
use crate::error::{FetchError, FetchResult};
use crate::models::{Commodity, ListingEntry, PriceRecord};
use crate::utils::http_client;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

pub const LISTING_PATH: &str = "/get-all-komoditi";
pub const DETAIL_PATH: &str = "/api/get-komoditi-by-id";
pub const HISTORY_PATH: &str = "/api/perkembangan-harga-sebulan";

/// Result of one load cycle. `warnings` holds one message per failed fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub warnings: Vec<String>,
}

impl LoadOutcome {
    pub fn offline() -> Self {
        Self {
            dataset: Dataset::fallback(),
            warnings: Vec::new(),
        }
    }
}

pub struct Loader {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl Loader {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            client: http_client(settings.timeout_secs)?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> FetchResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let resp = self.client.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }
        let body = resp.text()?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode { url, source })
    }

    pub fn fetch_listing(&self) -> FetchResult<Vec<ListingEntry>> {
        self.get_json(LISTING_PATH)
    }

    pub fn fetch_commodity_by_id(&self, id: i64) -> FetchResult<Commodity> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Detail {
            One(Commodity),
            Many(Vec<Commodity>),
        }

        let path = format!("{}/{}", DETAIL_PATH, id);
        match self.get_json::<Detail>(&path)? {
            Detail::One(c) => Ok(c),
            Detail::Many(list) => list.into_iter().next().ok_or_else(|| FetchError::Decode {
                url: format!("{}{}", self.base_url, path),
                source: <serde_json::Error as serde::de::Error>::custom("empty commodity list"),
            }),
        }
    }

    /// Listing followed by one detail request per entry. Entries whose
    /// detail request fails are left out.
    pub fn fetch_all_commodities(&self) -> FetchResult<Vec<Commodity>> {
        let listing = self.fetch_listing()?;
        let mut out = Vec::with_capacity(listing.len());
        for entry in listing {
            match self.fetch_commodity_by_id(entry.id) {
                Ok(c) => out.push(c),
                Err(e) => warn!(id = entry.id, name = %entry.name, error = %e, "dropping commodity"),
            }
        }
        Ok(out)
    }

    pub fn fetch_price_history(&self) -> FetchResult<Vec<PriceRecord>> {
        self.get_json(HISTORY_PATH)
    }

    /// Fetch the price history once and normalize it. Never fails: on error
    /// the sample dataset is returned together with a warning.
    pub fn load(&self) -> LoadOutcome {
        match self.fetch_price_history() {
            Ok(records) => {
                info!(records = records.len(), "price history loaded");
                LoadOutcome {
                    dataset: Dataset::from_records(records),
                    warnings: Vec::new(),
                }
            }
            Err(e) => {
                // The user sees this through the returned warning.
                info!(error = %e, "price history unavailable, using sample data");
                LoadOutcome {
                    dataset: Dataset::fallback(),
                    warnings: vec![format!(
                        "Failed to fetch price history ({}). Showing sample data.",
                        e
                    )],
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_loader() -> Loader {
        let settings = Settings {
            base_url: "http://127.0.0.1:1".into(),
            timeout_secs: 2,
            ..Settings::default()
        };
        Loader::new(&settings).unwrap()
    }

    #[test]
    fn load_falls_back_with_one_warning() {
        let outcome = unreachable_loader().load();
        assert_eq!(outcome.dataset, Dataset::fallback());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn transport_failure_is_http_error() {
        let err = unreachable_loader().fetch_listing().unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }

    #[test]
    fn history_accepts_numeric_and_string_prices() {
        let body = r#"[
            {"id": 1, "komoditi_id": 3, "komoditi": "Beras Medium", "gambar": "/img/beras.png",
             "tanggal": "2025-06-01", "harga": 13500, "harga_sebelumnya": 13400,
             "satuan": "kg", "pasar": "Pasar Manis"},
            {"komoditi": "Beras Medium", "tanggal": "2025-06-02", "harga": "13600.5", "pasar": "Pasar Manis"}
        ]"#;
        let records: Vec<PriceRecord> = serde_json::from_str(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].unit.as_deref(), Some("kg"));
        assert_eq!(records[1].price.to_string(), "13600.5");
        assert!(records[1].previous_price.is_none());
    }
}
