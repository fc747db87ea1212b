// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::DEFAULT_PAGE_SIZE;
use crate::dataset::Dataset;
use crate::engine::{classify_trend, filter_commodities, paginate, sparkline, Page, SparklineMode};
use crate::loader::LoadOutcome;
use crate::models::{Commodity, Filters, MarketFilter, TrendFilter, TrendResult};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

/// Tag handed out by [`AppState::begin_fetch`]; results carrying an older tag
/// are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestSeq(pub u64);

#[derive(Debug, Clone)]
pub enum Action {
    Loaded { seq: RequestSeq, outcome: LoadOutcome },
    SetSearch(String),
    SetMarket(MarketFilter),
    SetTrend(TrendFilter),
    SetPage(usize),
    NextPage,
    PrevPage,
}

/// Everything the dashboard shows, owned in one place and changed only
/// through [`AppState::apply`].
#[derive(Debug, Clone)]
pub struct AppState {
    pub dataset: Dataset,
    pub filters: Filters,
    pub page: usize,
    pub page_size: usize,
    pub sparkline: SparklineMode,
    pub loading: bool,
    notices: Vec<String>,
    latest_seq: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, SparklineMode::Average)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub commodity: Commodity,
    pub trend: TrendResult,
    pub sparkline: Vec<Decimal>,
}

impl AppState {
    pub fn new(page_size: usize, sparkline: SparklineMode) -> Self {
        Self {
            dataset: Dataset::default(),
            filters: Filters::default(),
            page: 1,
            page_size: page_size.max(1),
            sparkline,
            loading: false,
            notices: Vec::new(),
            latest_seq: 0,
        }
    }

    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.dataset = dataset;
        self
    }

    pub fn begin_fetch(&mut self) -> RequestSeq {
        self.latest_seq += 1;
        self.loading = true;
        RequestSeq(self.latest_seq)
    }

    /// Apply one action. Returns `false` when the action was ignored, which
    /// only happens for stale fetch results.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Loaded { seq, outcome } => {
                if seq.0 != self.latest_seq {
                    warn!(seq = seq.0, latest = self.latest_seq, "discarding stale fetch result");
                    return false;
                }
                self.loading = false;
                self.dataset = outcome.dataset;
                self.notices.extend(outcome.warnings);
                self.page = 1;
            }
            Action::SetSearch(s) => {
                self.filters.search = s.trim().to_string();
                self.page = 1;
            }
            Action::SetMarket(m) => {
                self.filters.market = m;
                self.page = 1;
            }
            Action::SetTrend(t) => self.filters.trend = t,
            Action::SetPage(p) => self.page = p.max(1),
            Action::NextPage => {
                if self.page < self.total_pages() {
                    self.page += 1;
                }
            }
            Action::PrevPage => self.page = self.page.saturating_sub(1).max(1),
        }
        debug!(page = self.page, filters = ?self.filters, "state updated");
        true
    }

    /// Pending warnings, oldest first. Draining them marks them as shown.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    pub fn filtered(&self) -> Vec<&Commodity> {
        filter_commodities(&self.dataset.commodities, &self.dataset.history, &self.filters)
    }

    pub fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size)
    }

    /// The current page of cards, trend and sparkline included.
    pub fn view(&self) -> Page<Card> {
        let filtered = self.filtered();
        let page = paginate(&filtered, self.page, self.page_size);
        let history = &self.dataset.history;
        let items = page
            .items
            .iter()
            .map(|c| Card {
                commodity: (*c).clone(),
                trend: classify_trend(history, &c.name, &self.filters.market),
                sparkline: sparkline(history, &c.name, &self.filters.market, self.sparkline),
            })
            .collect();
        Page {
            items,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
            total_records: page.total_records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceRecord;

    fn outcome(names: &[&str]) -> LoadOutcome {
        let records = names
            .iter()
            .map(|n| PriceRecord::new("2025-05-01", Decimal::from(1000), n, "Pasar Manis"))
            .collect();
        LoadOutcome {
            dataset: Dataset::from_records(records),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn stale_fetch_result_is_discarded() {
        let mut state = AppState::default();
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        assert!(state.apply(Action::Loaded { seq: second, outcome: outcome(&["Beras"]) }));
        assert!(!state.apply(Action::Loaded { seq: first, outcome: outcome(&["Gula", "Garam"]) }));

        assert_eq!(state.dataset.commodities.len(), 1);
        assert_eq!(state.dataset.commodities[0].name, "Beras");
        assert!(!state.loading);
    }

    #[test]
    fn search_and_market_reset_page() {
        let mut state = AppState::new(1, SparklineMode::Average);
        let seq = state.begin_fetch();
        state.apply(Action::Loaded { seq, outcome: outcome(&["A", "B", "C"]) });

        state.apply(Action::SetPage(3));
        assert_eq!(state.page, 3);
        state.apply(Action::SetSearch("  ".into()));
        assert_eq!(state.page, 1);

        state.apply(Action::NextPage);
        state.apply(Action::NextPage);
        state.apply(Action::NextPage);
        assert_eq!(state.page, 3);
        state.apply(Action::SetMarket(MarketFilter::Named("manis".into())));
        assert_eq!(state.page, 1);
        state.apply(Action::PrevPage);
        assert_eq!(state.page, 1);

        state.apply(Action::SetPage(2));
        state.apply(Action::SetTrend(TrendFilter::All));
        assert_eq!(state.page, 2);
    }

    #[test]
    fn warnings_become_notices_once() {
        let mut state = AppState::default();
        let seq = state.begin_fetch();
        state.apply(Action::Loaded {
            seq,
            outcome: LoadOutcome {
                dataset: Dataset::fallback(),
                warnings: vec!["boom".into()],
            },
        });
        assert_eq!(state.take_notices(), vec!["boom".to_string()]);
        assert!(state.take_notices().is_empty());
        assert_eq!(state.view().total_records, 6);
    }
}
