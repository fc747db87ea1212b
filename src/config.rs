// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::SparklineMode;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("id.go.ciamiskab", "Pangan", "pangan"));

pub const DEFAULT_BASE_URL: &str = "https://situ.ciamiskab.go.id";
pub const DEFAULT_PAGE_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub page_size: usize,
    pub timeout_secs: u64,
    pub sparkline: SparklineMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 30,
            sparkline: SparklineMode::Average,
        }
    }
}

impl Settings {
    /// Settings from the platform config file, or defaults when it is absent.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Read config at {}", path.display()))?;
        let mut s: Settings = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config at {}", path.display()))?;
        s.base_url = s.base_url.trim_end_matches('/').to_string();
        if s.page_size == 0 {
            s.page_size = DEFAULT_PAGE_SIZE;
        }
        Ok(s)
    }

    /// Apply the global CLI overrides.
    pub fn merge_cli(mut self, m: &clap::ArgMatches) -> Self {
        if let Some(url) = m.get_one::<String>("base-url") {
            self.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(size) = m.get_one::<usize>("page-size") {
            self.page_size = (*size).max(1);
        }
        self
    }
}

pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP.0, APP.1, APP.2).map(|p| p.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_config_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"base_url": "http://localhost:9000/", "page_size": 0}}"#).unwrap();
        file.flush().unwrap();

        let s = Settings::from_file(file.path()).unwrap();
        assert_eq!(s.base_url, "http://localhost:9000");
        assert_eq!(s.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(s.timeout_secs, 30);
        assert_eq!(s.sparkline, SparklineMode::Average);
    }

    #[test]
    fn cli_overrides_win() {
        let m = crate::cli::build_cli()
            .get_matches_from(["pangan", "--base-url", " http://x/ ", "--page-size", "4", "markets"]);
        let s = Settings::default().merge_cli(&m);
        assert_eq!(s.base_url, "http://x");
        assert_eq!(s.page_size, 4);
    }
}
