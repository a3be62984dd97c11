//! Report domain types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregated table report of a finished test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableReport {
    pub status: ReportStatus,
    pub overall: Overall,

    /// Per-case breakdown keyed by case tag
    pub cases: BTreeMap<String, Overall>,
}

impl TableReport {
    /// Number of responses that carried the given HTTP status code
    pub fn http_code_count(&self, code: i64) -> i64 {
        self.overall.http_codes.get(&code).copied().unwrap_or(0)
    }

    /// Whether the given HTTP status code was observed at all
    pub fn saw_http_code(&self, code: i64) -> bool {
        self.overall.http_codes.contains_key(&code)
    }
}

/// Totals over all requests of a test (or of one case)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Overall {
    #[serde(with = "crate::int64")]
    pub request_count: i64,

    /// Network-level result codes and their counts
    #[serde(with = "crate::int64::map")]
    pub net_codes: BTreeMap<i64, i64>,

    /// HTTP status codes and their counts
    #[serde(with = "crate::int64::map")]
    pub http_codes: BTreeMap<i64, i64>,

    pub quantiles: Quantiles,
}

/// Response time quantiles, in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quantiles {
    pub q50: f64,
    pub q75: f64,
    pub q80: f64,
    pub q85: f64,
    pub q90: f64,
    pub q95: f64,
    pub q98: f64,
    pub q99: f64,
    pub q100: f64,
}

/// Report readiness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    #[default]
    StatusUnspecified,
    Collecting,
    Ready,
    #[serde(other)]
    Unknown,
}
