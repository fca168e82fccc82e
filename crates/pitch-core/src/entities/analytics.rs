use serde::{Deserialize, Serialize};

/// Headline numbers for the dashboard landing page (`/analytics/summary`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_matches: u64,
    #[serde(default)]
    pub upcoming_matches: u64,
    #[serde(default)]
    pub finished_matches: u64,
    pub total_events: u64,
    #[serde(default)]
    pub upcoming_events: u64,
}

/// One bar of the matches-per-month chart (`/analytics/matches-per-month`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// `YYYY-MM`.
    pub month: String,
    pub count: u64,
}
