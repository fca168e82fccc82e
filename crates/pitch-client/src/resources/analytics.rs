//! Dashboard analytics

use pitch_core::entities::{AnalyticsSummary, MonthlyCount};

use crate::{ApiClient, ClientError};

impl ApiClient {
    /// Headline counters for the dashboard landing page.
    pub async fn analytics_summary(&self) -> Result<AnalyticsSummary, ClientError> {
        self.get_json("/analytics/summary").await
    }

    /// Match counts bucketed by month (`YYYY-MM`).
    pub async fn matches_per_month(&self) -> Result<Vec<MonthlyCount>, ClientError> {
        self.get_json("/analytics/matches-per-month").await
    }
}
