// Analyzer trait for turning uploaded sales text into dashboard data
use crate::domain::dashboard::DashboardData;
use crate::domain::error::AnalysisError;
use async_trait::async_trait;

#[async_trait]
pub trait SalesAnalyzer: Send + Sync {
    /// Analyze raw uploaded file text. One attempt, no retry.
    async fn analyze(&self, raw_text: &str) -> Result<DashboardData, AnalysisError>;
}
