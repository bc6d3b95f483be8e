//! Dashboard endpoints

use serde_json::{Map, Value};

use crate::client::ApiClient;
use crate::envelope::Fetched;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEndpoint {
    Stats,
    Subjects,
    ChartData,
    Heatmap,
    AiSuggestions,
    Export,
}

impl DashboardEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            DashboardEndpoint::Stats => "/api/dashboard/stats",
            DashboardEndpoint::Subjects => "/api/dashboard/subjects",
            DashboardEndpoint::ChartData => "/api/dashboard/chart-data",
            DashboardEndpoint::Heatmap => "/api/dashboard/heatmap",
            DashboardEndpoint::AiSuggestions => "/api/dashboard/ai-suggestions",
            DashboardEndpoint::Export => "/api/dashboard/export",
        }
    }
}

impl ApiClient {
    /// GET a dashboard endpoint and return its payload
    pub async fn dashboard(
        &self,
        endpoint: DashboardEndpoint,
        query: &[(&str, &str)],
    ) -> Result<Fetched<Map<String, Value>>> {
        let envelope = self.get(endpoint.path(), query).await?;
        let fetched = envelope.into_payload();
        if let Fetched::Placeholder { reason } = &fetched {
            tracing::debug!(endpoint = endpoint.path(), %reason, "Dashboard data unavailable");
        }
        Ok(fetched)
    }

    pub async fn dashboard_stats(&self) -> Result<Fetched<Map<String, Value>>> {
        self.dashboard(DashboardEndpoint::Stats, &[]).await
    }

    pub async fn dashboard_subjects(&self) -> Result<Fetched<Value>> {
        let envelope = self.get(DashboardEndpoint::Subjects.path(), &[]).await?;
        Ok(envelope.field("subjects"))
    }

    /// Chart series for the last `days` days, optionally for one subject
    pub async fn chart_data(&self, days: u32, subject: Option<&str>) -> Result<Fetched<Value>> {
        let days = days.to_string();
        let mut query = vec![("days", days.as_str())];
        if let Some(subject) = subject {
            query.push(("subject", subject));
        }

        let envelope = self.get(DashboardEndpoint::ChartData.path(), &query).await?;
        Ok(envelope.field("data"))
    }

    pub async fn heatmap(&self) -> Result<Fetched<Value>> {
        let envelope = self.get(DashboardEndpoint::Heatmap.path(), &[]).await?;
        Ok(envelope.field("data"))
    }

    pub async fn ai_suggestions(&self) -> Result<Fetched<Value>> {
        let envelope = self
            .post(DashboardEndpoint::AiSuggestions.path(), &serde_json::json!({}))
            .await?;
        Ok(envelope.field("suggestions"))
    }

    pub async fn export_report(&self, format: &str) -> Result<Fetched<Map<String, Value>>> {
        self.dashboard(DashboardEndpoint::Export, &[("format", format)])
            .await
    }
}
