// Gemini analyzer implementation
use crate::application::sales_analyzer::SalesAnalyzer;
use crate::domain::dashboard::DashboardData;
use crate::domain::error::{AnalysisError, CredentialError};
use crate::infrastructure::config::GeminiSettings;
use crate::infrastructure::response_schema::{parse_dashboard, response_schema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiAnalyzer {
    /// Fails when no API key is configured; callers treat this as fatal.
    pub fn new(settings: &GeminiSettings) -> Result<Self, CredentialError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(CredentialError::MissingApiKey)?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: settings.model.clone(),
        })
    }

    fn build_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(&self, raw_text: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(raw_text) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
                "thinkingConfig": { "thinkingBudget": 0 }
            }
        })
    }

    async fn generate(&self, raw_text: &str) -> Result<String, AnalysisError> {
        let response = self
            .client
            .post(self.build_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_request(raw_text))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Model { status, body });
        }

        let reply = response.json::<GenerateContentResponse>().await?;
        reply_text(reply).ok_or(AnalysisError::EmptyReply)
    }
}

#[async_trait]
impl SalesAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, raw_text: &str) -> Result<DashboardData, AnalysisError> {
        tracing::debug!(model = %self.model, bytes = raw_text.len(), "requesting analysis");
        let text = self.generate(raw_text).await?;
        parse_dashboard(&text)
    }
}

/// Instruction sent to the model with the uploaded text embedded verbatim.
pub fn build_prompt(raw_text: &str) -> String {
    format!(
        r#"Analyze the provided supermarket sales data (e.g., CSV, JSON).
Extract and calculate the following metrics:
1.  **Customer Segmentation**: Count of 'premium' (top 10% spenders), 'regular' (next 40%), and 'normal' (bottom 50%) customers.
2.  **Daily Sales**: Summarize sales and purchases for the last 7 distinct days found in the data.
3.  **Top 5 Selling Categories**: By total sales value.
4.  **Top 5 Customers**: List the top 5 customers by total spending, including their purchase frequency and their segment ('premium', 'regular', or 'normal').

Data:
---
{}
---

Respond strictly in the provided JSON format. If the data is insufficient, return empty or zero values for the metrics."#,
        raw_text
    )
}

fn reply_text(reply: GenerateContentResponse) -> Option<String> {
    let text: String = reply
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
