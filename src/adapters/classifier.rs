use crate::core::category::normalize_to_canonical_category;
use crate::domain::model::ClassificationResult;
use crate::domain::ports::Classifier;
use crate::utils::error::{MatchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

pub const DEFAULT_CONFIDENCE: f64 = 0.6;

/// Client of the website classification service (`GET <endpoint>?url=...`).
pub struct HttpClassifier {
    client: Client,
    endpoint: String,
    default_confidence: f64,
}

impl HttpClassifier {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            default_confidence: DEFAULT_CONFIDENCE,
        }
    }

    pub fn with_default_confidence(mut self, confidence: f64) -> Self {
        self.default_confidence = confidence;
        self
    }

    /// Reads `category` and optional `confidence` out of the service's JSON body.
    pub fn parse_body(&self, body: &Value) -> Result<ClassificationResult> {
        let category = body["category"]
            .as_str()
            .and_then(normalize_to_canonical_category)
            .ok_or_else(|| MatchError::classification("Classifier returned an unknown category"))?;
        let confidence = body["confidence"]
            .as_f64()
            .unwrap_or(self.default_confidence);

        Ok(ClassificationResult {
            category,
            confidence,
        })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, website: &Url) -> Result<ClassificationResult> {
        tracing::debug!("Classifying {} via {}", website, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", website.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| MatchError::classification(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() {
                format!("Classifier failed ({})", status.as_u16())
            } else {
                text
            };
            return Err(MatchError::classification(message));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| MatchError::classification(format!("Invalid classifier response: {}", e)))?;

        let result = self.parse_body(&body)?;
        tracing::info!(
            "Classified {} as {} (confidence {:.2})",
            website,
            result.category,
            result.confidence
        );
        Ok(result)
    }
}
