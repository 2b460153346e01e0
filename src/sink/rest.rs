use super::{ResultRow, ResultsSink, SaveOutcome, SinkError};
use crate::assessment::AssessmentResult;
use crate::settings::Rest;
use std::time::Duration;

/// Inserts results into a PostgREST-style table endpoint (`/rest/v1/<table>`).
pub struct RestSink {
    client: reqwest::Client,
    endpoint: String,
    anon_key: String,
}

impl RestSink {
    pub fn new(config: &Rest) -> Result<Self, SinkError> {
        if !config.is_configured() {
            return Err(SinkError::NotConfigured);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            endpoint: table_endpoint(&config.url, &config.table),
            anon_key: config.anon_key.trim().to_string(),
        })
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept", "application/json")
    }

    async fn try_probe(&self) -> Result<(), SinkError> {
        let url = format!("{}?select=id&limit=1", self.endpoint);
        let response = self.request(reqwest::Method::GET, &url).send().await?;
        check_status(response).await
    }

    async fn try_persist(&self, result: &AssessmentResult) -> Result<(), SinkError> {
        let row = ResultRow::from(result);
        let response = self
            .request(reqwest::Method::POST, &self.endpoint)
            .header("Prefer", "return=minimal")
            .json(&[row])
            .send()
            .await?;
        check_status(response).await
    }
}

impl ResultsSink for RestSink {
    async fn probe_connectivity(&self) -> bool {
        match self.try_probe().await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, endpoint = %self.endpoint, "probe failed");
                false
            }
        }
    }

    async fn persist(&self, result: &AssessmentResult) -> SaveOutcome {
        self.try_persist(result).await.into()
    }
}

async fn check_status(response: reqwest::Response) -> Result<(), SinkError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(SinkError::Status {
        status: status.as_u16(),
        body,
    })
}

fn table_endpoint(url: &str, table: &str) -> String {
    format!(
        "{}/rest/v1/{}",
        url.trim().trim_end_matches('/'),
        urlencoding::encode(table.trim())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::AnswerSet;
    use crate::inventory::Inventory;
    use chrono::Utc;

    fn config(url: &str) -> Rest {
        Rest {
            url: url.to_string(),
            anon_key: "anon-key".to_string(),
            table: "hamilton_results".to_string(),
            timeout_secs: 2,
        }
    }

    #[test]
    fn test_table_endpoint() {
        assert_eq!(
            table_endpoint("https://abc.supabase.co/", "hamilton_results"),
            "https://abc.supabase.co/rest/v1/hamilton_results"
        );
        assert_eq!(
            table_endpoint(" https://abc.supabase.co ", "my results"),
            "https://abc.supabase.co/rest/v1/my%20results"
        );
    }

    #[test]
    fn test_requires_url_and_key() {
        let mut missing_key = config("https://abc.supabase.co");
        missing_key.anon_key = "  ".into();
        assert!(matches!(
            RestSink::new(&missing_key),
            Err(SinkError::NotConfigured)
        ));
        assert!(RestSink::new(&config("https://abc.supabase.co")).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_store_fails_softly() {
        let sink = RestSink::new(&config("http://127.0.0.1:9")).unwrap();
        assert!(!sink.probe_connectivity().await);

        let inventory = Inventory::hamilton();
        let answers: AnswerSet = inventory.questions().iter().map(|q| (q.id, 3)).collect();
        let result = AssessmentResult::new("Eva", answers, &inventory, Utc::now());

        match sink.persist(&result).await {
            SaveOutcome::Failed { reason } => assert!(reason.starts_with("request failed")),
            SaveOutcome::Saved => panic!("unreachable store reported a save"),
        }
    }
}
