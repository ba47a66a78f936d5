use crate::config::ChartingSettings;
use crate::core::Figure;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when rendering a chart
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("charting credentials are not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Charting API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct PlotResponse {
    #[serde(default)]
    url: String,
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

/// Client for the hosted charting service
///
/// Posts a figure and returns the URL where the rendered chart lives.
pub struct ChartClient {
    endpoint: String,
    username: Option<String>,
    api_key: Option<String>,
    client: Client,
}

impl ChartClient {
    pub fn new(settings: &ChartingSettings) -> Result<Self, ChartError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            endpoint: settings.endpoint.clone(),
            username: settings.username.clone(),
            api_key: settings.api_key.clone(),
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.username.is_some() && self.api_key.is_some()
    }

    /// Render `figure` under `filename`, overwriting any earlier version
    pub async fn plot(&self, filename: &str, figure: &Figure) -> Result<String, ChartError> {
        let (username, api_key) = match (&self.username, &self.api_key) {
            (Some(u), Some(k)) => (u, k),
            _ => return Err(ChartError::NotConfigured),
        };

        let args = serde_json::to_string(&figure.data)
            .map_err(|e| ChartError::InvalidResponse(e.to_string()))?;
        let kwargs = json!({
            "filename": filename,
            "fileopt": "overwrite",
            "world_readable": true,
            "layout": figure.layout,
        })
        .to_string();

        let form = [
            ("un", username.as_str()),
            ("key", api_key.as_str()),
            ("origin", "plot"),
            ("platform", "rust"),
            ("args", args.as_str()),
            ("kwargs", kwargs.as_str()),
        ];

        tracing::debug!("Posting figure {} to {}", filename, self.endpoint);

        let response = self.client.post(&self.endpoint).form(&form).send().await?;

        if !response.status().is_success() {
            return Err(ChartError::ApiError(format!(
                "Failed to plot figure: {}",
                response.status()
            )));
        }

        let body: PlotResponse = response
            .json()
            .await
            .map_err(|e| ChartError::InvalidResponse(e.to_string()))?;

        if !body.error.is_empty() {
            return Err(ChartError::ApiError(body.error));
        }
        if body.url.is_empty() {
            return Err(ChartError::InvalidResponse(if body.message.is_empty() {
                "response carried no url".to_string()
            } else {
                body.message
            }));
        }

        tracing::info!("Rendered chart {} at {}", filename, body.url);
        Ok(body.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::charts::Layout;

    fn empty_figure() -> Figure {
        Figure {
            data: vec![],
            layout: Layout {
                title: "t".to_string(),
                barmode: None,
            },
        }
    }

    #[tokio::test]
    async fn test_unconfigured_client_refuses() {
        let client = ChartClient::new(&ChartingSettings::default()).unwrap();
        assert!(!client.is_configured());

        let result = client.plot("chart", &empty_figure()).await;
        assert!(matches!(result, Err(ChartError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_plot_returns_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/clientresp")
            .match_body(mockito::Matcher::UrlEncoded("un".into(), "tester".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"url": "https://plot.test/~tester/1", "error": "", "message": ""}"#)
            .create_async()
            .await;

        let client = ChartClient::new(&ChartingSettings {
            endpoint: format!("{}/clientresp", server.url()),
            username: Some("tester".to_string()),
            api_key: Some("key".to_string()),
        })
        .unwrap();

        let url = client.plot("chart", &empty_figure()).await.unwrap();
        assert_eq!(url, "https://plot.test/~tester/1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_plot_surfaces_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/clientresp")
            .with_status(200)
            .with_body(r#"{"url": "", "error": "bad key", "message": ""}"#)
            .create_async()
            .await;

        let client = ChartClient::new(&ChartingSettings {
            endpoint: format!("{}/clientresp", server.url()),
            username: Some("tester".to_string()),
            api_key: Some("wrong".to_string()),
        })
        .unwrap();

        let result = client.plot("chart", &empty_figure()).await;
        assert!(matches!(result, Err(ChartError::ApiError(msg)) if msg == "bad key"));
    }
}
