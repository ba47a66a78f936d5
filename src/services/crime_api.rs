use crate::config::CrimeApiSettings;
use crate::core::YearMonth;
use crate::models::{CrimeRecord, OutcomeBatch};
use crate::services::cache::{CacheError, CacheKey, CacheManager};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the police data API
#[derive(Debug, Error)]
pub enum CrimeApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Client for the `outcomes-at-location` endpoint
///
/// Queries a single fixed point. Successful responses are cached by URL
/// for the cache's TTL.
pub struct CrimeApiClient {
    base_url: String,
    latitude: f64,
    longitude: f64,
    client: Client,
    cache: Arc<CacheManager>,
}

impl CrimeApiClient {
    /// Create a new crime API client
    pub fn new(settings: &CrimeApiSettings, cache: Arc<CacheManager>) -> Result<Self, CrimeApiError> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            base_url: settings.base_url.clone(),
            latitude: settings.latitude,
            longitude: settings.longitude,
            client: builder.build()?,
            cache,
        })
    }

    /// Build the request URL for a month
    pub fn outcomes_url(&self, month: &YearMonth) -> String {
        format!(
            "{}/outcomes-at-location?lat={}&lng={}&date={}",
            self.base_url.trim_end_matches('/'),
            self.latitude,
            self.longitude,
            urlencoding::encode(&month.to_string())
        )
    }

    /// Fetch and decode the outcome records for a month
    pub async fn fetch_outcomes(&self, month: &YearMonth) -> Result<OutcomeBatch, CrimeApiError> {
        let url = self.outcomes_url(month);
        let key = CacheKey::request(&url);

        let raw = match self.cache.get::<Vec<Value>>(&key).await {
            Ok(raw) => {
                tracing::debug!("Serving outcomes for {} from cache", month);
                raw
            }
            Err(e) => {
                if !matches!(e, CacheError::CacheMiss(_)) {
                    tracing::warn!("Cache read failed for {}: {}", key, e);
                }

                let raw = self.fetch_raw(&url).await?;
                if let Err(e) = self.cache.set(&key, &raw).await {
                    tracing::warn!("Failed to cache outcomes for {}: {}", month, e);
                }
                raw
            }
        };

        let batch = decode_outcomes(raw);
        if batch.skipped > 0 {
            tracing::warn!(
                "Skipped {} undecodable outcome records for {}",
                batch.skipped,
                month
            );
        }

        tracing::info!("Loaded {} outcome records for {}", batch.records.len(), month);
        Ok(batch)
    }

    async fn fetch_raw(&self, url: &str) -> Result<Vec<Value>, CrimeApiError> {
        tracing::debug!("Fetching outcomes from: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CrimeApiError::NotFound(format!(
                "no outcome data available for {}",
                url
            )));
        }

        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Crime API returned {} - {}", status, body);
            return Err(CrimeApiError::UpstreamStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| CrimeApiError::InvalidResponse(format!("Body is not JSON: {}", e)))?;

        match json {
            Value::Array(items) => Ok(items),
            other => Err(CrimeApiError::InvalidResponse(format!(
                "Expected a JSON array, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Decode each element on its own so one bad record does not fail the batch
pub fn decode_outcomes(raw: Vec<Value>) -> OutcomeBatch {
    let mut batch = OutcomeBatch::default();

    for item in raw {
        match serde_json::from_value::<CrimeRecord>(item) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                tracing::debug!("Dropping undecodable outcome record: {}", e);
                batch.skipped += 1;
            }
        }
    }

    batch
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
