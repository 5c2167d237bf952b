//! Cost Explorer trait and provider errors.

use async_trait::async_trait;
use thiserror::Error;

use crate::query::{CostQueryParams, ForecastParams};

/// Errors that can occur while talking to the cost API.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} {code} - {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Missing, invalid, or expired credentials.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Request was throttled.
    #[error("Rate limit exceeded: {0}")]
    Throttled(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Response body was not valid JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request could not be signed.
    #[error("Signing error: {0}")]
    Signing(String),
}

/// The two Cost Explorer operations this crate uses.
///
/// Responses are returned as raw JSON so callers can echo them unchanged.
#[async_trait]
pub trait CostExplorer: Send + Sync {
    /// Provider name (e.g., "aws").
    fn name(&self) -> &'static str;

    /// Run a `GetCostAndUsage` request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    async fn get_cost_and_usage(
        &self,
        params: &CostQueryParams,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Run a `GetCostForecast` request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    async fn get_cost_forecast(
        &self,
        params: &ForecastParams,
    ) -> Result<serde_json::Value, ProviderError>;
}
