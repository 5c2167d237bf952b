//! AWS Cost Explorer API client.

use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::credentials;
use super::models::{short_error_code, AwsErrorBody};
use super::sigv4::sign_post;
use crate::config::BillingConfig;
use crate::providers::{CostExplorer, ProviderError};
use crate::query::{CostQueryParams, ForecastParams};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Signing name of the service.
const SERVICE: &str = "ce";

/// `X-Amz-Target` prefix for Cost Explorer operations.
const TARGET_PREFIX: &str = "AWSInsightsIndexService";

const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Error codes that mean the caller is sending too fast.
const THROTTLING_CODES: &[&str] = &[
    "ThrottlingException",
    "LimitExceededException",
    "TooManyRequestsException",
];

/// Error codes that mean the credentials were rejected.
const AUTH_CODES: &[&str] = &[
    "UnrecognizedClientException",
    "AccessDeniedException",
    "ExpiredTokenException",
    "InvalidSignatureException",
    "IncompleteSignature",
    "MissingAuthenticationToken",
    "InvalidClientTokenId",
];

/// AWS Cost Explorer client.
#[derive(Debug, Clone)]
pub struct CostExplorerClient {
    client: Client,
    endpoint: String,
    signing_region: &'static str,
    credentials: SharedCredentialsProvider,
}

impl CostExplorerClient {
    /// Create a client with an explicit credentials provider.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        config: &BillingConfig,
        credentials: impl ProvideCredentials + 'static,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("aws-billing/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ProviderError::Http)?;

        let endpoint = format!("{}/", config.endpoint().trim_end_matches('/'));
        let signing_region = config.signing_region();
        debug!(
            endpoint = %endpoint,
            region = %config.region,
            signing_region,
            "Initialized Cost Explorer client"
        );

        Ok(Self {
            client,
            endpoint,
            signing_region,
            credentials: SharedCredentialsProvider::new(credentials),
        })
    }

    /// Create a client backed by the standard AWS credentials chain, or the
    /// configured profile.
    ///
    /// # Errors
    ///
    /// Returns error if no credentials provider is available or the HTTP
    /// client cannot be created.
    pub async fn from_config(config: &BillingConfig) -> Result<Self, ProviderError> {
        let provider = credentials::load_provider(config).await?;
        Self::new(config, provider)
    }

    /// Sign and send one JSON 1.1 operation.
    async fn call<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        body: &B,
    ) -> Result<serde_json::Value, ProviderError> {
        let target = format!("{TARGET_PREFIX}.{operation}");
        let payload = serde_json::to_vec(body)?;

        debug!(url = %self.endpoint, target = %target, "Cost Explorer request");

        let credentials = credentials::resolve(&self.credentials).await?;
        let headers = sign_post(
            credentials,
            self.signing_region,
            SERVICE,
            &self.endpoint,
            &[("content-type", CONTENT_TYPE), ("x-amz-target", &target)],
            &payload,
            SystemTime::now(),
        )?;

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-target", &target)
            .body(payload);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle API response.
    async fn handle_response(
        response: reqwest::Response,
    ) -> Result<serde_json::Value, ProviderError> {
        let status = response.status();
        let header_code = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(|v| short_error_code(v).to_string());
        let text = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| {
                warn!(error = %e, body = %text, "Failed to parse response");
                ProviderError::Serialization(e)
            });
        }

        let body: AwsErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let code = body
            .code()
            .map(ToString::to_string)
            .or(header_code)
            .unwrap_or_default();
        let message = body.message.clone().unwrap_or(text);

        Err(Self::classify_error(status, code, message))
    }

    /// Map an error response onto [`ProviderError`].
    fn classify_error(status: StatusCode, code: String, message: String) -> ProviderError {
        if status == StatusCode::TOO_MANY_REQUESTS || THROTTLING_CODES.contains(&code.as_str()) {
            ProviderError::Throttled(message)
        } else if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || AUTH_CODES.contains(&code.as_str())
        {
            ProviderError::Auth(if code.is_empty() {
                message
            } else {
                format!("{code}: {message}")
            })
        } else {
            ProviderError::Api {
                status: status.as_u16(),
                code,
                message,
            }
        }
    }
}

#[async_trait]
impl CostExplorer for CostExplorerClient {
    fn name(&self) -> &'static str {
        "aws"
    }

    #[instrument(skip_all, fields(provider = "aws", operation = "GetCostAndUsage"))]
    async fn get_cost_and_usage(
        &self,
        params: &CostQueryParams,
    ) -> Result<serde_json::Value, ProviderError> {
        self.call("GetCostAndUsage", params).await
    }

    #[instrument(skip_all, fields(provider = "aws", operation = "GetCostForecast"))]
    async fn get_cost_forecast(
        &self,
        params: &ForecastParams,
    ) -> Result<serde_json::Value, ProviderError> {
        self.call("GetCostForecast", params).await
    }
}
