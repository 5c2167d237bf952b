//! Runtime configuration for the billing client.
//!
//! All defaults are static; the CLI overrides profile, region, and endpoint
//! from flags or environment variables once at startup.

use crate::query::{Granularity, Metric};

/// Default AWS region. Cost Explorer is served from `us-east-1`.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Home region of Cost Explorer in the China partition.
pub const CHINA_SIGNING_REGION: &str = "cn-northwest-1";

/// Date format expected by Cost Explorer.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Metrics requested when a query does not name its own.
pub const DEFAULT_METRICS: [Metric; 3] = [
    Metric::BlendedCost,
    Metric::UnblendedCost,
    Metric::UsageQuantity,
];

/// Granularity used by the generic query when none is supplied.
pub const DEFAULT_GRANULARITY: Granularity = Granularity::Daily;

/// Configuration shared by the query builder and the Cost Explorer client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingConfig {
    /// Named profile from the shared credentials or config file.
    pub profile: Option<String>,
    /// AWS region; selects the partition whose endpoint is used.
    pub region: String,
    /// Endpoint override (emulators, tests).
    pub endpoint_url: Option<String>,
    /// `strftime` format for dates sent to the API.
    pub date_format: String,
    /// Metrics used when a query does not specify any.
    pub default_metrics: Vec<Metric>,
    /// Granularity used when a query does not specify one.
    pub default_granularity: Granularity,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            profile: None,
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            date_format: DATE_FORMAT.to_string(),
            default_metrics: DEFAULT_METRICS.to_vec(),
            default_granularity: DEFAULT_GRANULARITY,
        }
    }
}

impl BillingConfig {
    /// Create a configuration with the static defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a named credentials profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the AWS region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Send requests to a custom endpoint instead of the partition's global one.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    fn is_china(&self) -> bool {
        self.region.starts_with("cn-")
    }

    /// Region requests are signed for.
    ///
    /// Cost Explorer has one endpoint per partition, so this is the
    /// partition's home region whatever `region` is set to.
    #[must_use]
    pub fn signing_region(&self) -> &'static str {
        if self.is_china() {
            CHINA_SIGNING_REGION
        } else {
            DEFAULT_REGION
        }
    }

    /// Cost Explorer endpoint for this configuration.
    #[must_use]
    pub fn endpoint(&self) -> String {
        match &self.endpoint_url {
            Some(url) => url.clone(),
            None if self.is_china() => format!("https://ce.{CHINA_SIGNING_REGION}.amazonaws.com.cn"),
            None => format!("https://ce.{DEFAULT_REGION}.amazonaws.com"),
        }
    }
}
