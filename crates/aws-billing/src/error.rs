//! Error types for billing queries.

use thiserror::Error;

use crate::providers::ProviderError;

/// Errors raised while resolving, building, or running a billing query.
#[derive(Error, Debug)]
pub enum BillingError {
    /// A date token is neither a known keyword nor a parseable date.
    #[error("Invalid date format '{0}'")]
    InvalidDateFormat(String),

    /// The query cannot be sent as configured (e.g. tag grouping without a key).
    #[error("Invalid query configuration: {0}")]
    InvalidQueryConfiguration(String),

    /// The Cost Explorer call failed.
    #[error("{query} query failed: {source}")]
    Upstream {
        /// Logical query that failed (e.g. "cost by service").
        query: &'static str,
        #[source]
        source: ProviderError,
    },
}

impl BillingError {
    /// Tag a provider failure with the logical query it belongs to.
    #[must_use]
    pub fn upstream(query: &'static str, source: ProviderError) -> Self {
        Self::Upstream { query, source }
    }
}

/// Result alias for billing operations.
pub type Result<T, E = BillingError> = std::result::Result<T, E>;
