//! Cost Explorer request shapes.
//!
//! These serialize to exactly the JSON the `GetCostAndUsage` and
//! `GetCostForecast` operations accept.

use serde::{Deserialize, Serialize};

use crate::dates::DateRange;
use crate::error::{BillingError, Result};

// ============================================================================
// Enumerations
// ============================================================================

/// Time bucket size for aggregated costs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    /// One bucket per day.
    #[default]
    #[value(name = "DAILY")]
    Daily,
    /// One bucket per calendar month.
    #[value(name = "MONTHLY")]
    Monthly,
    /// One bucket per hour (requires hourly data to be enabled on the account).
    #[value(name = "HOURLY")]
    Hourly,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "DAILY"),
            Self::Monthly => write!(f, "MONTHLY"),
            Self::Hourly => write!(f, "HOURLY"),
        }
    }
}

/// Cost and usage metrics returned per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    BlendedCost,
    UnblendedCost,
    AmortizedCost,
    NetAmortizedCost,
    NetUnblendedCost,
    UsageQuantity,
    NormalizedUsageAmount,
}

impl Metric {
    /// Wire name of the metric.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BlendedCost => "BlendedCost",
            Self::UnblendedCost => "UnblendedCost",
            Self::AmortizedCost => "AmortizedCost",
            Self::NetAmortizedCost => "NetAmortizedCost",
            Self::NetUnblendedCost => "NetUnblendedCost",
            Self::UsageQuantity => "UsageQuantity",
            Self::NormalizedUsageAmount => "NormalizedUsageAmount",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric projected by a cost forecast.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForecastMetric {
    #[default]
    #[value(name = "UNBLENDED_COST")]
    UnblendedCost,
    #[value(name = "BLENDED_COST")]
    BlendedCost,
    #[value(name = "AMORTIZED_COST")]
    AmortizedCost,
    #[value(name = "NET_UNBLENDED_COST")]
    NetUnblendedCost,
    #[value(name = "NET_AMORTIZED_COST")]
    NetAmortizedCost,
}

/// Dimensions used for grouping and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    Service,
    LinkedAccount,
    Region,
    ResourceId,
}

/// Kind of grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupDefinitionType {
    Dimension,
    Tag,
}

// ============================================================================
// Validated inputs
// ============================================================================

/// A cost allocation tag key, without the `tag:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagKey(String);

impl TagKey {
    /// Validate a tag key.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::InvalidQueryConfiguration`] if the key is blank.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(BillingError::InvalidQueryConfiguration(
                "tag-grouped query requires a tag key".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The key as sent to the API.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a single resource, as reported in the `RESOURCE_ID`
/// dimension (e.g. an EC2 instance id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(String);

impl ResourceId {
    /// Validate a resource id.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::InvalidQueryConfiguration`] if the id is blank.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(BillingError::InvalidQueryConfiguration(
                "resource utilization requires a resource id".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Request components
// ============================================================================

/// `TimePeriod` of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateInterval {
    /// Inclusive start date.
    pub start: String,
    /// Exclusive end date.
    pub end: String,
}

impl DateInterval {
    /// Render a resolved range with the given `strftime` format.
    #[must_use]
    pub fn from_range(range: &DateRange, date_format: &str) -> Self {
        Self {
            start: range.start.format(date_format).to_string(),
            end: range.end.format(date_format).to_string(),
        }
    }
}

/// A single `GroupBy` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    #[serde(rename = "Type")]
    pub kind: GroupDefinitionType,
    #[serde(rename = "Key")]
    pub key: String,
}

impl GroupDefinition {
    /// Group by a dimension.
    #[must_use]
    pub fn dimension(dimension: Dimension) -> Self {
        Self {
            kind: GroupDefinitionType::Dimension,
            key: dimension_key(dimension).to_string(),
        }
    }

    /// Group by a cost allocation tag.
    #[must_use]
    pub fn tag(key: &TagKey) -> Self {
        Self {
            kind: GroupDefinitionType::Tag,
            key: key.as_str().to_string(),
        }
    }
}

fn dimension_key(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Service => "SERVICE",
        Dimension::LinkedAccount => "LINKED_ACCOUNT",
        Dimension::Region => "REGION",
        Dimension::ResourceId => "RESOURCE_ID",
    }
}

/// Dimension predicate of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DimensionValues {
    pub key: Dimension,
    pub values: Vec<String>,
}

/// Tag predicate of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagValues {
    pub key: String,
    pub values: Vec<String>,
}

/// Filter expression restricting results to a set of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Expression {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<DimensionValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagValues>,
}

impl Expression {
    /// Match any of `values` on `dimension`. An empty list means no filter.
    #[must_use]
    pub fn dimension(dimension: Dimension, values: Vec<String>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self {
            dimensions: Some(DimensionValues {
                key: dimension,
                values,
            }),
            tags: None,
        })
    }

    /// Match any of `values` on tag `key`. An empty list means no filter.
    #[must_use]
    pub fn tag(key: &TagKey, values: Vec<String>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self {
            dimensions: None,
            tags: Some(TagValues {
                key: key.as_str().to_string(),
                values,
            }),
        })
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Parameters of a `GetCostAndUsage` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostQueryParams {
    pub time_period: DateInterval,
    pub granularity: Granularity,
    pub metrics: Vec<Metric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<GroupDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Expression>,
}

/// Parameters of a `GetCostForecast` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForecastParams {
    pub time_period: DateInterval,
    pub granularity: Granularity,
    pub metric: ForecastMetric,
}
