//! Cost Explorer response models.
//!
//! Only the fields read for display are modeled; everything else in the
//! response is ignored here and survives in the raw JSON.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::query::DateInterval;

// ============================================================================
// GetCostAndUsage
// ============================================================================

/// `GetCostAndUsage` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostAndUsageResponse {
    /// One entry per time bucket.
    #[serde(default)]
    pub results_by_time: Vec<ResultByTime>,
    /// Set when more pages exist; the report notes the truncation.
    pub next_page_token: Option<String>,
}

/// Costs for one time bucket.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultByTime {
    /// Bucket bounds.
    pub time_period: Option<DateInterval>,
    /// Ungrouped totals per metric, in response order.
    #[serde(default, deserialize_with = "ordered_metrics")]
    pub total: Vec<(String, MetricValue)>,
    /// Grouped costs.
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Whether the bucket is still being finalized.
    #[serde(default)]
    pub estimated: bool,
}

/// Costs for one group within a bucket.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    /// Group key values (one per `GroupBy` entry).
    #[serde(default)]
    pub keys: Vec<String>,
    /// Metrics for this group, in response order.
    #[serde(default, deserialize_with = "ordered_metrics")]
    pub metrics: Vec<(String, MetricValue)>,
}

impl Group {
    /// Look up a metric by name.
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<&MetricValue> {
        self.metrics
            .iter()
            .find(|(metric, _)| metric == name)
            .map(|(_, value)| value)
    }
}

/// An amount with its unit. Cost Explorer sends amounts as decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricValue {
    pub amount: Option<String>,
    pub unit: Option<String>,
}

// ============================================================================
// GetCostForecast
// ============================================================================

/// `GetCostForecast` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForecastResponse {
    /// Forecast total over the whole period.
    pub total: Option<MetricValue>,
    /// Per-bucket forecasts.
    #[serde(default)]
    pub forecast_results_by_time: Vec<ForecastResult>,
}

/// Forecast for one time bucket.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForecastResult {
    pub time_period: Option<DateInterval>,
    pub mean_value: Option<String>,
    pub prediction_interval_lower_bound: Option<String>,
    pub prediction_interval_upper_bound: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

/// AWS JSON 1.1 error body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwsErrorBody {
    /// Error type, e.g. `com.amazonaws.ce#LimitExceededException`.
    #[serde(rename = "__type")]
    pub error_type: Option<String>,
    /// Error message (`message` or `Message`).
    #[serde(alias = "Message")]
    pub message: Option<String>,
}

impl AwsErrorBody {
    /// Short error code with any namespace prefix or URI suffix removed.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.error_type.as_deref().map(short_error_code)
    }
}

/// Reduce `ns#Code:uri` forms to `Code`.
#[must_use]
pub fn short_error_code(raw: &str) -> &str {
    let code = raw.rsplit('#').next().unwrap_or(raw);
    code.split(':').next().unwrap_or(code).trim()
}

/// Deserialize a JSON object of metrics into a vector, keeping key order.
fn ordered_metrics<'de, D>(deserializer: D) -> Result<Vec<(String, MetricValue)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct MetricsVisitor;

    impl<'de> Visitor<'de> for MetricsVisitor {
        type Value = Vec<(String, MetricValue)>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a map of metric names to amounts")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut metrics = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, MetricValue>()? {
                metrics.push(entry);
            }
            Ok(metrics)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(MetricsVisitor)
}
