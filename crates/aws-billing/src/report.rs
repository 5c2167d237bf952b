//! Human-readable and JSON rendering of Cost Explorer responses.

use std::fmt::Write as _;

use serde::Deserialize;

use crate::dates::DateRange;
use crate::providers::aws::{CostAndUsageResponse, ForecastResponse, Group, MetricValue};
use crate::query::CostQuery;

/// Unit assumed when the response omits one.
pub const DEFAULT_UNIT: &str = "USD";

/// Metric shown for each group line.
const GROUP_METRIC: &str = "BlendedCost";

/// Label used when a group carries no keys.
const UNKNOWN_KEY: &str = "Unknown";

/// Footer printed when the response carries a `NextPageToken`.
const TRUNCATED_NOTE: &str = "More results are available; use --json to see the NextPageToken.";

/// How each group line is labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupLabel {
    /// The first group key as-is.
    Plain,
    /// `Account <key>`.
    Account,
    /// `<tag key>=<value>`.
    Tag(String),
}

/// What each bucket lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// One line per metric of the ungrouped total.
    Totals,
    /// One line per group, showing its blended cost.
    Groups(GroupLabel),
}

/// Rendering recipe for one cost-and-usage query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostReport {
    pub title: String,
    pub period_label: &'static str,
    pub layout: Layout,
}

impl CostReport {
    /// Report matching a query intent.
    #[must_use]
    pub fn for_query(query: &CostQuery) -> Self {
        let groups = |title: String, label: GroupLabel| Self {
            title,
            period_label: "Period",
            layout: Layout::Groups(label),
        };

        match query {
            CostQuery::Usage { range, .. } => Self {
                title: format!("Cost for {range}"),
                period_label: "Period",
                layout: Layout::Totals,
            },
            CostQuery::ByService { range, .. } => {
                groups(format!("Costs by service for {range}"), GroupLabel::Plain)
            }
            CostQuery::ByAccount { range, .. } => {
                groups(format!("Costs by account for {range}"), GroupLabel::Account)
            }
            CostQuery::ByRegion { range, .. } => {
                groups(format!("Costs by region for {range}"), GroupLabel::Plain)
            }
            CostQuery::ByResource { range, .. } => {
                groups(format!("Costs by resource ID for {range}"), GroupLabel::Plain)
            }
            CostQuery::ByTag { range, tag_key, .. } => groups(
                format!("Costs by tag '{tag_key}' for {range}"),
                GroupLabel::Tag(tag_key.to_string()),
            ),
            CostQuery::ResourceUtilization {
                range,
                resource_id,
                ..
            } => Self {
                title: format!("Resource utilization for {resource_id} from {range}"),
                period_label: "Period",
                layout: Layout::Totals,
            },
            CostQuery::MonthlySummary { months } => Self {
                title: format!("Monthly cost summary for the last {months} months"),
                period_label: "Month",
                layout: Layout::Totals,
            },
        }
    }

    /// Render a raw `GetCostAndUsage` response.
    ///
    /// # Errors
    ///
    /// Returns error if the response does not have the expected shape.
    pub fn render(&self, response: &serde_json::Value) -> Result<String, serde_json::Error> {
        let parsed = CostAndUsageResponse::deserialize(response)?;
        Ok(self.render_parsed(&parsed))
    }

    /// Render an already-parsed response.
    #[must_use]
    pub fn render_parsed(&self, response: &CostAndUsageResponse) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n=== {} ===", self.title);

        for result in &response.results_by_time {
            let (start, end) = result
                .time_period
                .as_ref()
                .map_or(("", ""), |p| (p.start.as_str(), p.end.as_str()));
            let _ = write!(out, "\n{}: {start} to {end}", self.period_label);
            if result.estimated {
                out.push_str(" (estimated)");
            }
            out.push('\n');

            match &self.layout {
                Layout::Totals => {
                    for (metric, value) in &result.total {
                        let _ = writeln!(out, "  {metric}: {}", format_amount(Some(value)));
                    }
                }
                Layout::Groups(label) => {
                    for group in &result.groups {
                        let _ = writeln!(
                            out,
                            "  {}: {}",
                            group_label(label, group),
                            format_amount(group.metric(GROUP_METRIC))
                        );
                    }
                }
            }
        }

        if response.next_page_token.is_some() {
            let _ = writeln!(out, "\n{TRUNCATED_NOTE}");
        }

        out
    }
}

fn group_label(label: &GroupLabel, group: &Group) -> String {
    let key = group.keys.first().map_or(UNKNOWN_KEY, String::as_str);
    match label {
        GroupLabel::Plain => key.to_string(),
        GroupLabel::Account => format!("Account {key}"),
        GroupLabel::Tag(tag_key) => format!("{tag_key}={key}"),
    }
}

/// Format an amount with two decimals and its unit.
///
/// A missing or unparsable amount renders as `0.00`; a missing unit as `USD`.
#[must_use]
pub fn format_amount(value: Option<&MetricValue>) -> String {
    let amount = value
        .and_then(|v| v.amount.as_deref())
        .and_then(|a| a.trim().parse::<f64>().ok())
        .unwrap_or(0.0);
    let unit = value.and_then(|v| v.unit.as_deref()).unwrap_or(DEFAULT_UNIT);
    format!("{amount:.2} {unit}")
}

/// Render a raw `GetCostForecast` response.
///
/// # Errors
///
/// Returns error if the response does not have the expected shape.
pub fn render_forecast(
    range: &DateRange,
    response: &serde_json::Value,
) -> Result<String, serde_json::Error> {
    let parsed = ForecastResponse::deserialize(response)?;
    let unit = parsed
        .total
        .as_ref()
        .and_then(|t| t.unit.as_deref())
        .unwrap_or(DEFAULT_UNIT);

    let mut out = String::new();
    let _ = writeln!(out, "\n=== Cost forecast for {range} ===");

    let total = parsed
        .total
        .as_ref()
        .and_then(|t| t.amount.as_deref())
        .and_then(|a| a.trim().parse::<f64>().ok())
        .map_or_else(|| "N/A".to_string(), |a| format!("{a:.2}"));
    let _ = writeln!(out, "Forecasted cost: {total} {unit}");

    for bucket in &parsed.forecast_results_by_time {
        let Some(period) = &bucket.time_period else {
            continue;
        };
        let mean = decimal(bucket.mean_value.as_deref());
        let _ = write!(out, "  {} to {}: {mean} {unit}", period.start, period.end);
        if let (Some(lower), Some(upper)) = (
            bucket.prediction_interval_lower_bound.as_deref(),
            bucket.prediction_interval_upper_bound.as_deref(),
        ) {
            let _ = write!(out, " (range {} - {})", decimal(Some(lower)), decimal(Some(upper)));
        }
        out.push('\n');
    }

    Ok(out)
}

fn decimal(raw: Option<&str>) -> String {
    let value = raw.and_then(|r| r.trim().parse::<f64>().ok()).unwrap_or(0.0);
    format!("{value:.2}")
}

/// Pretty-print a raw response, keeping key order.
///
/// # Errors
///
/// Returns error if the value cannot be serialized.
pub fn to_json(response: &serde_json::Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(response)
}
