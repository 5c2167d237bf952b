//! High-level query intents.
//!
//! Each variant carries only what its query needs, so a tag-grouped query
//! cannot exist without a validated [`TagKey`] and a utilization query
//! without a [`ResourceId`].

use crate::dates::DateRange;

use super::types::{ForecastMetric, Granularity, ResourceId, TagKey};

/// A cost-and-usage query by intent.
///
/// `granularity: None` selects the intent's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostQuery {
    /// Ungrouped totals.
    Usage {
        range: DateRange,
        granularity: Option<Granularity>,
    },
    /// Grouped by service, optionally restricted to named services.
    ByService {
        range: DateRange,
        granularity: Option<Granularity>,
        services: Vec<String>,
    },
    /// Grouped by linked account.
    ByAccount {
        range: DateRange,
        granularity: Option<Granularity>,
    },
    /// Grouped by region.
    ByRegion {
        range: DateRange,
        granularity: Option<Granularity>,
    },
    /// Grouped by resource ID, optionally restricted to given resources.
    ByResource {
        range: DateRange,
        granularity: Option<Granularity>,
        resource_ids: Vec<String>,
    },
    /// Grouped by a tag, optionally restricted to given tag values.
    ByTag {
        range: DateRange,
        granularity: Option<Granularity>,
        tag_key: TagKey,
        tag_values: Vec<String>,
    },
    /// Totals for a single resource, including normalized usage.
    ResourceUtilization {
        range: DateRange,
        granularity: Option<Granularity>,
        resource_id: ResourceId,
    },
    /// Monthly totals for the trailing `months` months.
    MonthlySummary { months: u32 },
}

impl CostQuery {
    /// Name used in logs and error context.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Usage { .. } => "cost and usage",
            Self::ByService { .. } => "cost by service",
            Self::ByAccount { .. } => "cost by account",
            Self::ByRegion { .. } => "cost by region",
            Self::ByResource { .. } => "cost by resource",
            Self::ByTag { .. } => "cost by tag",
            Self::ResourceUtilization { .. } => "resource utilization",
            Self::MonthlySummary { .. } => "monthly cost summary",
        }
    }

    /// Granularity used when the caller does not choose one.
    #[must_use]
    pub fn default_granularity(&self) -> Option<Granularity> {
        match self {
            Self::ByService { .. }
            | Self::ByAccount { .. }
            | Self::ByRegion { .. }
            | Self::MonthlySummary { .. } => Some(Granularity::Monthly),
            Self::ByResource { .. } | Self::ByTag { .. } | Self::ResourceUtilization { .. } => {
                Some(Granularity::Daily)
            }
            // Falls back to the configured default.
            Self::Usage { .. } => None,
        }
    }
}

/// A cost forecast request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery {
    pub range: DateRange,
    pub granularity: Option<Granularity>,
    pub metric: ForecastMetric,
}

impl ForecastQuery {
    /// Forecast `range` with the default monthly granularity and unblended cost.
    #[must_use]
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            granularity: None,
            metric: ForecastMetric::default(),
        }
    }

    /// Set the granularity.
    #[must_use]
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    /// Set the forecast metric.
    #[must_use]
    pub fn with_metric(mut self, metric: ForecastMetric) -> Self {
        self.metric = metric;
        self
    }
}
