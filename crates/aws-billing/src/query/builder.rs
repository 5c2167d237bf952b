//! Maps query intents onto Cost Explorer request parameters.

use chrono::NaiveDate;

use super::intent::{CostQuery, ForecastQuery};
use super::types::{
    CostQueryParams, DateInterval, Dimension, Expression, ForecastParams, Granularity,
    GroupDefinition, Metric,
};
use crate::config::BillingConfig;
use crate::dates::DateRange;

/// Builds request parameters from intents. Never touches the network.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    default_metrics: Vec<Metric>,
    default_granularity: Granularity,
    date_format: String,
}

impl QueryBuilder {
    /// Create a builder using the defaults in `config`.
    #[must_use]
    pub fn new(config: &BillingConfig) -> Self {
        Self {
            default_metrics: config.default_metrics.clone(),
            default_granularity: config.default_granularity,
            date_format: config.date_format.clone(),
        }
    }

    /// Build a generic cost-and-usage request.
    ///
    /// Unset `granularity` and `metrics` fall back to the configured defaults.
    #[must_use]
    pub fn build_cost_query(
        &self,
        range: &DateRange,
        granularity: Option<Granularity>,
        metrics: Option<Vec<Metric>>,
        group_by: Option<GroupDefinition>,
        filter: Option<Expression>,
    ) -> CostQueryParams {
        CostQueryParams {
            time_period: DateInterval::from_range(range, &self.date_format),
            granularity: granularity.unwrap_or(self.default_granularity),
            metrics: metrics.unwrap_or_else(|| self.default_metrics.clone()),
            group_by: group_by.map(|group| vec![group]),
            filter,
        }
    }

    /// Build the request for an intent. `today` anchors the monthly summary.
    #[must_use]
    pub fn build(&self, query: &CostQuery, today: NaiveDate) -> CostQueryParams {
        let granularity = |chosen: Option<Granularity>| chosen.or(query.default_granularity());

        match query {
            CostQuery::Usage { range, granularity: g } => {
                self.build_cost_query(range, granularity(*g), None, None, None)
            }
            CostQuery::ByService {
                range,
                granularity: g,
                services,
            } => self.build_cost_query(
                range,
                granularity(*g),
                None,
                Some(GroupDefinition::dimension(Dimension::Service)),
                Expression::dimension(Dimension::Service, services.clone()),
            ),
            CostQuery::ByAccount { range, granularity: g } => self.build_cost_query(
                range,
                granularity(*g),
                None,
                Some(GroupDefinition::dimension(Dimension::LinkedAccount)),
                None,
            ),
            CostQuery::ByRegion { range, granularity: g } => self.build_cost_query(
                range,
                granularity(*g),
                None,
                Some(GroupDefinition::dimension(Dimension::Region)),
                None,
            ),
            CostQuery::ByResource {
                range,
                granularity: g,
                resource_ids,
            } => self.build_cost_query(
                range,
                granularity(*g),
                None,
                Some(GroupDefinition::dimension(Dimension::ResourceId)),
                Expression::dimension(Dimension::ResourceId, resource_ids.clone()),
            ),
            CostQuery::ByTag {
                range,
                granularity: g,
                tag_key,
                tag_values,
            } => self.build_cost_query(
                range,
                granularity(*g),
                None,
                Some(GroupDefinition::tag(tag_key)),
                Expression::tag(tag_key, tag_values.clone()),
            ),
            CostQuery::ResourceUtilization {
                range,
                granularity: g,
                resource_id,
            } => {
                let mut metrics = self.default_metrics.clone();
                if !metrics.contains(&Metric::NormalizedUsageAmount) {
                    metrics.push(Metric::NormalizedUsageAmount);
                }
                self.build_cost_query(
                    range,
                    granularity(*g),
                    Some(metrics),
                    None,
                    Expression::dimension(Dimension::ResourceId, vec![resource_id.to_string()]),
                )
            }
            CostQuery::MonthlySummary { months } => self.build_cost_query(
                &DateRange::trailing_months(*months, today),
                granularity(None),
                None,
                None,
                None,
            ),
        }
    }

    /// Build a forecast request.
    #[must_use]
    pub fn build_forecast(&self, query: &ForecastQuery) -> ForecastParams {
        ForecastParams {
            time_period: DateInterval::from_range(&query.range, &self.date_format),
            granularity: query.granularity.unwrap_or(Granularity::Monthly),
            metric: query.metric,
        }
    }
}
