//! Billing queries over a [`CostExplorer`] provider.

use chrono::NaiveDate;
use tracing::{error, info};

use crate::config::BillingConfig;
use crate::dates::{self, DateRange};
use crate::error::{BillingError, Result};
use crate::providers::CostExplorer;
use crate::query::{CostQuery, ForecastQuery, Granularity, QueryBuilder, ResourceId, TagKey};

/// Runs billing queries: builds the request, calls the provider, and tags
/// failures with the query they belong to.
#[derive(Debug, Clone)]
pub struct BillingApi<P> {
    builder: QueryBuilder,
    provider: P,
}

impl<P: CostExplorer> BillingApi<P> {
    /// Create an API over `provider` using the defaults in `config`.
    #[must_use]
    pub fn new(config: &BillingConfig, provider: P) -> Self {
        Self {
            builder: QueryBuilder::new(config),
            provider,
        }
    }

    /// Run a cost-and-usage query, anchoring relative ranges on today.
    ///
    /// # Errors
    ///
    /// Returns error if the provider call fails.
    pub async fn execute(&self, query: &CostQuery) -> Result<serde_json::Value> {
        self.execute_on(query, dates::today()).await
    }

    /// Run a cost-and-usage query with an explicit `today`.
    ///
    /// # Errors
    ///
    /// Returns error if the provider call fails.
    pub async fn execute_on(
        &self,
        query: &CostQuery,
        today: NaiveDate,
    ) -> Result<serde_json::Value> {
        let params = self.builder.build(query, today);
        info!(
            query = query.name(),
            start = %params.time_period.start,
            end = %params.time_period.end,
            granularity = %params.granularity,
            "Requesting {}",
            query.name()
        );

        self.provider
            .get_cost_and_usage(&params)
            .await
            .map_err(|e| {
                error!(query = query.name(), provider = self.provider.name(), error = %e, "Query failed");
                BillingError::upstream(query.name(), e)
            })
    }

    /// Run a cost forecast.
    ///
    /// # Errors
    ///
    /// Returns error if the provider call fails.
    pub async fn forecast(&self, query: &ForecastQuery) -> Result<serde_json::Value> {
        const NAME: &str = "cost forecast";

        let params = self.builder.build_forecast(query);
        info!(
            query = NAME,
            start = %params.time_period.start,
            end = %params.time_period.end,
            metric = ?params.metric,
            "Requesting {NAME}"
        );

        self.provider
            .get_cost_forecast(&params)
            .await
            .map_err(|e| {
                error!(query = NAME, provider = self.provider.name(), error = %e, "Query failed");
                BillingError::upstream(NAME, e)
            })
    }

    /// Ungrouped cost and usage.
    ///
    /// # Errors
    ///
    /// Returns error if the provider call fails.
    pub async fn cost_and_usage(
        &self,
        range: DateRange,
        granularity: Option<Granularity>,
    ) -> Result<serde_json::Value> {
        self.execute(&CostQuery::Usage { range, granularity }).await
    }

    /// Costs grouped by service, optionally restricted to `services`.
    ///
    /// # Errors
    ///
    /// Returns error if the provider call fails.
    pub async fn cost_by_service(
        &self,
        range: DateRange,
        granularity: Option<Granularity>,
        services: Vec<String>,
    ) -> Result<serde_json::Value> {
        self.execute(&CostQuery::ByService {
            range,
            granularity,
            services,
        })
        .await
    }

    /// Costs grouped by linked account.
    ///
    /// # Errors
    ///
    /// Returns error if the provider call fails.
    pub async fn cost_by_account(
        &self,
        range: DateRange,
        granularity: Option<Granularity>,
    ) -> Result<serde_json::Value> {
        self.execute(&CostQuery::ByAccount { range, granularity }).await
    }

    /// Costs grouped by region.
    ///
    /// # Errors
    ///
    /// Returns error if the provider call fails.
    pub async fn cost_by_region(
        &self,
        range: DateRange,
        granularity: Option<Granularity>,
    ) -> Result<serde_json::Value> {
        self.execute(&CostQuery::ByRegion { range, granularity }).await
    }

    /// Costs grouped by resource, optionally restricted to `resource_ids`.
    ///
    /// # Errors
    ///
    /// Returns error if the provider call fails.
    pub async fn cost_by_resource(
        &self,
        range: DateRange,
        granularity: Option<Granularity>,
        resource_ids: Vec<String>,
    ) -> Result<serde_json::Value> {
        self.execute(&CostQuery::ByResource {
            range,
            granularity,
            resource_ids,
        })
        .await
    }

    /// Costs grouped by a tag, optionally restricted to `tag_values`.
    ///
    /// # Errors
    ///
    /// Returns error if the tag key is blank or the provider call fails.
    pub async fn cost_by_tag(
        &self,
        range: DateRange,
        granularity: Option<Granularity>,
        tag_key: &str,
        tag_values: Vec<String>,
    ) -> Result<serde_json::Value> {
        self.execute(&CostQuery::ByTag {
            range,
            granularity,
            tag_key: TagKey::new(tag_key)?,
            tag_values,
        })
        .await
    }

    /// Cost and normalized usage of a single resource.
    ///
    /// # Errors
    ///
    /// Returns error if `resource_id` is blank or the provider call fails.
    pub async fn resource_utilization(
        &self,
        range: DateRange,
        granularity: Option<Granularity>,
        resource_id: &str,
    ) -> Result<serde_json::Value> {
        self.execute(&CostQuery::ResourceUtilization {
            range,
            granularity,
            resource_id: ResourceId::new(resource_id)?,
        })
        .await
    }

    /// Monthly totals for the trailing `months` months.
    ///
    /// # Errors
    ///
    /// Returns error if the provider call fails.
    pub async fn monthly_summary(&self, months: u32) -> Result<serde_json::Value> {
        self.execute(&CostQuery::MonthlySummary { months }).await
    }
}
