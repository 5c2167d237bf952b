#![allow(clippy::doc_markdown)] // Brand names like Cost Explorer and SigV4 without backticks

//! Query AWS billing data through the Cost Explorer API.
//!
//! The crate is layered so each step can be used on its own:
//!
//! - [`dates`] - resolve relative keywords (`today`, `month_start`, ...) and
//!   free-form dates into a [`DateRange`]
//! - [`query`] - describe a query by intent ([`CostQuery`]) and build the
//!   exact request parameters ([`QueryBuilder`]) without any I/O
//! - [`providers`] - the [`CostExplorer`] trait and its AWS implementation,
//!   which resolves credentials through the AWS provider chain and signs
//!   requests with SigV4
//! - [`api`] - [`BillingApi`], one operation per intent
//! - [`report`] - human-readable and JSON rendering of responses
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use aws_billing::{BillingApi, BillingConfig, CostExplorerClient, DateRange, dates};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BillingConfig::new().with_profile("billing");
//!     let client = CostExplorerClient::from_config(&config).await?;
//!     let api = BillingApi::new(&config, client);
//!
//!     let range = DateRange::resolve("month_start", "today", dates::today())?;
//!     let response = api.cost_by_service(range, None, Vec::new()).await?;
//!     println!("{}", serde_json::to_string_pretty(&response)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Testing Without AWS
//!
//! Any type implementing [`CostExplorer`] can back a [`BillingApi`], and
//! [`BillingConfig::with_endpoint_url`] points the AWS client at a local
//! mock server.

pub mod api;
pub mod config;
pub mod dates;
pub mod error;
pub mod providers;
pub mod query;
pub mod report;

pub use api::BillingApi;
pub use config::BillingConfig;
pub use dates::DateRange;
pub use error::{BillingError, Result};
pub use providers::{CostExplorer, CostExplorerClient, ProviderError};
pub use query::{
    CostQuery, CostQueryParams, ForecastMetric, ForecastParams, ForecastQuery, Granularity,
    Metric, QueryBuilder, ResourceId, TagKey,
};
pub use report::CostReport;
