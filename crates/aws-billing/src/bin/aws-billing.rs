//! aws-billing - query AWS costs from the command line.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use aws_billing::query::{
    CostQuery, ForecastMetric, ForecastQuery, Granularity, ResourceId, TagKey,
};
use aws_billing::report::{self, CostReport};
use aws_billing::{dates, BillingApi, BillingConfig, BillingError, CostExplorerClient, DateRange};

/// Query AWS Cost Explorer for cost and usage data.
#[derive(Parser)]
#[command(name = "aws-billing")]
#[command(about = "Query AWS cost and usage data from Cost Explorer", version)]
struct Cli {
    /// AWS profile from the shared credentials or config file.
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// AWS region; China regions use the China partition endpoint.
    #[arg(long, env = "AWS_REGION", default_value = aws_billing::config::DEFAULT_REGION)]
    region: String,

    /// Override the Cost Explorer endpoint (emulators, testing).
    #[arg(long, env = "AWS_ENDPOINT_URL_COST_EXPLORER")]
    endpoint_url: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Date range shared by the range-based commands.
#[derive(Args)]
struct RangeArgs {
    /// Start date (YYYY-MM-DD or: today, yesterday, month_start, month_end, year_start).
    #[arg(long)]
    start_date: String,

    /// End date (YYYY-MM-DD or: today, yesterday, month_start, month_end, year_start).
    #[arg(long)]
    end_date: String,

    /// Time granularity (defaults depend on the command).
    #[arg(long, value_enum)]
    granularity: Option<Granularity>,

    /// Print the raw response as JSON.
    #[arg(long, default_value = "false")]
    json: bool,
}

impl RangeArgs {
    fn resolve(&self, today: NaiveDate) -> aws_billing::Result<DateRange> {
        DateRange::resolve(&self.start_date, &self.end_date, today)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Get cost and usage data.
    Cost {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Get cost by service.
    Service {
        #[command(flatten)]
        range: RangeArgs,

        /// Only include these services (e.g. "Amazon Elastic Compute Cloud - Compute").
        #[arg(long, num_args = 1..)]
        services: Vec<String>,
    },

    /// Get cost by linked account.
    Account {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Get cost by region.
    Region {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Get cost by resource ID.
    Resource {
        #[command(flatten)]
        range: RangeArgs,

        /// Specific resource ID to filter by.
        #[arg(long)]
        resource_id: Option<String>,

        /// Resource IDs to filter by.
        #[arg(long, num_args = 1..)]
        resource_ids: Vec<String>,
    },

    /// Get detailed utilization for a specific resource.
    Utilization {
        #[command(flatten)]
        range: RangeArgs,

        /// Resource ID to analyze.
        #[arg(long)]
        resource_id: String,
    },

    /// Get cost by resource tag.
    Tag {
        #[command(flatten)]
        range: RangeArgs,

        /// Tag key to group by.
        #[arg(long)]
        tag_key: String,

        /// Tag values to filter by.
        #[arg(long, num_args = 1..)]
        tag_values: Vec<String>,
    },

    /// Get a cost forecast.
    Forecast {
        #[command(flatten)]
        range: RangeArgs,

        /// Forecast metric.
        #[arg(long, value_enum, default_value_t = ForecastMetric::UnblendedCost)]
        metric: ForecastMetric,
    },

    /// Get a monthly cost summary.
    Summary {
        /// Number of months to look back.
        #[arg(long, default_value = "6")]
        months: u32,

        /// Print the raw response as JSON.
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

/// A fully resolved request, ready to send.
enum Request {
    Cost(CostQuery),
    Forecast(ForecastQuery),
}

impl Commands {
    /// Resolve dates and validate inputs. Runs before any client is created.
    fn into_request(self, today: NaiveDate) -> aws_billing::Result<(Request, bool)> {
        let request = match self {
            Self::Cost { range } => (
                Request::Cost(CostQuery::Usage {
                    range: range.resolve(today)?,
                    granularity: range.granularity,
                }),
                range.json,
            ),
            Self::Service { range, services } => (
                Request::Cost(CostQuery::ByService {
                    range: range.resolve(today)?,
                    granularity: range.granularity,
                    services,
                }),
                range.json,
            ),
            Self::Account { range } => (
                Request::Cost(CostQuery::ByAccount {
                    range: range.resolve(today)?,
                    granularity: range.granularity,
                }),
                range.json,
            ),
            Self::Region { range } => (
                Request::Cost(CostQuery::ByRegion {
                    range: range.resolve(today)?,
                    granularity: range.granularity,
                }),
                range.json,
            ),
            Self::Resource {
                range,
                resource_id,
                resource_ids,
            } => (
                Request::Cost(CostQuery::ByResource {
                    range: range.resolve(today)?,
                    granularity: range.granularity,
                    resource_ids: merge_resource_ids(resource_id, resource_ids),
                }),
                range.json,
            ),
            Self::Utilization { range, resource_id } => (
                Request::Cost(CostQuery::ResourceUtilization {
                    range: range.resolve(today)?,
                    granularity: range.granularity,
                    resource_id: ResourceId::new(resource_id)?,
                }),
                range.json,
            ),
            Self::Tag {
                range,
                tag_key,
                tag_values,
            } => (
                Request::Cost(CostQuery::ByTag {
                    range: range.resolve(today)?,
                    granularity: range.granularity,
                    tag_key: TagKey::new(tag_key)?,
                    tag_values,
                }),
                range.json,
            ),
            Self::Forecast { range, metric } => {
                let mut query = ForecastQuery::new(range.resolve(today)?).with_metric(metric);
                if let Some(granularity) = range.granularity {
                    query = query.with_granularity(granularity);
                }
                (Request::Forecast(query), range.json)
            }
            Self::Summary { months, json } => {
                (Request::Cost(CostQuery::MonthlySummary { months }), json)
            }
        };
        Ok(request)
    }
}

/// `--resource-id` first, then `--resource-ids`, without duplicates.
fn merge_resource_ids(resource_id: Option<String>, resource_ids: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(resource_ids.len() + 1);
    for id in resource_id.into_iter().chain(resource_ids) {
        if !merged.contains(&id) {
            merged.push(id);
        }
    }
    merged
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays clean
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let today = dates::today();
    let (request, json) = cli.command.into_request(today)?;

    let mut config = BillingConfig::new().with_region(cli.region);
    if let Some(profile) = cli.profile {
        config = config.with_profile(profile);
    }
    if let Some(endpoint_url) = cli.endpoint_url {
        config = config.with_endpoint_url(endpoint_url);
    }
    debug!(?config, "Resolved configuration");

    let query_name = match &request {
        Request::Cost(query) => query.name(),
        Request::Forecast(_) => "cost forecast",
    };
    let client = CostExplorerClient::from_config(&config)
        .await
        .map_err(|e| BillingError::upstream(query_name, e))?;
    let api = BillingApi::new(&config, client);

    let (response, rendered) = match request {
        Request::Cost(query) => {
            let response = api.execute_on(&query, today).await?;
            let rendered = if json {
                None
            } else {
                Some(CostReport::for_query(&query).render(&response)?)
            };
            (response, rendered)
        }
        Request::Forecast(query) => {
            let response = api.forecast(&query).await?;
            let rendered = if json {
                None
            } else {
                Some(report::render_forecast(&query.range, &response)?)
            };
            (response, rendered)
        }
    };

    match rendered {
        Some(text) => print!("{text}"),
        None => println!(
            "{}",
            report::to_json(&response).context("Failed to serialize response")?
        ),
    }

    Ok(())
}
