//! End-to-end tests of the `aws-billing` binary against a mock endpoint.

use std::io::Write;
use std::process::{Command, Output};

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NO_SUCH_FILE: &str = "/nonexistent/aws-billing-test/aws-file";

/// Command with static credentials and no ambient AWS configuration.
fn billing(endpoint: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_aws-billing"));
    cmd.env("AWS_ACCESS_KEY_ID", "AKIACLI")
        .env("AWS_SECRET_ACCESS_KEY", "cli-secret")
        .env("AWS_CONFIG_FILE", NO_SUCH_FILE)
        .env("AWS_SHARED_CREDENTIALS_FILE", NO_SUCH_FILE)
        .env("AWS_EC2_METADATA_DISABLED", "true")
        .env_remove("AWS_SESSION_TOKEN")
        .env_remove("AWS_PROFILE")
        .env_remove("AWS_REGION")
        .env_remove("AWS_ENDPOINT_URL_COST_EXPLORER")
        .env_remove("RUST_LOG")
        .arg("--endpoint-url")
        .arg(endpoint);
    cmd
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn service_response() -> serde_json::Value {
    json!({
        "ResultsByTime": [{
            "TimePeriod": {"Start": "2024-01-01", "End": "2024-01-31"},
            "Total": {},
            "Groups": [
                {"Keys": ["Amazon EC2"], "Metrics": {"BlendedCost": {"Amount": "120.50", "Unit": "USD"}}},
                {"Keys": ["Amazon S3"], "Metrics": {"BlendedCost": {"Amount": "4.25", "Unit": "USD"}}}
            ],
            "Estimated": false
        }]
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_service_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-amz-target", "AWSInsightsIndexService.GetCostAndUsage"))
        .and(body_partial_json(json!({
            "TimePeriod": {"Start": "2024-01-01", "End": "2024-01-31"},
            "Granularity": "MONTHLY",
            "GroupBy": [{"Type": "DIMENSION", "Key": "SERVICE"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(service_response()))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = billing(&server.uri());
    cmd.args([
        "service",
        "--start-date",
        "2024-01-01",
        "--end-date",
        "2024-01-31",
        "--granularity",
        "MONTHLY",
    ]);

    run(cmd).await.assert().success().stdout(
        "\n=== Costs by service for 2024-01-01 to 2024-01-31 ===\n\
         \n\
         Period: 2024-01-01 to 2024-01-31\n  \
         Amazon EC2: 120.50 USD\n  \
         Amazon S3: 4.25 USD\n",
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_json_passes_response_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(service_response()))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = billing(&server.uri());
    cmd.args([
        "service",
        "--start-date",
        "2024-01-01",
        "--end-date",
        "2024-01-31",
        "--json",
    ]);

    let output = run(cmd).await;
    output.clone().assert().success();
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, service_response());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_date_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = billing(&server.uri());
    cmd.args(["cost", "--start-date", "2024-13-45", "--end-date", "today"]);

    run(cmd)
        .await
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid date format '2024-13-45'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_summary_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"Granularity": "MONTHLY"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ResultsByTime": [
                {
                    "TimePeriod": {"Start": "2024-01-01", "End": "2024-02-01"},
                    "Total": {"BlendedCost": {"Amount": "100", "Unit": "USD"}}
                },
                {
                    "TimePeriod": {"Start": "2024-02-01", "End": "2024-03-01"},
                    "Total": {"BlendedCost": {"Amount": "50.5", "Unit": "USD"}}
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = billing(&server.uri());
    cmd.args(["summary", "--months", "3"]);

    run(cmd)
        .await
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "\n=== Monthly cost summary for the last 3 months ===\n",
        ))
        .stdout(predicate::str::contains(
            "Month: 2024-01-01 to 2024-02-01\n  BlendedCost: 100.00 USD",
        ))
        .stdout(predicate::str::contains(
            "Month: 2024-02-01 to 2024-03-01\n  BlendedCost: 50.50 USD",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upstream_error_exits_with_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "__type": "com.amazonaws.ce#LimitExceededException",
            "message": "Rate exceeded"
        })))
        .mount(&server)
        .await;

    let mut cmd = billing(&server.uri());
    cmd.args(["region", "--start-date", "month_start", "--end-date", "today"]);

    run(cmd)
        .await
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cost by region query failed"))
        .stderr(predicate::str::contains("Rate exceeded"));
}

/// Mock that only answers requests signed with `access_key`.
async fn expect_signed_by(server: &MockServer, access_key: &'static str) {
    Mock::given(method("POST"))
        .and(move |req: &wiremock::Request| {
            req.headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|auth| auth.contains(&format!("Credential={access_key}/")))
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ResultsByTime": []})))
        .expect(1)
        .mount(server)
        .await;
}

fn account_for_january(cmd: &mut Command) {
    cmd.args([
        "account",
        "--start-date",
        "2024-01-01",
        "--end-date",
        "2024-01-31",
    ]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_profile_from_shared_credentials_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[default]\naws_access_key_id = AKIADEFAULT\naws_secret_access_key = x\n\n\
         [billing]\naws_access_key_id = AKIAPROFILE\naws_secret_access_key = y"
    )
    .unwrap();

    let server = MockServer::start().await;
    expect_signed_by(&server, "AKIAPROFILE").await;

    let mut cmd = billing(&server.uri());
    cmd.env("AWS_SHARED_CREDENTIALS_FILE", file.path())
        .args(["--profile", "billing"]);
    account_for_january(&mut cmd);

    run(cmd)
        .await
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "\n=== Costs by account for 2024-01-01 to 2024-01-31 ===\n",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_profile_from_config_file() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        config,
        "[default]\nregion = us-east-1\n\n\
         [profile billing]\nregion = eu-west-1\n\
         aws_access_key_id = AKIACONFIG\naws_secret_access_key = z"
    )
    .unwrap();
    let credentials = tempfile::NamedTempFile::new().unwrap();

    let server = MockServer::start().await;
    expect_signed_by(&server, "AKIACONFIG").await;

    let mut cmd = billing(&server.uri());
    cmd.env("AWS_CONFIG_FILE", config.path())
        .env("AWS_SHARED_CREDENTIALS_FILE", credentials.path())
        .env("AWS_PROFILE", "billing");
    account_for_january(&mut cmd);

    run(cmd).await.assert().success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_profile_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ResultsByTime": []})))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = billing(&server.uri());
    cmd.args(["--profile", "nope"]);
    account_for_january(&mut cmd);

    run(cmd)
        .await
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cost by account query failed"))
        .stderr(predicate::str::contains("Authentication error"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_forecast_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-amz-target", "AWSInsightsIndexService.GetCostForecast"))
        .and(body_partial_json(json!({"Metric": "BLENDED_COST", "Granularity": "MONTHLY"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Total": {"Amount": "300.1", "Unit": "USD"},
            "ForecastResultsByTime": [{
                "TimePeriod": {"Start": "2030-01-01", "End": "2030-02-01"},
                "MeanValue": "300.1"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = billing(&server.uri());
    cmd.args([
        "forecast",
        "--start-date",
        "2030-01-01",
        "--end-date",
        "2030-02-01",
        "--metric",
        "BLENDED_COST",
    ]);

    run(cmd).await.assert().success().stdout(
        "\n=== Cost forecast for 2030-01-01 to 2030-02-01 ===\n\
         Forecasted cost: 300.10 USD\n  \
         2030-01-01 to 2030-02-01: 300.10 USD\n",
    );
}
