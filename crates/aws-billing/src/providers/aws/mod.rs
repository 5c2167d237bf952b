//! AWS Cost Explorer provider.
//!
//! Speaks the AWS JSON 1.1 protocol directly:
//!
//! - `POST https://ce.us-east-1.amazonaws.com/` (the global endpoint of the
//!   `aws` partition; China regions use `ce.cn-northwest-1.amazonaws.com.cn`)
//! - `Content-Type: application/x-amz-json-1.1`
//! - `X-Amz-Target: AWSInsightsIndexService.<Operation>`
//! - Signature Version 4 over the `ce` service
//!
//! Credentials come from the standard AWS provider chain (see
//! [`load_provider`]).

mod client;
mod credentials;
mod models;
mod sigv4;

pub use client::CostExplorerClient;
pub use credentials::load_provider;
pub use models::*;
pub use sigv4::sign_post;
