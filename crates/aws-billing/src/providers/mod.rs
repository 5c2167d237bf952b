//! Cost API providers.
//!
//! [`CostExplorer`] is the seam between query construction and the network.
//! [`aws::CostExplorerClient`] implements it against AWS Cost Explorer.

pub mod aws;
mod traits;

pub use aws::CostExplorerClient;
pub use traits::{CostExplorer, ProviderError};
