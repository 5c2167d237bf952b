//! Credential resolution through the standard AWS provider chain.

use std::error::Error as StdError;

use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::error::CredentialsError;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_credential_types::Credentials;
use tracing::debug;

use crate::config::BillingConfig;
use crate::providers::ProviderError;

/// Build the credentials provider for `config`.
///
/// With a profile, only that profile is consulted (shared credentials file,
/// `AWS_CONFIG_FILE`, SSO, `credential_process`, assumed roles). Without one,
/// the default chain applies: environment, default profile, web identity,
/// container, instance metadata.
///
/// # Errors
///
/// Returns error if the loaded configuration carries no credentials provider.
pub async fn load_provider(
    config: &BillingConfig,
) -> Result<SharedCredentialsProvider, ProviderError> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.signing_region().to_string()));

    if let Some(profile) = config.profile.as_deref() {
        debug!(profile = %profile, "Using named profile for credentials");
        loader = loader.profile_name(profile).credentials_provider(
            ProfileFileCredentialsProvider::builder()
                .profile_name(profile)
                .build(),
        );
    }

    loader
        .load()
        .await
        .credentials_provider()
        .ok_or_else(|| {
            ProviderError::Config("no AWS credentials provider configured".to_string())
        })
}

/// Ask `provider` for credentials, flattening the error chain into an
/// authentication error.
pub(crate) async fn resolve(
    provider: &SharedCredentialsProvider,
) -> Result<Credentials, ProviderError> {
    provider
        .provide_credentials()
        .await
        .map_err(|e| ProviderError::Auth(describe(&e)))
}

fn describe(err: &CredentialsError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
