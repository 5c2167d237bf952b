//! SigV4 header signing for JSON 1.1 requests.

use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    sign, SignableBody, SignableRequest, SigningParams, SigningSettings,
};
use aws_sigv4::sign::v4;

use crate::providers::ProviderError;

/// Sign a POST of `payload` to `url` and return the headers to attach
/// (`authorization`, `x-amz-date`, and `x-amz-security-token` for session
/// credentials).
///
/// `headers` are included in the signature and must also be sent.
///
/// # Errors
///
/// Returns error if the URL or a header cannot be signed.
pub fn sign_post(
    credentials: Credentials,
    region: &str,
    service: &str,
    url: &str,
    headers: &[(&str, &str)],
    payload: &[u8],
    time: SystemTime,
) -> Result<Vec<(String, String)>, ProviderError> {
    let identity = credentials.into();
    let params: SigningParams<'_> = v4::SigningParams::builder()
        .identity(&identity)
        .region(region)
        .name(service)
        .time(time)
        .settings(SigningSettings::default())
        .build()
        .map_err(|e| ProviderError::Signing(e.to_string()))?
        .into();

    let request = SignableRequest::new(
        "POST",
        url,
        headers.iter().copied(),
        SignableBody::Bytes(payload),
    )
    .map_err(|e| ProviderError::Signing(e.to_string()))?;

    let (instructions, _signature) = sign(request, &params)
        .map_err(|e| ProviderError::Signing(e.to_string()))?
        .into_parts();

    Ok(instructions
        .headers()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect())
}
