use subtle::ConstantTimeEq;

use crate::core::config::CredentialsConfig;

/// Errors that can occur while authenticating a caller
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiKeyError {
    #[error("Missing X-API-KEY header")]
    Missing,

    #[error("Invalid API key")]
    Mismatch,
}

/// Checks the key presented by a caller against `SERVER_API_KEY`.
///
/// Keys of equal length are compared in constant time, so timing does not
/// reveal how many leading bytes matched.
///
/// # Examples
///
/// ```rust,ignore
/// verify_api_key(&config.credentials, headers.get("x-api-key"))?;
/// ```
pub fn verify_api_key(
    credentials: &CredentialsConfig,
    presented: Option<&str>,
) -> Result<(), ApiKeyError> {
    let presented = presented.ok_or(ApiKeyError::Missing)?;
    if constant_time_eq(
        presented.as_bytes(),
        credentials.server_api_key.as_bytes(),
    ) {
        Ok(())
    } else {
        Err(ApiKeyError::Mismatch)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}
