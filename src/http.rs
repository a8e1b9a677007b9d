//! Shared HTTP plumbing for the two lookup services.

use anyhow::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::error::LookupError;

/// Build a client identifying itself with `user_agent`.
///
/// No timeout is applied unless one is configured.
pub(crate) fn build_client(user_agent: Option<&str>, timeout_secs: Option<u64>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent.to_string());
    }
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Append form-encoded query parameters to an endpoint
pub(crate) fn with_query(endpoint: &Url, params: &[(&str, &str)]) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut().extend_pairs(params);
    url
}

/// GET `url` and decode a JSON body.
///
/// A non-success status, a blank body and a malformed body each map to their
/// own [`LookupError`] variant.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: Url,
) -> Result<T, LookupError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status(status));
    }

    let body = response.text().await?;
    if body.trim().is_empty() {
        return Err(LookupError::EmptyResponse);
    }

    Ok(serde_json::from_str(&body)?)
}
