//! HTTP legs of the authorization-code flow.

use crate::config::EndpointConfig;
use crate::error::{ConnectorError, ConnectorResult};
use fedid_core::ClientCredentials;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, info};
use url::Url;

/// Flat attribute-name to attribute-value mapping parsed from the
/// provider's user-info payload. May legitimately be empty.
pub type RawProfile = HashMap<String, String>;

/// Token endpoint response. Only `access_token` is validated; everything
/// else is carried raw for extension.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Performs the outbound network legs: token exchange and user-info fetch.
/// Also builds the authorization redirect URL.
///
/// One instance is shared across concurrent attempts; it holds no
/// per-attempt state. Both network calls are bounded by the connect/read
/// timeouts from the provider config and are never retried.
#[derive(Clone)]
pub struct OAuth2Client {
    http: reqwest::Client,
}

impl OAuth2Client {
    pub fn new(config: &EndpointConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self { http }
    }

    /// Builds the authorization redirect URL for the outbound leg.
    ///
    /// The provider's scope string is a pre-encoded query fragment and is
    /// appended to the composed URL verbatim, so its percent-encoding
    /// survives untouched.
    pub fn authorization_url(
        &self,
        config: &EndpointConfig,
        credentials: &ClientCredentials,
        state: &str,
    ) -> ConnectorResult<String> {
        let mut url = Url::parse(&config.authorization_endpoint).map_err(|e| {
            ConnectorError::RequestBuild(format!("malformed authorization endpoint: {e}"))
        })?;

        {
            let mut params = url.query_pairs_mut();
            params.append_pair("client_id", &credentials.client_id);
            params.append_pair("redirect_uri", &credentials.callback_url);
            params.append_pair("response_type", "code");
            params.append_pair("state", state);
        }

        let mut location = url.to_string();
        if !config.scope.is_empty() {
            if !config.scope.starts_with('&') {
                location.push('&');
            }
            location.push_str(&config.scope);
        }

        debug!(provider = %config.name, "built authorization redirect");
        Ok(location)
    }

    /// Exchanges an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        config: &EndpointConfig,
        credentials: &ClientCredentials,
        code: &str,
    ) -> ConnectorResult<TokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("redirect_uri", credentials.callback_url.as_str()),
            ("code", code),
        ];

        let response = self
            .http
            .post(&config.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(ConnectorError::token_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider = %config.name, %status, "token endpoint rejected the exchange");
            return Err(ConnectorError::token_exchange(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            ConnectorError::TokenExchange {
                reason: "token response could not be parsed".to_string(),
                source: Some(e),
            }
        })?;

        if token.access_token.is_empty() {
            return Err(ConnectorError::token_exchange(
                "provider response carried no access token",
            ));
        }

        info!(provider = %config.name, "exchanged authorization code for access token");
        Ok(token)
    }

    /// Fetches the raw profile from the user-info endpoint.
    ///
    /// The access token travels as the `oauth2_access_token` query
    /// parameter, not an Authorization header, matching the provider's
    /// wire behavior. A `{}` body yields an empty profile, not an error.
    pub async fn fetch_user_info(
        &self,
        config: &EndpointConfig,
        access_token: &str,
    ) -> ConnectorResult<RawProfile> {
        let mut url = Url::parse(&config.userinfo_endpoint).map_err(|e| {
            ConnectorError::user_info(format!("malformed user info endpoint: {e}"))
        })?;
        url.query_pairs_mut()
            .append_pair("oauth2_access_token", access_token);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ConnectorError::user_info_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            error!(provider = %config.name, %status, "user info request failed");
            return Err(ConnectorError::user_info(format!(
                "user info endpoint returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(ConnectorError::user_info_transport)?;

        let payload: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            ConnectorError::user_info(format!("response body is not valid JSON: {e}"))
        })?;
        let object = payload.as_object().ok_or_else(|| {
            ConnectorError::user_info("response body is not a JSON object")
        })?;

        let profile: RawProfile = object
            .iter()
            .map(|(key, value)| (key.clone(), coerce_attribute(value)))
            .collect();

        debug!(provider = %config.name, attributes = profile.len(), "retrieved user info");
        Ok(profile)
    }
}

/// Non-string attribute values are coerced rather than dropped: strings
/// come through verbatim, everything else as its compact JSON rendering.
fn coerce_attribute(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
