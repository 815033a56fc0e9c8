//! LinkedIn provider preset.

use crate::config::EndpointConfig;
use crate::provider::OAuth2Authenticator;

pub const AUTHORIZATION_ENDPOINT: &str = "https://www.linkedin.com/uas/oauth2/authorization";
pub const TOKEN_ENDPOINT: &str = "https://www.linkedin.com/uas/oauth2/accessToken";
pub const USERINFO_ENDPOINT: &str =
    "https://api.linkedin.com/v1/people/~:(id,first-name,last-name,industry,headline,email-address)?format=json";

/// Pre-encoded scope fragment appended to the authorization redirect.
pub const SCOPE: &str = "scope=r_basicprofile%20r_emailaddress";

/// Tag embedded in the state parameter to route callbacks here.
pub const LOGIN_TYPE: &str = "linkedin";

/// URI prefix for every claim this provider produces.
pub const CLAIM_DIALECT: &str = "http://fedid.dev/linkedin/claims";

/// LinkedIn endpoint configuration with the provider's 15 second
/// connect/read timeouts.
pub fn endpoint_config() -> EndpointConfig {
    EndpointConfig::new("LinkedIn", LOGIN_TYPE)
        .with_friendly_name("LinkedIn Authenticator")
        .with_authorization_endpoint(AUTHORIZATION_ENDPOINT)
        .with_token_endpoint(TOKEN_ENDPOINT)
        .with_userinfo_endpoint(USERINFO_ENDPOINT)
        .with_scope(SCOPE)
        .with_claim_dialect(CLAIM_DIALECT)
}

/// Ready-made LinkedIn authenticator.
pub fn authenticator() -> OAuth2Authenticator {
    OAuth2Authenticator::new(endpoint_config())
}
