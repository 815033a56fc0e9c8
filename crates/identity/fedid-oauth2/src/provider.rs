//! Flow orchestration: the host-facing authenticator.

use crate::claims;
use crate::client::OAuth2Client;
use crate::config::EndpointConfig;
use crate::error::ConnectorError;
use crate::state::{StateCodec, StateObfuscator};
use async_trait::async_trait;
use fedid_core::{
    AuthRequest, AuthResult, AuthenticationContext, AuthenticationFailed, ConnectorProperty,
    FederatedAuthenticator, ResolvedIdentity, ResponseSink,
};
use tracing::{debug, info};

/// Generic OAuth2 authorization-code authenticator, parameterized by an
/// [`EndpointConfig`]. Each provider is a value, not a subclass.
///
/// Drives one attempt through IDLE -> REDIRECT_ISSUED (via `initiate`) ->
/// CALLBACK_PROCESSED (via `process`, succeeded or failed, both terminal).
/// Holds no per-attempt state of its own; everything attempt-local travels
/// through the passed context.
pub struct OAuth2Authenticator {
    endpoints: EndpointConfig,
    state: StateCodec,
    client: OAuth2Client,
    properties: Vec<ConnectorProperty>,
}

impl OAuth2Authenticator {
    pub fn new(endpoints: EndpointConfig) -> Self {
        let client = OAuth2Client::new(&endpoints);
        let state = StateCodec::new(endpoints.login_type.clone());

        Self {
            endpoints,
            state,
            client,
            properties: standard_properties(),
        }
    }

    /// Installs the host's state-obfuscation hook.
    pub fn with_state_obfuscator(mut self, obfuscator: StateObfuscator) -> Self {
        self.state = self.state.with_obfuscator(obfuscator);
        self
    }

    /// Replaces the configuration surface exposed to the host registry.
    pub fn with_properties(mut self, properties: Vec<ConnectorProperty>) -> Self {
        self.properties = properties;
        self
    }

    pub fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }
}

/// The three properties every relying party must configure: client
/// identifier, client secret, and callback URL.
pub(crate) fn standard_properties() -> Vec<ConnectorProperty> {
    vec![
        ConnectorProperty::new("ClientId", "Client Id")
            .description("Enter the IDP client identifier value")
            .required()
            .display_order(0),
        ConnectorProperty::new("ClientSecret", "Client Secret")
            .description("Enter the IDP client secret value")
            .required()
            .confidential()
            .display_order(1),
        ConnectorProperty::new("callbackUrl", "Callback URL")
            .description("Enter value corresponding to callback URL")
            .required()
            .display_order(2),
    ]
}

#[async_trait]
impl FederatedAuthenticator for OAuth2Authenticator {
    fn name(&self) -> &str {
        &self.endpoints.name
    }

    fn friendly_name(&self) -> &str {
        &self.endpoints.friendly_name
    }

    fn claim_dialect_uri(&self) -> &str {
        &self.endpoints.claim_dialect
    }

    fn configuration_properties(&self) -> Vec<ConnectorProperty> {
        self.properties.clone()
    }

    fn can_handle(&self, request: &AuthRequest) -> bool {
        debug!(provider = %self.endpoints.name, "checking whether code and state exist");
        request.code().is_some() && self.state.is_for_provider(request.state())
    }

    async fn initiate(
        &self,
        _request: &AuthRequest,
        sink: &mut dyn ResponseSink,
        context: &mut dyn AuthenticationContext,
    ) -> AuthResult<()> {
        let credentials = context
            .credentials()
            .ok_or_else(|| {
                AuthenticationFailed::new(
                    "authenticator properties obtained from the authentication context are missing",
                )
            })?
            .clone();

        let state = self.state.encode(context.context_identifier());
        let location = self
            .client
            .authorization_url(&self.endpoints, &credentials, &state)
            .map_err(|e| {
                AuthenticationFailed::with_source("failed to build the authorization request", e)
            })?;

        sink.redirect(&location).map_err(|e| {
            AuthenticationFailed::with_source("failed to send the redirect response", e)
        })?;

        info!(provider = %self.endpoints.name, "issued authorization redirect");
        Ok(())
    }

    async fn process(
        &self,
        request: &AuthRequest,
        context: &mut dyn AuthenticationContext,
    ) -> AuthResult<()> {
        if let Some(error) = request.oauth_error() {
            let description = request.oauth_error_description().unwrap_or("no description");
            return Err(AuthenticationFailed::new(format!(
                "provider signaled an authorization error: {error}: {description}"
            )));
        }

        let code = request
            .code()
            .ok_or_else(|| AuthenticationFailed::new("callback carried no authorization code"))?;

        let credentials = context
            .credentials()
            .ok_or_else(|| {
                AuthenticationFailed::new(
                    "authenticator properties obtained from the authentication context are missing",
                )
            })?
            .clone();

        let token = self
            .client
            .exchange_code(&self.endpoints, &credentials, code)
            .await
            .map_err(|e| AuthenticationFailed::with_source("token exchange failed", e))?;

        let profile = self
            .client
            .fetch_user_info(&self.endpoints, &token.access_token)
            .await
            .map_err(|e| AuthenticationFailed::with_source("user info fetch failed", e))?;

        let claims = claims::normalize(&profile, &self.endpoints.claim_dialect);
        if claims.is_empty() {
            return Err(AuthenticationFailed::with_source(
                "claims for the user not found",
                ConnectorError::EmptyClaims,
            ));
        }

        let host_subject = context.resolve_subject(&claims);
        let subject = claims::resolve_subject(
            &claims,
            host_subject.as_deref(),
            &self.endpoints.claim_dialect,
        )
        .unwrap_or_default();

        context.set_subject(ResolvedIdentity { subject, claims });

        info!(provider = %self.endpoints.name, "authentication attempt succeeded");
        Ok(())
    }
}
