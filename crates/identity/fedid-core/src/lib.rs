//! Core traits and types for federated identity connectors.
//!
//! A connector authenticates end users against an external identity provider
//! and hands the host framework a resolved subject plus a namespaced claim
//! set. This crate defines the seams the host and the connectors share: the
//! claim model, the per-request authentication context, the inbound request
//! view, the redirect sink, and the caller-facing error type.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Claim URI to value. Local and remote claim URIs are identical in this
/// model, so a single map carries the whole mapping.
pub type ClaimSet = HashMap<String, String>;

/// Caller-facing authentication failure. Every internal error is wrapped
/// into this single kind with the original cause chained for diagnostics.
#[derive(Debug, Error)]
#[error("authentication failed: {message}")]
pub struct AuthenticationFailed {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AuthenticationFailed {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type AuthResult<T> = Result<T, AuthenticationFailed>;

/// Terminal artifact of a successful flow, written into the caller's
/// authentication context. Never persisted by the connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    pub subject: String,
    pub claims: ClaimSet,
}

/// Per-tenant relying-party credentials, supplied by the host's
/// configuration registry. Read-only to connectors.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// Descriptor for one entry of a connector's configuration surface, exposed
/// to the host's property registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorProperty {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub required: bool,
    pub confidential: bool,
    pub display_order: u32,
}

impl ConnectorProperty {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: String::new(),
            required: false,
            confidential: false,
            display_order: 0,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn confidential(mut self) -> Self {
        self.confidential = true;
        self
    }

    pub fn display_order(mut self, order: u32) -> Self {
        self.display_order = order;
        self
    }
}

/// Narrow view over the query parameters of an inbound relying-party
/// request. The connector never sees the rest of the request.
#[derive(Debug, Clone, Default)]
pub struct AuthRequest {
    params: HashMap<String, String>,
}

impl AuthRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The OAuth2 authorization code, if the provider sent one back.
    pub fn code(&self) -> Option<&str> {
        self.param("code")
    }

    /// The opaque anti-forgery state round-tripped through the provider.
    pub fn state(&self) -> Option<&str> {
        self.param("state")
    }

    /// Protocol-level error signaled by the provider instead of a code.
    pub fn oauth_error(&self) -> Option<&str> {
        self.param("error")
    }

    pub fn oauth_error_description(&self) -> Option<&str> {
        self.param("error_description")
    }
}

/// Host-provided "subject from claims" hook. May return `None` when the
/// host has no mapping configured; connectors then fall back to their own
/// default subject claim.
pub type SubjectResolver = Arc<dyn Fn(&ClaimSet) -> Option<String> + Send + Sync>;

/// Per-attempt mutable carrier, explicitly passed through the flow. The
/// connector only ever reads and writes through this handle.
pub trait AuthenticationContext: Send {
    /// Opaque correlation identifier for this authentication attempt.
    fn context_identifier(&self) -> &str;

    /// Relying-party credentials for the tenant, if configured.
    fn credentials(&self) -> Option<&ClientCredentials>;

    /// Runs the host's subject-from-claims resolution, if any.
    fn resolve_subject(&self, claims: &ClaimSet) -> Option<String>;

    /// Attaches the resolved identity to this attempt.
    fn set_subject(&mut self, identity: ResolvedIdentity);

    fn subject(&self) -> Option<&ResolvedIdentity>;
}

/// In-memory [`AuthenticationContext`] for hosts and tests.
#[derive(Default)]
pub struct SimpleContext {
    context_id: String,
    credentials: Option<ClientCredentials>,
    subject_resolver: Option<SubjectResolver>,
    subject: Option<ResolvedIdentity>,
}

impl SimpleContext {
    pub fn new(context_id: impl Into<String>) -> Self {
        Self {
            context_id: context_id.into(),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, credentials: ClientCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_subject_resolver(mut self, resolver: SubjectResolver) -> Self {
        self.subject_resolver = Some(resolver);
        self
    }
}

impl AuthenticationContext for SimpleContext {
    fn context_identifier(&self) -> &str {
        &self.context_id
    }

    fn credentials(&self) -> Option<&ClientCredentials> {
        self.credentials.as_ref()
    }

    fn resolve_subject(&self, claims: &ClaimSet) -> Option<String> {
        self.subject_resolver.as_ref().and_then(|f| f(claims))
    }

    fn set_subject(&mut self, identity: ResolvedIdentity) {
        self.subject = Some(identity);
    }

    fn subject(&self) -> Option<&ResolvedIdentity> {
        self.subject.as_ref()
    }
}

/// The one piece of the host's dispatch plumbing a connector touches:
/// issuing the redirect that starts the provider leg of the flow.
pub trait ResponseSink: Send {
    fn redirect(&mut self, location: &str) -> io::Result<()>;
}

/// [`ResponseSink`] that records the redirect location instead of sending
/// it anywhere.
#[derive(Debug, Default)]
pub struct RedirectCapture {
    pub location: Option<String>,
}

impl ResponseSink for RedirectCapture {
    fn redirect(&mut self, location: &str) -> io::Result<()> {
        self.location = Some(location.to_string());
        Ok(())
    }
}

/// A federated authenticator the host framework can route requests to.
///
/// The host calls [`can_handle`](FederatedAuthenticator::can_handle) on each
/// request; on the first pass it calls `initiate` to emit the provider
/// redirect, on the callback pass it calls `process` to finish the attempt.
#[async_trait]
pub trait FederatedAuthenticator: Send + Sync {
    fn name(&self) -> &str;

    fn friendly_name(&self) -> &str;

    /// URI prefix namespacing every claim this connector produces.
    fn claim_dialect_uri(&self) -> &str;

    fn configuration_properties(&self) -> Vec<ConnectorProperty>;

    /// Whether the inbound request is this connector's callback. `false`
    /// means "not mine", never an error.
    fn can_handle(&self, request: &AuthRequest) -> bool;

    /// Builds the authorization redirect and writes it to `sink`.
    async fn initiate(
        &self,
        request: &AuthRequest,
        sink: &mut dyn ResponseSink,
        context: &mut dyn AuthenticationContext,
    ) -> AuthResult<()>;

    /// Processes the provider callback and attaches the resolved identity
    /// to `context`. Leaves the context untouched on failure.
    async fn process(
        &self,
        request: &AuthRequest,
        context: &mut dyn AuthenticationContext,
    ) -> AuthResult<()>;
}
