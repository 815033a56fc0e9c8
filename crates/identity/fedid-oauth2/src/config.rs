//! Provider endpoint configuration.

use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(15);

/// Static facts about one identity provider. Created once at startup and
/// shared read-only across concurrent authentication attempts.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub name: String,
    pub friendly_name: String,
    /// Marker embedded in the state parameter to identify this provider's
    /// callbacks.
    pub login_type: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
    /// Pre-encoded scope query fragment, appended verbatim to the
    /// authorization URL (e.g. `scope=r_basicprofile%20r_emailaddress`).
    pub scope: String,
    /// URI prefix namespacing every claim this provider produces.
    pub claim_dialect: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl EndpointConfig {
    pub fn new(name: impl Into<String>, login_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            friendly_name: name.clone(),
            name,
            login_type: login_type.into(),
            authorization_endpoint: String::new(),
            token_endpoint: String::new(),
            userinfo_endpoint: String::new(),
            scope: String::new(),
            claim_dialect: String::new(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    pub fn with_friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = friendly_name.into();
        self
    }

    pub fn with_authorization_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.authorization_endpoint = endpoint.into();
        self
    }

    pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = endpoint.into();
        self
    }

    pub fn with_userinfo_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.userinfo_endpoint = endpoint.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_claim_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.claim_dialect = dialect.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}
