//! Connector error taxonomy.

use thiserror::Error;

pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Failures internal to the OAuth2 flow. Each is fatal for the current
/// attempt; nothing here is retried. The orchestration layer wraps every
/// variant into the caller-facing `AuthenticationFailed`.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The outbound authorization request could not be constructed, e.g.
    /// a malformed endpoint URL.
    #[error("failed to build authorization request: {0}")]
    RequestBuild(String),

    /// The token endpoint rejected the code, the transport failed, or the
    /// call timed out.
    #[error("token exchange failed: {reason}")]
    TokenExchange {
        reason: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The user-info endpoint could not be reached or its response could
    /// not be understood.
    #[error("user info fetch failed: {reason}")]
    UserInfoFetch {
        reason: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// A syntactically successful fetch resolved zero attributes.
    #[error("no claims resolved for the authenticated user")]
    EmptyClaims,
}

impl ConnectorError {
    pub(crate) fn token_exchange(reason: impl Into<String>) -> Self {
        Self::TokenExchange {
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn token_transport(err: reqwest::Error) -> Self {
        Self::TokenExchange {
            reason: if err.is_timeout() {
                "token endpoint request timed out".to_string()
            } else {
                "token endpoint request failed".to_string()
            },
            source: Some(err),
        }
    }

    pub(crate) fn user_info(reason: impl Into<String>) -> Self {
        Self::UserInfoFetch {
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn user_info_transport(err: reqwest::Error) -> Self {
        Self::UserInfoFetch {
            reason: if err.is_timeout() {
                "user info request timed out".to_string()
            } else {
                "user info request failed".to_string()
            },
            source: Some(err),
        }
    }
}
