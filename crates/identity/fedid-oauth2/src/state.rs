//! Anti-forgery state encoding and provider routing.

use std::fmt;
use std::sync::Arc;

/// Caller-supplied obfuscation hook applied to the encoded state before it
/// leaves the process. Opaque to the connector.
pub type StateObfuscator = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Encodes the outbound state parameter and recognizes inbound ones.
///
/// The state binds the host's context identifier to this provider's
/// login-type tag so the callback can be routed back to the right
/// connector. Inbound checking is substring containment, not a structural
/// decode: other layers are free to augment the opaque value.
#[derive(Clone)]
pub struct StateCodec {
    login_type: String,
    obfuscator: Option<StateObfuscator>,
}

impl StateCodec {
    pub fn new(login_type: impl Into<String>) -> Self {
        Self {
            login_type: login_type.into(),
            obfuscator: None,
        }
    }

    pub fn with_obfuscator(mut self, obfuscator: StateObfuscator) -> Self {
        self.obfuscator = Some(obfuscator);
        self
    }

    pub fn login_type(&self) -> &str {
        &self.login_type
    }

    /// Encodes `context_id + "," + login_type`, then runs the obfuscation
    /// hook if one was supplied.
    pub fn encode(&self, context_id: &str) -> String {
        let state = format!("{},{}", context_id, self.login_type);
        match &self.obfuscator {
            Some(obfuscate) => obfuscate(&state),
            None => state,
        }
    }

    /// Whether an inbound state value belongs to this provider. Absent or
    /// empty state is never ours.
    pub fn is_for_provider(&self, state: Option<&str>) -> bool {
        match state {
            Some(state) if !state.is_empty() => state.contains(&self.login_type),
            _ => false,
        }
    }
}

impl fmt::Debug for StateCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCodec")
            .field("login_type", &self.login_type)
            .field("obfuscator", &self.obfuscator.is_some())
            .finish()
    }
}
