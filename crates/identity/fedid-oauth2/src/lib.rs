//! OAuth2 authorization-code connector engine.
//!
//! This crate provides a generic OAuth2 authorization-code flow engine that
//! plugs an external identity provider into the fedid-core framework seams.
//! Each provider is a value: an [`EndpointConfig`] naming its endpoints,
//! scope, state tag, and claim dialect. The engine builds the authorization
//! redirect, exchanges the callback code for an access token, fetches the
//! raw profile, and normalizes it into the host's claim model.

mod claims;
mod client;
mod config;
mod error;
pub mod linkedin;
mod provider;
mod state;

#[cfg(test)]
mod tests;

pub use claims::{normalize, resolve_subject};
pub use client::{OAuth2Client, RawProfile, TokenResponse};
pub use config::EndpointConfig;
pub use error::{ConnectorError, ConnectorResult};
pub use provider::OAuth2Authenticator;
pub use state::{StateCodec, StateObfuscator};

// Re-export common types for convenience
pub use fedid_core::{
    AuthRequest, AuthenticationContext, AuthenticationFailed, ClaimSet, ClientCredentials,
    FederatedAuthenticator, ResolvedIdentity, ResponseSink,
};
