//! Normalization of raw provider attributes into the host claim model.

use crate::client::RawProfile;
use fedid_core::ClaimSet;

/// Namespaces every raw attribute under the provider's claim dialect.
///
/// Total and lossless: one claim per attribute, keyed
/// `<dialect>/<attribute>`, value unchanged. An empty profile yields an
/// empty claim set; emptiness is judged at the orchestration layer, not
/// here.
pub fn normalize(profile: &RawProfile, dialect: &str) -> ClaimSet {
    profile
        .iter()
        .map(|(key, value)| (format!("{dialect}/{key}"), value.clone()))
        .collect()
}

/// Resolves the subject identifier for a claim set.
///
/// A non-blank host-computed subject wins; otherwise the claim keyed
/// `<dialect>/id` is used. `None` when neither is available, passed
/// through to the caller rather than treated as an error here.
pub fn resolve_subject(
    claims: &ClaimSet,
    host_subject: Option<&str>,
    dialect: &str,
) -> Option<String> {
    match host_subject {
        Some(subject) if !subject.trim().is_empty() => Some(subject.to_string()),
        _ => claims.get(&format!("{dialect}/id")).cloned(),
    }
}
