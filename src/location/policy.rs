//! Decides which place-search failures degrade to geocoding.

use crate::config::DegradeConfig;

/// Predicate over a provider failure `(status, message)`.
///
/// Returning `true` makes place search fall back to geocoding; `false` propagates
/// the failure to the caller unmodified.
pub trait DegradePolicy: Send + Sync {
    fn should_degrade(&self, status: i64, message: &str) -> bool;
}

impl<F> DegradePolicy for F
where
    F: Fn(i64, &str) -> bool + Send + Sync,
{
    fn should_degrade(&self, status: i64, message: &str) -> bool {
        self(status, message)
    }
}

/// Degrades when the endpoint is disabled or the key lacks permission.
///
/// The phrase list follows the provider's locale and is not exhaustive.
#[derive(Debug, Clone)]
pub struct AccessRestrictedPolicy {
    phrases: Vec<String>,
    statuses: Vec<i64>,
}

impl AccessRestrictedPolicy {
    pub fn new(phrases: Vec<String>, statuses: Vec<i64>) -> Self {
        Self { phrases, statuses }
    }

    pub fn from_config(config: &DegradeConfig) -> Self {
        Self::new(config.phrases.clone(), config.statuses.clone())
    }
}

impl Default for AccessRestrictedPolicy {
    fn default() -> Self {
        Self::from_config(&DegradeConfig::default())
    }
}

impl DegradePolicy for AccessRestrictedPolicy {
    fn should_degrade(&self, status: i64, message: &str) -> bool {
        self.statuses.contains(&status)
            || self
                .phrases
                .iter()
                .any(|phrase| !phrase.is_empty() && message.contains(phrase.as_str()))
    }
}
