//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics and returns every
//! problem found, not just the first one.

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::{FailoverSettings, RegionConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("region name must not be empty")]
    EmptyName,

    #[error("duplicate region name '{0}'")]
    DuplicateName(String),

    #[error("region '{name}' has invalid origin '{origin}': {reason}")]
    InvalidOrigin {
        name: String,
        origin: String,
        reason: String,
    },

    #[error("region '{name}': {field} must be greater than zero")]
    ZeroTimeout { name: String, field: &'static str },

    #[error("failover.{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &FailoverSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for region in std::iter::once(&config.primary).chain(config.backups.iter()) {
        validate_region(region, &mut errors);
        if !region.name.is_empty() && !seen.insert(region.name.as_str()) {
            errors.push(ValidationError::DuplicateName(region.name.clone()));
        }
    }

    if config.failover.sweep_deadline_secs == 0 {
        errors.push(ValidationError::ZeroInterval("sweep_deadline_secs"));
    }
    if config.failover.probe_interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval("probe_interval_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_region(region: &RegionConfig, errors: &mut Vec<ValidationError>) {
    if region.name.is_empty() {
        errors.push(ValidationError::EmptyName);
    }

    match Url::parse(&region.origin) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidOrigin {
            name: region.name.clone(),
            origin: region.origin.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidOrigin {
            name: region.name.clone(),
            origin: region.origin.clone(),
            reason: e.to_string(),
        }),
    }

    if region.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            name: region.name.clone(),
            field: "connect_timeout_secs",
        });
    }
    if region.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            name: region.name.clone(),
            field: "request_timeout_secs",
        });
    }
}
