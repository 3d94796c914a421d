//! Resolver configuration.

use super::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resolver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Destination port used for every nameserver.
    pub port: u16,

    /// Per-attempt query timeout (milliseconds).
    pub timeout_ms: u64,

    /// Retransmissions after a timeout.
    pub retries: u32,

    /// Maximum CNAME indirection level.
    pub max_indirection: usize,

    /// Maximum number of servers contacted by one walk from the root.
    pub max_referral_depth: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            port: 53,
            timeout_ms: 5000,
            retries: 1,
            max_indirection: 10,
            max_referral_depth: 30,
        }
    }
}

impl ResolverSettings {
    /// Returns the query timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(invalid("resolver.port", "must be non-zero"));
        }

        if self.timeout_ms == 0 {
            return Err(invalid("resolver.timeout_ms", "must be non-zero"));
        }

        if self.max_indirection == 0 {
            return Err(invalid("resolver.max_indirection", "must be at least 1"));
        }

        if self.max_referral_depth == 0 {
            return Err(invalid("resolver.max_referral_depth", "must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}
