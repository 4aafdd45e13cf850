//! Controller configuration.

use std::time::Duration;

/// Settings for a [`SessionController`](crate::SessionController).
///
/// Start from `ControllerConfig::default()` and override what you need.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// How long a single login or refresh call may take before it counts
    /// as a network failure.
    ///
    /// Default: 15 seconds. The controller never retries on its own; a
    /// timed-out call is reported and the UI decides what happens next.
    pub gateway_timeout: Duration,
}

impl ControllerConfig {
    /// Overrides the gateway timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = timeout;
        self
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            gateway_timeout: Duration::from_secs(15),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_fifteen_seconds() {
        assert_eq!(
            ControllerConfig::default().gateway_timeout,
            Duration::from_secs(15)
        );
    }

    #[test]
    fn test_with_timeout_overrides() {
        let config =
            ControllerConfig::default().with_timeout(Duration::from_millis(250));
        assert_eq!(config.gateway_timeout, Duration::from_millis(250));
    }
}
