//! Configuration errors for state machine construction.

use crate::validation::ConfigViolation;
use thiserror::Error;

/// A state machine configuration was rejected.
///
/// Carries every violation found, not only the first one.
#[derive(Debug, Error)]
#[error("Invalid state machine configuration: {}", describe(.violations))]
pub struct ConfigError {
    violations: Vec<ConfigViolation>,
}

impl ConfigError {
    pub(crate) fn new(violations: Vec<ConfigViolation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[ConfigViolation] {
        &self.violations
    }
}

fn describe(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_lists_every_violation() {
        let err = ConfigError::new(vec![
            ConfigViolation::MissingSourceCallback {
                state: "Idle".to_string(),
            },
            ConfigViolation::MissingCommonHandler { count: 2 },
        ]);

        let message = err.to_string();
        assert!(message.contains("'Idle' is the source of a transition"));
        assert!(message.contains("2 common event(s)"));
        assert_eq!(err.violations().len(), 2);
    }
}
