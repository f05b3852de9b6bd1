//! Execution parameters: turn loop control.
//!
//! [`ExecutionParams`] groups the static parameters that bound a single turn
//! in [`RunTurnUseCase`](crate::use_cases::run_turn::RunTurnUseCase). These
//! are application-layer concerns, not domain policy.

use lmagent_domain::AgentConfig;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionParams {
    /// Maximum model rounds in one native tool-calling turn.
    pub max_tool_rounds: usize,
    /// Time limit for one shell command.
    pub command_timeout: Duration,
    /// Intercept `!` commands instead of sending them to the model.
    pub dev_mode: bool,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_tool_rounds: 3,
            command_timeout: Duration::from_secs(30),
            dev_mode: false,
        }
    }
}

impl ExecutionParams {
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            max_tool_rounds: config.max_tool_rounds,
            command_timeout: Duration::from_secs(config.command_timeout_secs),
            dev_mode: config.dev_mode,
        }
    }

    pub fn with_dev_mode(mut self, enabled: bool) -> Self {
        self.dev_mode = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = AgentConfig {
            max_tool_rounds: 5,
            command_timeout_secs: 10,
            dev_mode: true,
            ..Default::default()
        };
        let params = ExecutionParams::from_config(&config);
        assert_eq!(params.max_tool_rounds, 5);
        assert_eq!(params.command_timeout, Duration::from_secs(10));
        assert!(params.dev_mode);
    }

    #[test]
    fn test_defaults_match_config_defaults() {
        assert_eq!(
            ExecutionParams::default(),
            ExecutionParams::from_config(&AgentConfig::default())
        );
    }
}
