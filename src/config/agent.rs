//! Agent loop configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Agent loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Maximum reason/act steps per run before the loop gives up
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl AgentConfig {
    /// Validate agent configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_steps == 0 || self.max_steps > 100 {
            return Err(ValidationError::InvalidStepBudget);
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
        }
    }
}

fn default_max_steps() -> usize {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_is_fifteen_steps() {
        assert_eq!(AgentConfig::default().max_steps, 15);
    }

    #[test]
    fn rejects_zero_and_runaway_budgets() {
        let config = AgentConfig { max_steps: 0 };
        assert!(config.validate().is_err());

        let config = AgentConfig { max_steps: 1000 };
        assert!(config.validate().is_err());
    }
}
