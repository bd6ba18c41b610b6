use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ISSUES: usize = 1000;

/// How a validation run behaves once issues start to accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPlan {
    pub fail_fast: bool,
    pub max_issues: usize,
}

impl Default for ValidationPlan {
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_issues: DEFAULT_MAX_ISSUES,
        }
    }
}

impl ValidationPlan {
    pub fn builder() -> ValidationPlanBuilder {
        ValidationPlanBuilder {
            plan: Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_issues == 0 {
            return Err(ConfigError::ZeroMaxIssues);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ValidationPlanBuilder {
    plan: ValidationPlan,
}

impl ValidationPlanBuilder {
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.plan.fail_fast = fail_fast;
        self
    }

    pub fn max_issues(mut self, max_issues: usize) -> Self {
        self.plan.max_issues = max_issues;
        self
    }

    pub fn build(self) -> Result<ValidationPlan, ConfigError> {
        self.plan.validate()?;
        Ok(self.plan)
    }
}
