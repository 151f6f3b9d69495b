use serde::Serialize;

use crate::common::format::format_thousands;
use crate::error::Result;
use crate::models::ModelSpec;

/// Progress state shown next to the budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Active,
    Exception,
}

/// Token usage of the assembled prompt against a model's budget.
///
/// Always derived from current state, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    pub files_token_used: usize,
    pub instruction_token_used: usize,
    pub template_token_used: usize,
    pub total_token_used: usize,
    pub max_tokens: u64,
    pub utilization: f64,
    pub status: BudgetStatus,
}

impl Budget {
    pub fn compute(
        model: &ModelSpec,
        files_token_used: usize,
        instruction_token_used: usize,
        template_token_used: usize,
    ) -> Result<Self> {
        model.validate()?;

        let total_token_used = files_token_used + instruction_token_used + template_token_used;
        let utilization = 100.0 * total_token_used as f64 / model.max_tokens as f64;
        let status = if total_token_used as u64 >= model.max_tokens {
            BudgetStatus::Exception
        } else {
            BudgetStatus::Active
        };

        Ok(Self {
            files_token_used,
            instruction_token_used,
            template_token_used,
            total_token_used,
            max_tokens: model.max_tokens,
            utilization,
            status,
        })
    }

    /// Utilization has reached 100 %; generating must be refused.
    pub fn is_exhausted(&self) -> bool {
        self.status == BudgetStatus::Exception
    }

    pub fn can_submit(&self) -> bool {
        !self.is_exhausted()
    }

    pub fn remaining(&self) -> u64 {
        self.max_tokens.saturating_sub(self.total_token_used as u64)
    }

    pub fn summary(&self, model_name: &str) -> String {
        format!(
            "Token used: {} / {} ({model_name})",
            format_thousands(self.total_token_used as u64),
            format_thousands(self.max_tokens)
        )
    }
}
