//! Per-case outcomes and the aggregated suite report.

use crate::cases::{ContractCase, Operation};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Result of running one case.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    /// Case that ran
    pub case: ContractCase,
    /// Failure description, `None` when the case passed
    pub failure: Option<String>,
    /// Wall-clock time spent in the case, fixtures included
    pub elapsed: Duration,
}

impl CaseOutcome {
    /// Passing outcome.
    #[must_use]
    pub const fn passed(case: ContractCase, elapsed: Duration) -> Self {
        Self {
            case,
            failure: None,
            elapsed,
        }
    }

    /// Failing outcome.
    #[must_use]
    pub fn failed(case: ContractCase, reason: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            case,
            failure: Some(reason.into()),
            elapsed,
        }
    }

    /// Whether the case passed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Operation the case exercised.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.case.operation()
    }
}

/// Outcome of a whole suite run.
#[derive(Debug, Clone)]
pub struct SuiteReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Target base URL
    pub base_url: String,
    /// Whether every case passed
    pub ok: bool,
    /// Human-readable summary
    pub summary: String,
    /// Outcomes in execution order
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    /// Aggregate outcomes.
    #[must_use]
    pub fn from_outcomes(started_at: DateTime<Utc>, base_url: impl Into<String>, outcomes: Vec<CaseOutcome>) -> Self {
        let ok = outcomes.iter().all(CaseOutcome::is_success);
        let passed = outcomes.iter().filter(|o| o.is_success()).count();
        let summary = if ok {
            format!("All {} contract cases passed", outcomes.len())
        } else {
            let failed: Vec<_> = outcomes
                .iter()
                .filter(|o| !o.is_success())
                .map(|o| o.case.name())
                .collect();
            format!(
                "{passed}/{} contract cases passed; failed: {}",
                outcomes.len(),
                failed.join(", ")
            )
        };

        Self {
            started_at,
            base_url: base_url.into(),
            ok,
            summary,
            outcomes,
        }
    }

    /// Failing outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Outcome of a specific case, if it ran.
    #[must_use]
    pub fn outcome(&self, case: ContractCase) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|o| o.case == case)
    }

    /// Outcomes for one operation.
    pub fn for_operation(&self, operation: Operation) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(move |o| o.operation() == operation)
    }
}
