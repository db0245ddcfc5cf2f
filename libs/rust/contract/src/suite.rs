//! Sequential suite runner.

use crate::cases::ContractCase;
use crate::client::PostsClient;
use crate::report::{CaseOutcome, SuiteReport};
use chrono::Utc;
use posts_common::{ApiConfig, ClientResult};
use tokio::time::Instant;
use tracing::{info, info_span, warn, Instrument};

/// Runs contract cases one after another against a single server.
#[derive(Debug, Clone)]
pub struct ContractSuite {
    client: PostsClient,
}

impl ContractSuite {
    /// Create a suite for the given settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> ClientResult<Self> {
        Ok(Self {
            client: PostsClient::new(config)?,
        })
    }

    /// Client used by every case.
    #[must_use]
    pub const fn client(&self) -> &PostsClient {
        &self.client
    }

    /// Run one case and capture its outcome.
    pub async fn run_case(&self, case: ContractCase) -> CaseOutcome {
        let span = info_span!("contract_case", case = case.name(), operation = %case.operation());
        async {
            let started = Instant::now();
            let result = case.run(&self.client).await;
            let elapsed = started.elapsed();
            match result {
                Ok(()) => {
                    info!(elapsed_ms = elapsed.as_millis(), "Case passed");
                    CaseOutcome::passed(case, elapsed)
                }
                Err(e) => {
                    warn!(elapsed_ms = elapsed.as_millis(), error = %e, "Case failed");
                    CaseOutcome::failed(case, e.to_string(), elapsed)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run the given cases in order; a failure never stops the run.
    pub async fn run_cases<I>(&self, cases: I) -> SuiteReport
    where
        I: IntoIterator<Item = ContractCase>,
    {
        let started_at = Utc::now();
        let mut outcomes = Vec::new();
        for case in cases {
            outcomes.push(self.run_case(case).await);
        }

        let report = SuiteReport::from_outcomes(started_at, self.client.config().base_url.clone(), outcomes);
        if report.ok {
            info!(summary = %report.summary, "Contract suite finished");
        } else {
            warn!(summary = %report.summary, "Contract suite finished with failures");
        }
        report
    }

    /// Run the whole catalogue.
    pub async fn run_all(&self) -> SuiteReport {
        self.run_cases(ContractCase::ALL).await
    }
}
