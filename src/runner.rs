//! Sequential runner
//!
//! A minimal host for generated cases: runs them one after another, never
//! concurrently, so cases of one spec can share its fault slot and hook flag.

use crate::config::RunnerConfig;
use crate::generation::Case;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseStatus {
    Passed,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub name: String,
    #[serde(flatten)]
    pub status: CaseStatus,
    pub duration_ms: u128,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub reports: Vec<CaseReport>,
    pub passed: usize,
    pub failed: usize,
    /// Cases excluded by the name filter
    pub filtered_out: usize,
    /// Cases never started because of fail-fast
    pub not_run: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.status, CaseStatus::Failed { .. }))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    #[instrument(skip_all, fields(case_count = cases.len()))]
    pub async fn run(&self, cases: &[Case]) -> RunSummary {
        let mut summary = RunSummary::default();
        let selected: Vec<&Case> = cases
            .iter()
            .filter(|case| match &self.config.filter {
                Some(filter) => case.name().contains(filter.as_str()),
                None => true,
            })
            .collect();
        summary.filtered_out = cases.len() - selected.len();

        for (index, case) in selected.iter().enumerate() {
            let start = Instant::now();
            let result = case.run().await;
            let duration_ms = start.elapsed().as_millis();

            let status = match result {
                Ok(()) => {
                    summary.passed += 1;
                    CaseStatus::Passed
                }
                Err(err) => {
                    summary.failed += 1;
                    warn!(case = %case.name().escape_debug(), error = %err, "Case failed");
                    CaseStatus::Failed {
                        message: err.to_string(),
                    }
                }
            };
            let failed = matches!(status, CaseStatus::Failed { .. });
            summary.reports.push(CaseReport {
                name: case.name().to_string(),
                status,
                duration_ms,
            });

            if failed && self.config.fail_fast {
                summary.not_run = selected.len() - index - 1;
                break;
            }
        }

        info!(
            passed = summary.passed,
            failed = summary.failed,
            filtered_out = summary.filtered_out,
            not_run = summary.not_run,
            "Run completed"
        );
        summary
    }

    /// Run on a fresh current-thread runtime, for hosts that are not async.
    pub fn run_blocking(&self, cases: &[Case]) -> std::io::Result<RunSummary> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.run(cases)))
    }
}
