// * Sequential suite runner: probe each case, verify, report.

use crate::engine::cases::RedirectCase;
use crate::engine::verify::verify;
use crate::network::client::RedirectProber;
use crate::ops::telemetry;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CaseOutcome {
    Passed,
    // * Server answered, but not as expected
    Failed(String),
    // * Could not get an answer (network, timeout, bad URL)
    Errored(String),
}

impl CaseOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CaseOutcome::Passed => "passed",
            CaseOutcome::Failed(_) => "failed",
            CaseOutcome::Errored(_) => "errored",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub name: String,
    pub path: String,
    pub outcome: CaseOutcome,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub base_url: String,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub async fn run_case(prober: &RedirectProber, case: &RedirectCase) -> CaseReport {
    let started = Instant::now();
    let cookies = case.cookies();

    let outcome = match prober.probe_path(case.path, cookies.as_ref()).await {
        Ok(result) => match verify(&result, case.path, &case.expect) {
            Ok(()) => CaseOutcome::Passed,
            Err(e) => CaseOutcome::Failed(e.to_string()),
        },
        Err(e) => CaseOutcome::Errored(e.to_string()),
    };

    match &outcome {
        CaseOutcome::Passed => info!(case = case.name, path = case.path, "Case passed"),
        CaseOutcome::Failed(reason) | CaseOutcome::Errored(reason) => warn!(
            case = case.name,
            path = case.path,
            outcome = outcome.label(),
            reason = %reason,
            "Case did not pass"
        ),
    }
    telemetry::record_case(outcome.label());

    CaseReport {
        name: case.name.to_string(),
        path: case.path.to_string(),
        outcome,
        duration_ms: started.elapsed().as_millis() as u64,
    }
}

// * Cases run one at a time; no state is shared between them.
pub async fn run_suite(prober: &RedirectProber, cases: &[RedirectCase]) -> SuiteReport {
    let mut reports = Vec::with_capacity(cases.len());
    for case in cases {
        reports.push(run_case(prober, case).await);
    }

    let count = |label: &str| reports.iter().filter(|r| r.outcome.label() == label).count();
    let report = SuiteReport {
        base_url: prober.config().base_url.to_string(),
        passed: count("passed"),
        failed: count("failed"),
        errored: count("errored"),
        cases: reports,
    };

    info!(
        base_url = %report.base_url,
        passed = report.passed,
        failed = report.failed,
        errored = report.errored,
        "Suite finished"
    );

    report
}
