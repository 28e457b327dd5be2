//! The test orchestrator.
//!
//! Validates a submission, resolves its entry point, wraps it in a generated
//! driver, dispatches the driver to the right execution backend, and parses
//! the driver's verdicts. Every failure mode folds into the report envelope;
//! `run_tests` neither panics nor errors on untrusted input.

use crate::backend::{LocalBackend, RemoteBackend};
use crate::driver::{generator_for, DriverRequest};
use crate::error::HarnessError;
use crate::language::{ExecutionMode, Language};
use crate::model::{ExecutionOutcome, RunReport, RunRequest, TestResult};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Wall-clock budget for one driver run. For remote runs this bounds the
/// whole exchange, compile stage included.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(15);

pub struct Harness {
    local: LocalBackend,
    remote: RemoteBackend,
}

impl Harness {
    pub fn new(local: LocalBackend, remote: RemoteBackend) -> Self {
        Self { local, remote }
    }

    /// Runs a submission against its test cases and reports per-case
    /// verdicts in test case order.
    pub async fn run_tests(&self, request: &RunRequest) -> RunReport {
        match self.try_run(request).await {
            Ok(results) => RunReport::completed(results),
            Err(err) => {
                warn!("run failed: {err}");
                RunReport::failed(&err)
            }
        }
    }

    async fn try_run(&self, request: &RunRequest) -> Result<Vec<TestResult>, HarnessError> {
        let language: Language = request.language.parse()?;
        if request.test_cases.is_empty() {
            return Err(HarnessError::NoTestCases);
        }

        let profile = language.profile();
        let entry_point = match &request.function_name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => profile
                .extract_entry_point(&request.user_code)
                .ok_or(HarnessError::UnknownEntryPoint(language))?,
        };
        debug!("resolved entry point '{entry_point}'");

        let driver = generator_for(language).generate(&DriverRequest {
            user_code: &request.user_code,
            setup_code: request.setup_code.as_deref(),
            entry_point: &entry_point,
            test_cases: &request.test_cases,
        });

        let outcome = match profile.mode {
            ExecutionMode::Local => self.local.execute(language, &driver, RUN_TIMEOUT).await,
            ExecutionMode::Remote => self.remote.execute(profile, &driver, RUN_TIMEOUT).await,
        };

        if outcome.timed_out {
            return Err(HarnessError::ExecuteTimeout(RUN_TIMEOUT));
        }
        if !outcome.success {
            return Err(HarnessError::Transport(describe_failure(&outcome)));
        }

        let results = parse_driver_report(&outcome.stdout)?;
        if results.len() != request.test_cases.len() {
            return Err(HarnessError::ResultCount {
                expected: request.test_cases.len(),
                got: results.len(),
            });
        }

        info!(
            "{} of {} test cases passed in {}ms",
            results.iter().filter(|result| result.passed).count(),
            results.len(),
            outcome.execution_time_ms
        );
        Ok(results)
    }
}

/// Extracts the verdict list from driver stdout.
///
/// Submissions may print freely around the driver's report line (a timer
/// callback can fire after it), so the last `[` that starts a parseable
/// result array wins and anything following the array is ignored.
pub fn parse_driver_report(stdout: &str) -> Result<Vec<TestResult>, HarnessError> {
    let starts: Vec<usize> = stdout
        .char_indices()
        .filter(|(_, ch)| *ch == '[')
        .map(|(index, _)| index)
        .collect();

    for start in starts.into_iter().rev() {
        let mut stream = serde_json::Deserializer::from_str(&stdout[start..])
            .into_iter::<Vec<TestResult>>();
        if let Some(Ok(results)) = stream.next() {
            return Ok(results);
        }
    }

    Err(HarnessError::UnparsableOutput(if stdout.trim().is_empty() {
        "the driver produced no output".to_string()
    } else {
        "no result array found in the driver output".to_string()
    }))
}

fn describe_failure(outcome: &ExecutionOutcome) -> String {
    let mut detail = outcome
        .error
        .clone()
        .unwrap_or_else(|| "the driver did not finish".to_string());
    if let Some(line) = outcome.stderr.lines().find(|line| !line.trim().is_empty()) {
        detail.push_str(": ");
        detail.push_str(line.trim());
    }
    detail
}

#[cfg(test)]
fn test_harness() -> Harness {
    use crate::runtime::PythonRuntime;

    Harness::new(
        LocalBackend::new("/tmp", PythonRuntime::system()),
        // never reached by the hermetic tests
        RemoteBackend::new("http://127.0.0.1:1"),
    )
}

#[cfg(test)]
fn request(language: &str, code: &str, cases: serde_json::Value) -> RunRequest {
    RunRequest {
        language: language.to_string(),
        user_code: code.to_string(),
        function_name: None,
        test_cases: serde_json::from_value(cases).expect("test cases are well formed"),
        setup_code: None,
    }
}





#[cfg(all(test, feature = "python"))]
mod run_tests_python {
    use super::{request, test_harness};
    use serde_json::json;

    #[tokio::test]
    async fn the_two_sum_bank_passes() {
        let report = test_harness()
            .run_tests(&request(
                "python",
                "def two_sum(nums, target):\n    seen = {}\n    for i, n in enumerate(nums):\n        if target - n in seen:\n            return [seen[target - n], i]\n        seen[n] = i\n    return []",
                json!([
                    { "input": [[2, 7, 11, 15], 9], "expected": [0, 1] },
                    { "input": [[3, 2, 4], 6], "expected": [1, 2] },
                    { "input": [[3, 3], 6], "expected": [0, 1] },
                    { "input": [[1, 5, 9, 13], 22], "expected": [2, 3] }
                ]),
            ))
            .await;

        assert!(report.success, "report: {:?}", report.error);
        assert_eq!(report.results.len(), 4);
        assert!(report.results.iter().all(|result| result.passed));
        assert_eq!(report.results[0].actual.as_deref(), Some("[0,1]"));
    }

    #[tokio::test]
    async fn a_raising_case_fails_alone() {
        let report = test_harness()
            .run_tests(&request(
                "python",
                "def risky(x):\n    if x == 0:\n        raise ValueError(\"zero is not allowed\")\n    return x",
                json!([
                    { "input": [1], "expected": 1 },
                    { "input": [0], "expected": 0 },
                    { "input": [2], "expected": 2 }
                ]),
            ))
            .await;

        assert!(report.success, "report: {:?}", report.error);
        assert!(report.results[0].passed);
        assert_eq!(
            report.results[1].error.as_deref(),
            Some("zero is not allowed")
        );
        assert!(report.results[2].passed);
    }

    #[tokio::test]
    async fn booleans_and_none_compare_canonically() {
        let report = test_harness()
            .run_tests(&request(
                "python",
                "def classify(x):\n    if x > 0:\n        return True\n    if x < 0:\n        return False\n    return None",
                json!([
                    { "input": [5], "expected": true },
                    { "input": [-5], "expected": false },
                    { "input": [0], "expected": null }
                ]),
            ))
            .await;

        assert!(report.success, "report: {:?}", report.error);
        assert!(report.results.iter().all(|result| result.passed));
        assert_eq!(report.results[0].actual.as_deref(), Some("true"));
        assert_eq!(report.results[2].actual.as_deref(), Some("null"));
    }
}
