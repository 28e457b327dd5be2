//! Contains the remote execution backend.
//!
//! Drivers for the compiled languages are submitted to a hosted execution
//! service speaking the Piston API: `POST {base}/execute` with the source
//! file, a pinned runtime version, and stage budgets. The response carries
//! an optional compile stage and a run stage; both fold into the common
//! outcome envelope here.

use crate::language::LanguageProfile;
use crate::model::ExecutionOutcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

/// The default hosted execution endpoint.
const DEFAULT_BASE_URL: &str = "https://emkc.org/api/v2/piston";

/// Budget forwarded to the service's compile stage, in milliseconds.
const COMPILE_TIMEOUT_MS: u64 = 10_000;

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<FilePayload<'a>>,
    compile_timeout: u64,
    run_timeout: u64,
}

#[derive(Serialize)]
struct FilePayload<'a> {
    name: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    run: StageOutput,
    #[serde(default)]
    compile: Option<StageOutput>,
}

/// One stage of the service response. All fields are defaulted because the
/// service omits what a stage did not produce.
#[derive(Debug, Default, Deserialize)]
struct StageOutput {
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
    #[serde(default)]
    output: String,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    signal: Option<String>,
}

pub struct RemoteBackend {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads the endpoint from `VIRTUOSO_EXECUTE_API`, falling back to the
    /// public hosted service.
    pub fn from_env() -> Self {
        match std::env::var("VIRTUOSO_EXECUTE_API") {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::new(DEFAULT_BASE_URL),
        }
    }

    /// Submits a driver for remote execution, bounded by `limit`.
    ///
    /// The HTTP request is aborted once `limit` passes and the outcome then
    /// reports `timed_out`, the same shape a service-side kill produces.
    pub async fn execute(
        &self,
        profile: &LanguageProfile,
        driver: &str,
        limit: Duration,
    ) -> ExecutionOutcome {
        let url = format!("{}/execute", self.base_url);
        let request = ExecuteRequest {
            language: profile.remote_id,
            version: profile.runtime_version,
            files: vec![FilePayload {
                name: profile.driver_file,
                content: driver,
            }],
            compile_timeout: COMPILE_TIMEOUT_MS,
            run_timeout: limit.as_millis() as u64,
        };

        info!("submitting {} driver to {url}", profile.display_name);
        let start = std::time::Instant::now();
        let response = self
            .client
            .post(&url)
            .timeout(limit)
            .json(&request)
            .send()
            .await;
        let elapsed = start.elapsed().as_millis() as u64;

        let response = match response {
            Ok(response) => response,
            Err(err) if err.is_timeout() => {
                warn!("remote execution timed out after {limit:?}");
                return ExecutionOutcome::timeout(limit);
            }
            Err(err) => {
                error!("remote execution request failed: {err}");
                return ExecutionOutcome::failed(format!("execution service unreachable: {err}"));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("execution service returned {status}: {body}");
            return ExecutionOutcome::failed(format!("execution service returned {status}"));
        }

        match response.json::<ExecuteResponse>().await {
            Ok(payload) => normalize(payload, elapsed),
            Err(err) => {
                error!("could not decode execution service response: {err}");
                ExecutionOutcome::failed(format!("malformed execution service response: {err}"))
            }
        }
    }
}

/// Folds the service's compile and run stages into the outcome envelope.
///
/// A service-side kill surfaces as `SIGKILL` on the run stage and maps to a
/// timeout, matching how the local backend reports its own deadline kills.
fn normalize(response: ExecuteResponse, elapsed_ms: u64) -> ExecutionOutcome {
    if let Some(compile) = &response.compile {
        if compile.code.unwrap_or(0) != 0 {
            let detail = if compile.output.trim().is_empty() {
                compile.stderr.trim()
            } else {
                compile.output.trim()
            };
            let mut outcome = ExecutionOutcome::failed_with_output(
                "compilation failed",
                String::new(),
                detail.to_string(),
                elapsed_ms,
            );
            if let Some(first_line) = detail.lines().find(|line| !line.trim().is_empty()) {
                outcome.error = Some(format!("compilation failed: {}", first_line.trim()));
            }
            return outcome;
        }
    }

    let run = response.run;
    let timed_out = run.signal.as_deref() == Some("SIGKILL");
    if run.code == Some(0) && run.signal.is_none() {
        return ExecutionOutcome::completed(run.stdout, run.stderr, elapsed_ms);
    }

    let detail = match (&run.signal, run.code) {
        (Some(signal), _) => format!("driver terminated by signal {signal}"),
        (None, Some(code)) => format!("driver exited with code {code}"),
        (None, None) => "driver finished without an exit code".to_string(),
    };
    let mut outcome = ExecutionOutcome::failed_with_output(detail, run.stdout, run.stderr, elapsed_ms);
    outcome.timed_out = timed_out;
    outcome
}


#[cfg(test)]
mod normalize {
    use super::{normalize, ExecuteResponse, StageOutput};

    fn run_stage(code: Option<i64>, signal: Option<&str>) -> ExecuteResponse {
        ExecuteResponse {
            run: StageOutput {
                stdout: "out".to_string(),
                stderr: "err".to_string(),
                output: String::new(),
                code,
                signal: signal.map(str::to_string),
            },
            compile: None,
        }
    }

    #[test]
    fn a_zero_exit_with_no_signal_succeeds() {
        let outcome = normalize(run_stage(Some(0), None), 12);

        assert!(outcome.success);
        assert_eq!(outcome.stdout, "out");
        assert_eq!(outcome.execution_time_ms, 12);
    }

    #[test]
    fn a_nonzero_exit_keeps_both_streams() {
        let outcome = normalize(run_stage(Some(3), None), 5);

        assert!(!outcome.success);
        assert!(!outcome.timed_out);
        assert_eq!(outcome.error.as_deref(), Some("driver exited with code 3"));
        assert_eq!(outcome.stdout, "out");
        assert_eq!(outcome.stderr, "err");
    }

    #[test]
    fn non_kill_signals_fail_without_the_timeout_flag() {
        let outcome = normalize(run_stage(None, Some("SIGSEGV")), 5);

        assert!(!outcome.success);
        assert!(!outcome.timed_out);
        assert_eq!(
            outcome.error.as_deref(),
            Some("driver terminated by signal SIGSEGV")
        );
    }
}
