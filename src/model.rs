use crate::error::HarnessError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// A submission to run against a problem's test cases.
#[derive(Debug, Clone, Deserialize)]
pub struct RunRequest {
    pub language: String,
    #[serde(rename = "userCode")]
    pub user_code: String,
    /// Entry point override; extracted from the source when absent.
    #[serde(rename = "functionName", default)]
    pub function_name: Option<String>,
    #[serde(rename = "testCases")]
    pub test_cases: Vec<TestCase>,
    /// Problem-supplied definitions (helper classes, data structures) placed
    /// ahead of the submission in the generated driver.
    #[serde(rename = "setupCode", default)]
    pub setup_code: Option<String>,
}

/// A single test case.
///
/// An array input is spread as positional arguments; any other value is
/// passed as the sole argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: Value,
    pub expected: Value,
}

/// One test case's verdict as reported by the generated driver.
///
/// `input`, `expected` and `actual` carry the canonical JSON text the driver
/// compared, so the verdict is self-describing without re-serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub passed: bool,
    pub input: String,
    pub expected: String,
    pub actual: Option<String>,
    /// Wall-clock time of the call in milliseconds, formatted to two decimals.
    pub runtime: Option<String>,
    pub error: Option<String>,
}

/// The envelope returned to callers.
///
/// Harness-level failures land in `error` with an empty result list; they are
/// never raised past this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub success: bool,
    pub results: Vec<TestResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunReport {
    pub fn completed(results: Vec<TestResult>) -> Self {
        Self {
            success: true,
            results,
            error: None,
        }
    }

    pub fn failed(error: &HarnessError) -> Self {
        Self {
            success: false,
            results: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// The normalized outcome of one driver execution, shared by both backends.
///
/// Callers branch on `success` and `timed_out` only; nothing downstream asks
/// which backend produced the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub error: Option<String>,
    /// Set when the run was abandoned at the wall-clock limit, so callers can
    /// tell "ran and failed" apart from "never finished".
    pub timed_out: bool,
    pub execution_time_ms: u64,
}

impl ExecutionOutcome {
    pub fn completed(stdout: String, stderr: String, execution_time_ms: u64) -> Self {
        Self {
            success: true,
            stdout,
            stderr,
            error: None,
            timed_out: false,
            execution_time_ms,
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            error: Some(detail.into()),
            timed_out: false,
            execution_time_ms: 0,
        }
    }

    pub fn failed_with_output(
        detail: impl Into<String>,
        stdout: String,
        stderr: String,
        execution_time_ms: u64,
    ) -> Self {
        Self {
            success: false,
            stdout,
            stderr,
            error: Some(detail.into()),
            timed_out: false,
            execution_time_ms,
        }
    }

    pub fn timeout(limit: Duration) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            error: Some(format!("execution timed out after {limit:?}")),
            timed_out: true,
            execution_time_ms: limit.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod run_request {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_the_wire_field_names() {
        let request: RunRequest = serde_json::from_value(json!({
            "language": "javascript",
            "userCode": "function add(a, b) { return a + b; }",
            "functionName": "add",
            "testCases": [{ "input": [2, 3], "expected": 5 }],
            "setupCode": "const EPS = 1e-9;"
        }))
        .unwrap();

        assert_eq!(request.language, "javascript");
        assert_eq!(request.function_name.as_deref(), Some("add"));
        assert_eq!(request.setup_code.as_deref(), Some("const EPS = 1e-9;"));
        assert_eq!(request.test_cases.len(), 1);
        assert_eq!(request.test_cases[0].input, json!([2, 3]));
        assert_eq!(request.test_cases[0].expected, json!(5));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let request: RunRequest = serde_json::from_value(json!({
            "language": "python",
            "userCode": "def f(): pass",
            "testCases": []
        }))
        .unwrap();

        assert!(request.function_name.is_none());
        assert!(request.setup_code.is_none());
        assert!(request.test_cases.is_empty());
    }
}
