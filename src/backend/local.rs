//! Contains the local execution backend.
//!
//! Drivers for the interpreted languages are written into a per-run scratch
//! directory under the parent directory and spawned against the host's
//! interpreter, with both output streams captured and a wall-clock deadline
//! enforced by the timeout loop.

use crate::error::HarnessError;
use crate::language::Language;
use crate::model::ExecutionOutcome;
use crate::runtime::PythonRuntime;
use crate::timeout::{wait_with_deadline, Waited};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::fs;
use tokio::process::Command;
use tokio::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

pub struct LocalBackend {
    parent_dir: PathBuf,
    python: PythonRuntime,
}

impl LocalBackend {
    pub fn new(parent_dir: impl Into<PathBuf>, python: PythonRuntime) -> Self {
        Self {
            parent_dir: parent_dir.into(),
            python,
        }
    }

    /// Runs a generated driver under the interpreter for `language`, bounded
    /// by `limit`.
    ///
    /// Every failure mode folds into the outcome envelope, and the scratch
    /// directory is removed again on all paths.
    pub async fn execute(
        &self,
        language: Language,
        driver: &str,
        limit: Duration,
    ) -> ExecutionOutcome {
        let interpreter = match self.interpreter_for(language).await {
            Ok(interpreter) => interpreter,
            Err(err) => return ExecutionOutcome::failed(err.to_string()),
        };

        let scratch = self.parent_dir.join(Uuid::new_v4().to_string());
        info!("unique directory: {:?}", scratch);
        if let Err(err) = fs::create_dir_all(&scratch).await {
            error!("could not create scratch directory: {err}");
            return ExecutionOutcome::failed(format!(
                "could not prepare the execution workspace: {err}"
            ));
        }

        let outcome = self
            .run_in_scratch(&scratch, &interpreter, language, driver, limit)
            .await;

        if let Err(err) = fs::remove_dir_all(&scratch).await {
            error!("could not delete scratch directory {:?}: {err}", scratch);
        }

        outcome
    }

    async fn interpreter_for(&self, language: Language) -> Result<PathBuf, HarnessError> {
        match language {
            // lowered to JavaScript by its generator before reaching us
            Language::Javascript | Language::Typescript => Ok(PathBuf::from("node")),
            Language::Python => self
                .python
                .interpreter()
                .await
                .map(Path::to_path_buf)
                .map_err(|detail| HarnessError::RuntimeUnavailable { language, detail }),
            other => Err(HarnessError::Transport(format!(
                "{other} drivers do not execute locally"
            ))),
        }
    }

    async fn run_in_scratch(
        &self,
        scratch: &Path,
        interpreter: &Path,
        language: Language,
        driver: &str,
        limit: Duration,
    ) -> ExecutionOutcome {
        let driver_path = scratch.join(language.profile().driver_file);
        if let Err(err) = fs::write(&driver_path, driver).await {
            error!("could not write driver file: {err}");
            return ExecutionOutcome::failed(format!("could not write the driver file: {err}"));
        }

        info!("spawning {language} driver process");
        let spawned = Command::new(interpreter)
            .arg(&driver_path)
            .current_dir(scratch)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();
        let child = match spawned {
            Ok(child) => child,
            Err(err) => {
                error!("could not spawn driver process: {err}");
                return ExecutionOutcome::failed(format!(
                    "could not spawn '{}': {err}",
                    interpreter.display()
                ));
            }
        };

        let start = Instant::now();
        match wait_with_deadline(child, limit).await {
            Ok(Waited::Finished(output)) => {
                let elapsed = start.elapsed().as_millis() as u64;
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                debug!("driver exited with {:?} in {elapsed}ms", output.status);

                if output.status.success() {
                    ExecutionOutcome::completed(stdout, stderr, elapsed)
                } else {
                    ExecutionOutcome::failed_with_output(
                        format!("driver exited with {}", output.status),
                        stdout,
                        stderr,
                        elapsed,
                    )
                }
            }
            Ok(Waited::TimedOut) => ExecutionOutcome::timeout(limit),
            Err(err) => ExecutionOutcome::failed(err.to_string()),
        }
    }
}


#[cfg(test)]
mod execute {
    use super::*;
    use crate::runtime::PythonRuntime;

    fn backend() -> LocalBackend {
        LocalBackend::new("/tmp", PythonRuntime::system())
    }

    #[tokio::test]
    async fn an_unavailable_interpreter_folds_into_the_outcome() {
        let outcome = backend()
            .execute(Language::Cpp, "int main() {}", Duration::from_secs(1))
            .await;

        assert!(!outcome.success);
        assert!(!outcome.timed_out);
        assert!(outcome
            .error
            .as_deref()
            .is_some_and(|detail| detail.contains("do not execute locally")));
    }

    #[cfg(feature = "javascript")]
    #[tokio::test]
    async fn a_javascript_driver_runs_and_is_captured() {
        let outcome = backend()
            .execute(
                Language::Javascript,
                "console.log(JSON.stringify([1, 2, 3]));",
                Duration::from_secs(10),
            )
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.stdout, "[1,2,3]\n");
        assert!(outcome.stderr.is_empty());
    }

    #[cfg(feature = "javascript")]
    #[tokio::test]
    async fn a_crashing_driver_reports_failure_with_its_streams() {
        let outcome = backend()
            .execute(
                Language::Javascript,
                "console.log(\"before\");\nthrow new Error(\"kaboom\");",
                Duration::from_secs(10),
            )
            .await;

        assert!(!outcome.success);
        assert!(!outcome.timed_out);
        assert_eq!(outcome.stdout, "before\n");
        assert!(outcome.stderr.contains("kaboom"));
    }

    #[cfg(feature = "javascript")]
    #[tokio::test]
    async fn a_hanging_driver_times_out() {
        let outcome = backend()
            .execute(
                Language::Javascript,
                "for (;;) {}",
                Duration::from_millis(500),
            )
            .await;

        assert!(!outcome.success);
        assert!(outcome.timed_out);
    }

    #[cfg(feature = "python")]
    #[tokio::test]
    async fn a_python_driver_runs_through_the_shared_runtime() {
        let outcome = backend()
            .execute(
                Language::Python,
                "print(\"from python\")",
                Duration::from_secs(10),
            )
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.stdout, "from python\n");
    }
}
