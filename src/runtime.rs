//! Process-wide interpreter handles for the local execution backend.
//!
//! Locating a Python interpreter involves spawning probe processes, so it
//! happens at most once per process: the first caller starts the probe,
//! every concurrent caller awaits the same in-flight probe, and the result
//! is cached for the process lifetime. A failed probe is cached too, so a
//! host without Python fails fast on every later run instead of re-probing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Locates a runnable interpreter binary.
///
/// A trait seam so tests can count and shape probes without touching the host.
#[async_trait]
pub trait RuntimeLocator: Send + Sync {
    async fn locate(&self) -> Result<PathBuf, String>;
}

/// Probes the host for a CPython 3 interpreter.
///
/// `VIRTUOSO_PYTHON` overrides the candidate list outright.
pub struct SystemPython;

#[async_trait]
impl RuntimeLocator for SystemPython {
    async fn locate(&self) -> Result<PathBuf, String> {
        let mut candidates = Vec::new();
        if let Ok(overridden) = std::env::var("VIRTUOSO_PYTHON") {
            if !overridden.trim().is_empty() {
                candidates.push(overridden);
            }
        }
        candidates.push("python3".to_string());
        candidates.push("python".to_string());

        for candidate in &candidates {
            match Command::new(candidate).arg("--version").output().await {
                Ok(output) if output.status.success() => {
                    let version = String::from_utf8_lossy(&output.stdout);
                    debug!("located python interpreter '{candidate}' ({})", version.trim());
                    return Ok(PathBuf::from(candidate));
                }
                Ok(_) => warn!("interpreter candidate '{candidate}' exited unsuccessfully"),
                Err(err) => debug!("interpreter candidate '{candidate}' unavailable: {err}"),
            }
        }

        Err(format!(
            "no python interpreter found (tried {})",
            candidates.join(", ")
        ))
    }
}

/// The shared, lazily-located Python interpreter.
pub struct PythonRuntime {
    locator: Box<dyn RuntimeLocator>,
    interpreter: OnceCell<Result<PathBuf, String>>,
}

impl PythonRuntime {
    pub fn new(locator: Box<dyn RuntimeLocator>) -> Self {
        Self {
            locator,
            interpreter: OnceCell::new(),
        }
    }

    pub fn system() -> Self {
        Self::new(Box::new(SystemPython))
    }

    /// Resolves the interpreter path, probing on first use.
    ///
    /// # Errors
    /// Returns the probe's failure detail; the same detail every time once
    /// the first probe has failed.
    pub async fn interpreter(&self) -> Result<&Path, String> {
        let resolved = self
            .interpreter
            .get_or_init(|| async {
                info!("probing for a python interpreter");
                self.locator.locate().await
            })
            .await;

        match resolved {
            Ok(path) => Ok(path.as_path()),
            Err(detail) => Err(detail.clone()),
        }
    }
}

#[cfg(test)]
mod interpreter {
    use super::{PythonRuntime, RuntimeLocator};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct CountingLocator {
        probes: Arc<AtomicUsize>,
        result: Result<PathBuf, String>,
    }

    #[async_trait]
    impl RuntimeLocator for CountingLocator {
        async fn locate(&self) -> Result<PathBuf, String> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            // long enough that concurrent callers overlap the probe
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_probe() {
        let probes = Arc::new(AtomicUsize::new(0));
        let runtime = Arc::new(PythonRuntime::new(Box::new(CountingLocator {
            probes: Arc::clone(&probes),
            result: Ok(PathBuf::from("python3")),
        })));

        let (first, second, third) = tokio::join!(
            runtime.interpreter(),
            runtime.interpreter(),
            runtime.interpreter()
        );

        assert_eq!(first.unwrap(), PathBuf::from("python3"));
        assert_eq!(second.unwrap(), PathBuf::from("python3"));
        assert_eq!(third.unwrap(), PathBuf::from("python3"));
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn a_failed_probe_is_cached() {
        let probes = Arc::new(AtomicUsize::new(0));
        let runtime = PythonRuntime::new(Box::new(CountingLocator {
            probes: Arc::clone(&probes),
            result: Err("no python interpreter found".to_string()),
        }));

        let first = runtime.interpreter().await;
        let second = runtime.interpreter().await;

        assert_eq!(first.unwrap_err(), "no python interpreter found");
        assert_eq!(second.unwrap_err(), "no python interpreter found");
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }
}
