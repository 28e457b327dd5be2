//! Contains functions related to timeout of a driver process.

use crate::error::HarnessError;
use std::{process::Output, time::Duration};
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::Child,
    task::JoinHandle,
    time::{timeout, Instant},
};
use tracing::{debug, error, info};

/// The outcome of waiting on a driver process with a deadline.
#[derive(Debug, PartialEq, Eq)]
pub enum Waited {
    /// The process exited on its own and its output was collected.
    Finished(Output),
    /// The deadline passed and the process was killed.
    TimedOut,
}

/// Waits for `child` to exit within `limit`, killing it once the limit passes.
///
/// Both piped streams are drained while the process runs; a driver that
/// writes more than the pipe capacity must never stall against a full pipe
/// and get mistaken for a hang. The child always ends up reaped: either it
/// exited and its output was collected, or it was killed after the deadline.
/// A kill that itself fails is logged and still reported as
/// [`Waited::TimedOut`].
///
/// # Errors
/// Returns [`HarnessError::Transport`] when the process cannot be waited on.
pub async fn wait_with_deadline(mut child: Child, limit: Duration) -> Result<Waited, HarnessError> {
    let start = Instant::now();
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match timeout(limit, child.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(err)) => {
            error!("unknown error from waiting on driver process: {err}");
            return Err(HarnessError::Transport(format!(
                "could not wait on the driver process: {err}"
            )));
        }
        Err(_elapsed) => {
            info!("killing driver process after exceeding {:?}", limit);
            if let Err(err) = child.kill().await {
                error!("could not kill timed out driver process: {err}");
            }
            return Ok(Waited::TimedOut);
        }
    };

    debug!(?status, "driver process exited after {:?}", start.elapsed());
    let stdout = stdout.await.unwrap_or_default();
    let stderr = stderr.await.unwrap_or_default();
    Ok(Waited::Finished(Output {
        status,
        stdout,
        stderr,
    }))
}

/// Reads a piped stream to its end on a separate task. An absent or failed
/// pipe yields empty output.
fn drain<R>(pipe: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut collected = Vec::new();
        if let Some(mut pipe) = pipe {
            if let Err(err) = pipe.read_to_end(&mut collected).await {
                error!("could not drain driver stream: {err}");
            }
        }
        collected
    })
}

#[cfg(test)]
mod wait_with_deadline {
    use super::{wait_with_deadline, Waited};
    use crate::error::HarnessError;
    use std::time::Duration;
    use tokio::process::Command;

    #[tokio::test]
    async fn exceed_deadline() -> Result<(), HarnessError> {
        let process = Command::new("sleep")
            .arg("1")
            .spawn()
            .expect("failed to spawn process");
        let limit = Duration::from_millis(400);

        let waited = wait_with_deadline(process, limit).await?;

        assert_eq!(waited, Waited::TimedOut);

        Ok(())
    }

    #[tokio::test]
    async fn finish_before_deadline() -> Result<(), HarnessError> {
        let process = Command::new("sleep")
            .arg("0")
            .spawn()
            .expect("failed to spawn process");
        let limit = Duration::from_secs(5);

        let waited = wait_with_deadline(process, limit).await?;

        match waited {
            Waited::Finished(output) => assert!(output.status.success()),
            Waited::TimedOut => panic!("process should have finished"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn captured_output_is_collected() -> Result<(), HarnessError> {
        let mut command = Command::new("echo");
        command.arg("driver output").stdout(std::process::Stdio::piped());
        let process = command.spawn().expect("failed to spawn process");

        let waited = wait_with_deadline(process, Duration::from_secs(5)).await?;

        match waited {
            Waited::Finished(output) => {
                assert_eq!(String::from_utf8_lossy(&output.stdout), "driver output\n");
            }
            Waited::TimedOut => panic!("process should have finished"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn output_larger_than_the_pipe_capacity_is_not_a_timeout() -> Result<(), HarnessError> {
        // well past the ~64 KiB pipe buffer; the write must not stall
        let mut command = Command::new("head");
        command
            .args(["-c", "1000000", "/dev/zero"])
            .stdout(std::process::Stdio::piped());
        let process = command.spawn().expect("failed to spawn process");

        let waited = wait_with_deadline(process, Duration::from_secs(3)).await?;

        match waited {
            Waited::Finished(output) => assert_eq!(output.stdout.len(), 1_000_000),
            Waited::TimedOut => panic!("draining should have kept the process running"),
        }

        Ok(())
    }
}
