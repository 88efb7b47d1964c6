//! RAII guard for solver subprocesses
//!
//! Wraps a spawned child with a wall-clock deadline. The wait loop runs on a
//! blocking task so it never stalls the async runtime, and a deadline expiry
//! kills the whole process group so forked solver children cannot linger.

use satbench_core::{Error, Result, PROCESS_POLL_INTERVAL};
use std::process::{Child, ExitStatus};
use std::time::{Duration, Instant};

/// How a guarded wait ended.
#[derive(Debug)]
pub enum WaitOutcome {
    /// The child exited on its own before the deadline
    Exited(ExitStatus),
    /// The deadline expired; the process group has been killed and reaped
    TimedOut,
}

/// Guard for a spawned child process with a hard wall-clock deadline.
pub struct ProcessGuard {
    child: Option<Child>,
    timeout: Duration,
    started_at: Instant,
}

impl ProcessGuard {
    /// Guard a freshly spawned child. The deadline clock starts now.
    #[must_use]
    pub fn new(child: Child, timeout: Duration) -> Self {
        Self {
            child: Some(child),
            timeout,
            started_at: Instant::now(),
        }
    }

    /// Wall-clock time since the child was guarded.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Wait for the child to exit or for the deadline to expire, whichever
    /// comes first. Consumes the guard; on timeout the process group is
    /// terminated and the child reaped before returning.
    pub async fn wait_with_timeout(mut self) -> Result<WaitOutcome> {
        let Some(mut child) = self.child.take() else {
            return Err(Error::command_execution(
                "wait",
                vec![],
                "process already consumed",
                None,
            ));
        };
        let deadline = self.started_at + self.timeout;

        let handle = tokio::task::spawn_blocking(move || loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(WaitOutcome::Exited(status)),
                Ok(None) => {
                    if Instant::now() >= deadline {
                        kill_process_group(&mut child);
                        // Reap so the pid does not stay a zombie.
                        let _ = child.wait();
                        return Ok(WaitOutcome::TimedOut);
                    }
                    std::thread::sleep(PROCESS_POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    return Err(Error::command_execution(
                        "wait",
                        vec![],
                        format!("failed to wait for process: {e}"),
                        None,
                    ));
                }
            }
        });

        match handle.await {
            Ok(result) => result,
            Err(e) => Err(Error::command_execution(
                "wait",
                vec![],
                format!("wait task failed: {e}"),
                None,
            )),
        }
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            match child.try_wait() {
                Ok(Some(_)) => {}
                _ => {
                    kill_process_group(&mut child);
                    let _ = child.wait();
                }
            }
        }
    }
}

/// Drain the child's piped stdout and stderr on background threads so a
/// chatty solver can never fill the pipe buffers and deadlock against the
/// wait loop. Each handle yields the full captured stream.
pub(crate) fn drain_output(
    child: &mut Child,
) -> (
    std::thread::JoinHandle<String>,
    std::thread::JoinHandle<String>,
) {
    use std::io::Read;

    fn reader_thread<R: Read + Send + 'static>(
        source: Option<R>,
    ) -> std::thread::JoinHandle<String> {
        std::thread::spawn(move || {
            let mut captured = String::new();
            if let Some(mut source) = source {
                let _ = source.read_to_string(&mut captured);
            }
            captured
        })
    }

    let stdout = reader_thread(child.stdout.take());
    let stderr = reader_thread(child.stderr.take());
    (stdout, stderr)
}

/// Terminate the child and everything it spawned. On Unix the child is its
/// own process group leader (see the runner's `process_group(0)` setup), so
/// signaling `-pid` reaches the full subtree: SIGTERM first, then SIGKILL
/// for anything that ignored it.
fn kill_process_group(child: &mut Child) {
    #[cfg(unix)]
    {
        let pid = child.id();
        let group = format!("-{pid}");
        let _ = std::process::Command::new("kill")
            .args(["-TERM", "--", &group])
            .status();

        std::thread::sleep(Duration::from_millis(100));

        if child.try_wait().ok().flatten().is_none() {
            let _ = std::process::Command::new("kill")
                .args(["-9", "--", &group])
                .status();
        }

        // Direct kill in case the child was not a group leader.
        if child.try_wait().ok().flatten().is_none() {
            let _ = child.kill();
        }
    }
    #[cfg(not(unix))]
    {
        let _ = child.kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn guard_times_out_a_sleeping_process() {
        let child = std::process::Command::new("sleep")
            .arg("10")
            .spawn()
            .unwrap();

        let guard = ProcessGuard::new(child, Duration::from_millis(200));
        let started = Instant::now();
        let outcome = guard.wait_with_timeout().await.unwrap();

        assert!(matches!(outcome, WaitOutcome::TimedOut));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn guard_returns_exit_status_for_fast_process() {
        let child = std::process::Command::new("true").spawn().unwrap();

        let guard = ProcessGuard::new(child, Duration::from_secs(5));
        match guard.wait_with_timeout().await.unwrap() {
            WaitOutcome::Exited(status) => assert!(status.success()),
            WaitOutcome::TimedOut => panic!("process should have exited"),
        }
    }
}
