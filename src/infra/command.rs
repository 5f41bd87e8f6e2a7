//! # Command Execution Module / 命令执行模块
//!
//! Spawns external processes with captured output and a hard time limit.
//! Every outcome, including a timeout or a failed spawn, comes back as a value
//! the caller can inspect.
//!
//! 派生带输出捕获和硬性时间限制的外部进程。
//! 所有结果（包括超时和派生失败）都以调用方可检查的值返回。

use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::AsyncReadExt;

/// The outcome of one external call.
/// 一次外部调用的结果。
#[derive(Debug)]
pub enum CallOutcome {
    /// The process exited with status zero.
    Succeeded { stdout: String, stderr: String },
    /// The process exited with a non-zero status.
    Failed {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    /// The process was still running when the time limit elapsed and was killed.
    TimedOut(Duration),
    /// The process could not be started or waited on.
    SpawnFailed(std::io::Error),
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Succeeded { .. })
    }

    /// Standard output of a process that succeeded.
    pub fn into_stdout(self) -> Option<String> {
        match self {
            CallOutcome::Succeeded { stdout, .. } => Some(stdout),
            _ => None,
        }
    }
}

/// Spawns a command, captures its stdout and stderr separately and waits for
/// it at most `limit`. The child is killed if the limit elapses.
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
/// * `limit` - How long to wait before giving up on the process.
///
/// 派生一个命令，分别捕获其 stdout 和 stderr，并最多等待 `limit`。
/// 超过时限时子进程会被终止。
pub async fn spawn_and_capture(mut cmd: tokio::process::Command, limit: Duration) -> CallOutcome {
    let mut child = match cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return CallOutcome::SpawnFailed(e),
    };

    let (Some(mut stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return CallOutcome::SpawnFailed(std::io::Error::other("failed to capture process output"));
    };

    // Both pipes are drained while waiting so a chatty process cannot block on
    // a full pipe buffer.
    // 等待期间同时读取两个管道，避免输出较多的进程因管道缓冲区已满而阻塞。
    let run = async {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let (out_res, err_res, status) = tokio::join!(
            stdout.read_to_end(&mut out),
            stderr.read_to_end(&mut err),
            child.wait()
        );
        out_res?;
        err_res?;
        Ok::<_, std::io::Error>((
            status?,
            String::from_utf8_lossy(&out).into_owned(),
            String::from_utf8_lossy(&err).into_owned(),
        ))
    };

    let finished = tokio::time::timeout(limit, run).await;
    match finished {
        Ok(Ok((status, stdout, stderr))) if status.success() => {
            CallOutcome::Succeeded { stdout, stderr }
        }
        Ok(Ok((status, stdout, stderr))) => CallOutcome::Failed {
            status,
            stdout,
            stderr,
        },
        Ok(Err(e)) => CallOutcome::SpawnFailed(e),
        Err(_) => {
            // Kill now rather than when `child` drops.
            if let Err(e) = child.start_kill() {
                tracing::debug!("failed to kill timed-out process: {}", e);
            }
            CallOutcome::TimedOut(limit)
        }
    }
}
