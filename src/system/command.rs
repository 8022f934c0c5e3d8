//! Timeout-bounded external command execution.
//!
//! Every external program run by the controller goes through [`run_command`].
//! The call never fails visibly: spawn errors, read errors and timeouts all
//! degrade to a (possibly empty) [`CommandOutput`] carrying a diagnostic, so
//! callers only ever branch on what they got back.

use std::fmt;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

/// Default wall-clock ceiling for a single command run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// An executable invocation plus its timeout. Immutable once built.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build a spec from a whitespace-separated command line.
    ///
    /// No shell interpretation happens — quoting and expansion are not
    /// supported, the line is split on whitespace as-is.
    pub fn from_line(line: &str) -> Self {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        Self {
            program,
            args: parts.collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// What a command run produced.
///
/// Always returned, even on spawn failure or timeout — `lines` is empty
/// rather than absent, and `error` carries the diagnostic so tests can tell
/// "legitimately empty" from "failed".
#[derive(Debug, Default)]
pub struct CommandOutput {
    /// Captured standard-output lines, in order.
    pub lines: Vec<String>,
    /// The run hit its deadline before the output stream closed.
    pub timed_out: bool,
    /// Exit status, when the process exited within the deadline.
    pub status: Option<ExitStatus>,
    /// Diagnostic for spawn/IO failures.
    pub error: Option<String>,
}

impl CommandOutput {
    fn failed(message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::default()
        }
    }
}

/// Run a command, capturing stdout line-by-line under a hard deadline.
///
/// One reader task is spawned per invocation and never outlives the call.
/// On timeout the reader is aborted and the child is sent a best-effort
/// kill — the call does not wait to confirm termination, and the process
/// may linger briefly after return. The child handle is kill-on-drop, so
/// it is never leaked.
pub async fn run_command(spec: CommandSpec) -> CommandOutput {
    debug!(command = %spec, "running command");

    let mut child = match Command::new(&spec.program)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            warn!(command = %spec, "failed to spawn: {}", e);
            return CommandOutput::failed(format!("failed to spawn {}: {}", spec.program, e));
        }
    };

    let stdout = child.stdout.take();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let reader = tokio::spawn(async move {
        let Some(stdout) = stdout else {
            return;
        };
        let mut lines = BufReader::new(stdout).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    debug!("stdout read error: {}", e);
                    break;
                }
            }
        }
    });

    let deadline = Instant::now() + spec.timeout;
    let mut output = CommandOutput::default();

    loop {
        tokio::select! {
            line = rx.recv() => match line {
                Some(line) => output.lines.push(line),
                // Reader finished and the channel is drained.
                None => break,
            },
            _ = time::sleep_until(deadline) => {
                output.timed_out = true;
                break;
            }
        }
    }

    if output.timed_out {
        warn!(command = %spec, "timed out, killing process");
        reader.abort();
        // Keep lines the reader had already sent but the loop hadn't received.
        while let Ok(line) = rx.try_recv() {
            output.lines.push(line);
        }
        if let Err(e) = child.start_kill() {
            debug!("kill failed: {}", e);
        }
        output.status = child.try_wait().ok().flatten();
    } else {
        match time::timeout_at(deadline, child.wait()).await {
            Ok(Ok(status)) => output.status = Some(status),
            Ok(Err(e)) => {
                warn!(command = %spec, "wait failed: {}", e);
                output.error = Some(format!("wait failed: {}", e));
            }
            Err(_) => {
                output.timed_out = true;
                if let Err(e) = child.start_kill() {
                    debug!("kill failed: {}", e);
                }
            }
        }
    }

    debug!(command = %spec, lines = output.lines.len(), timed_out = output.timed_out, "command finished");
    output
}

/// Check whether a process with `name` in its `ps` line is running.
pub async fn is_process_running(name: &str) -> bool {
    let output = run_command(CommandSpec::new("ps")).await;
    output.lines.iter().any(|line| line.contains(name))
}
