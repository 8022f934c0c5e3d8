//! Elevated command execution through an `su` sub-shell.
//!
//! Commands are piped to the shell's stdin and terminated with an explicit
//! `exit` line. One shell is spawned and torn down per call; there is no
//! retry.

use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Handle to the privilege-escalation helper.
#[derive(Debug, Clone)]
pub struct RootShell {
    program: String,
}

impl RootShell {
    /// Use the conventional `su` helper.
    pub fn new() -> Self {
        Self::with_program("su")
    }

    /// Use a different shell program (handy for tests, or `sudo -s` setups).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn spawn(&self) -> io::Result<Child> {
        Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
    }

    /// Probe whether an elevated shell can be opened at all.
    ///
    /// Opens the shell, writes `exit`, and checks the exit status.
    pub async fn has_root_permission(&self) -> bool {
        match self.probe().await {
            Ok(rooted) => rooted,
            Err(e) => {
                debug!("can't obtain root: {}", e);
                false
            }
        }
    }

    async fn probe(&self) -> io::Result<bool> {
        let mut child = self.spawn()?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("shell stdin unavailable"))?;
        stdin.write_all(b"exit\n").await?;
        stdin.flush().await?;
        drop(stdin);
        let status = child.wait().await?;
        debug!(code = ?status.code(), "root probe exit status");
        Ok(status.success())
    }

    /// Run a single command line in an elevated shell.
    ///
    /// Returns `true` if the command could be written and the shell exited;
    /// the shell's exit status is not checked here — only the permission
    /// probe inspects it.
    pub async fn run_root_command(&self, line: &str) -> bool {
        debug!(command = line, "executing root command");
        self.run_root_commands(std::iter::once(line)).await
    }

    /// Feed several command lines to one elevated shell, then `exit`.
    pub async fn run_root_commands<I, S>(&self, lines: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.feed(lines).await {
            Ok(()) => true,
            Err(e) => {
                warn!("root command failed: {}", e);
                false
            }
        }
    }

    async fn feed<I, S>(&self, lines: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut child = self.spawn()?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("shell stdin unavailable"))?;
        for line in lines {
            stdin.write_all(line.as_ref().as_bytes()).await?;
            stdin.write_all(b"\n").await?;
        }
        stdin.write_all(b"exit\n").await?;
        stdin.flush().await?;
        drop(stdin);
        child.wait().await?;
        Ok(())
    }

    /// Mark the helper binaries under `bin_dir` executable.
    pub async fn chmod_bin<S: AsRef<str>>(&self, bin_dir: &Path, names: &[S]) -> bool {
        let lines: Vec<String> = names
            .iter()
            .map(|name| format!("chmod 0755 {}", bin_dir.join(name.as_ref()).display()))
            .collect();
        self.run_root_commands(&lines).await
    }
}

impl Default for RootShell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `sh` stands in for `su`: it reads the same `exit`-terminated command
    // stream from stdin.
    #[tokio::test]
    async fn permission_probe_succeeds_with_working_shell() {
        let shell = RootShell::with_program("sh");
        assert!(shell.has_root_permission().await);
    }

    #[tokio::test]
    async fn permission_probe_fails_when_shell_is_missing() {
        let shell = RootShell::with_program("/no/such/su");
        assert!(!shell.has_root_permission().await);
    }

    #[tokio::test]
    async fn run_root_command_ignores_command_exit_status() {
        let shell = RootShell::with_program("sh");
        // `false` leaves the shell with a non-zero exit status, but the
        // write/wait sequence itself succeeds.
        assert!(shell.run_root_command("false").await);
    }

    #[tokio::test]
    async fn run_root_command_fails_on_spawn_error() {
        let shell = RootShell::with_program("/no/such/su");
        assert!(!shell.run_root_command("true").await);
    }

    #[tokio::test]
    async fn chmod_bin_builds_one_line_per_file() {
        let shell = RootShell::with_program("sh");
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tether"), "#!/bin/sh\n").unwrap();
        assert!(shell.chmod_bin(dir.path(), &["tether"]).await);
        let mode = {
            use std::os::unix::fs::PermissionsExt;
            std::fs::metadata(dir.path().join("tether"))
                .unwrap()
                .permissions()
                .mode()
        };
        assert_eq!(mode & 0o777, 0o755);
    }
}
