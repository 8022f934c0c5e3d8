//! System interaction modules for command execution, privilege escalation
//! and kernel flags.

pub mod command;
pub mod su;
pub mod sysctl;

pub use command::{is_process_running, run_command, CommandOutput, CommandSpec, DEFAULT_TIMEOUT};
pub use su::RootShell;
pub use sysctl::{ip_forwarding_enabled, FORWARDING_FLAG};
