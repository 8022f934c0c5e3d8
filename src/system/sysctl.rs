//! Kernel IP forwarding flag.

use std::path::Path;

use crate::textfile;

/// Default location of the kernel's IP forwarding flag.
pub const FORWARDING_FLAG: &str = "/proc/sys/net/ipv4/ip_forward";

/// Check whether IP forwarding (NAT) is enabled.
///
/// The flag file holds a single boolean-like line; `"1"` means enabled.
/// A missing or unreadable flag reads as disabled.
pub fn ip_forwarding_enabled(flag_path: &Path) -> bool {
    let lines = textfile::read_lines(flag_path);
    lines.iter().any(|line| line == "1")
}
