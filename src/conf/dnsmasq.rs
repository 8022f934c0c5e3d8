//! Reconciliation of the dnsmasq forwarder config.

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use crate::conf::patch::{self, Assignment};
use crate::config::Paths;

/// Fallback DNS servers when the controller supplies none (OpenDNS).
pub const DEFAULT_DNS1: &str = "208.67.220.220";
pub const DEFAULT_DNS2: &str = "208.67.222.222";

/// The dnsmasq config file, reconciled before each daemon start.
///
/// Reconciliation is serialized per instance; concurrent callers in the
/// same process cannot interleave writes to the file. Nothing guards
/// against another process writing it.
pub struct DnsmasqConf {
    path: PathBuf,
    data_dir: PathBuf,
    leases: PathBuf,
    pid_file: PathBuf,
    lock: Mutex<()>,
}

impl DnsmasqConf {
    pub fn new(paths: &Paths) -> Self {
        Self {
            path: paths.dnsmasq_conf(),
            data_dir: paths.data_dir().to_path_buf(),
            leases: paths.dnsmasq_leases(),
            pid_file: paths.dnsmasq_pid(),
            lock: Mutex::new(()),
        }
    }

    /// Point the `dhcp-leasefile=` and `pid-file=` lines at the current
    /// data directory. Lines already referencing it are left untouched.
    pub fn update_filepaths(&self) -> bool {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let data_dir = self.data_dir.display().to_string();
        let assignments = [
            Assignment::token(
                "dhcp-leasefile=",
                format!("dhcp-leasefile={}", self.leases.display()),
            )
            .satisfied_by(&data_dir),
            Assignment::token("pid-file=", format!("pid-file={}", self.pid_file.display()))
                .satisfied_by(&data_dir),
        ];
        patch::reconcile(&self.path, &assignments)
    }

    /// Rewrite up to two `server=` lines to the desired DNS pair.
    ///
    /// Matching is positional: the first `server=` line gets the first
    /// address, the second line the second. Missing lines are not added and
    /// extra ones are left alone. `None` falls back to the defaults.
    pub fn update_dns_servers(&self, dns1: Option<&str>, dns2: Option<&str>) -> bool {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let dns1 = match dns1 {
            Some(d) if !d.is_empty() => d,
            _ => DEFAULT_DNS1,
        };
        let dns2 = match dns2 {
            Some(d) if !d.is_empty() => d,
            _ => DEFAULT_DNS2,
        };

        let assignments = [
            Assignment::token("server=", format!("server={}", dns1))
                .satisfied_by(dns1)
                .once(),
            Assignment::token("server=", format!("server={}", dns2))
                .satisfied_by(dns2)
                .once(),
        ];
        let changed = patch::reconcile(&self.path, &assignments);
        if changed {
            debug!(dns1, dns2, "wrote new DNS servers");
        } else {
            debug!(dns1, dns2, "DNS servers already up to date");
        }
        changed
    }
}
