//! tetherkit - control layer for a wifi tethering daemon stack.
//!
//! Lets a controller operate dnsmasq, wpa_supplicant and the wireless
//! driver without knowing shell syntax, `su` mechanics or on-disk config
//! formats: timeout-bounded command execution, elevated sub-shells,
//! line-preserving config reconciliation, lease-table parsing and
//! installed-fileset version checks.

pub mod conf;
pub mod config;
pub mod error;
pub mod fileset;
pub mod leases;
pub mod system;
pub mod textfile;

pub use conf::{DnsmasqConf, TiWlanConf, WpaSupplicantConf};
pub use config::{Paths, Settings};
pub use error::{Result, TetherError};
pub use fileset::{is_outdated, FILESET_VERSION};
pub use leases::{parse_leases, LeaseRecord};
pub use system::{run_command, CommandOutput, CommandSpec, RootShell};
