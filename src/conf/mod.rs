//! Per-daemon configuration reconcilers built on the generic line patcher.

pub mod dnsmasq;
pub mod patch;
pub mod tiwlan;
pub mod wpa;

pub use dnsmasq::{DnsmasqConf, DEFAULT_DNS1, DEFAULT_DNS2};
pub use patch::{reconcile, reconcile_lines, Assignment, Matcher};
pub use tiwlan::TiWlanConf;
pub use wpa::WpaSupplicantConf;
