//! Data-directory layout and persisted settings.
//!
//! `Paths` is constructed once from the data directory and handed to each
//! component — nothing mutates it afterwards. `Settings` is a small JSON
//! file in the user config dir; failures are silently ignored (log at most)
//! and defaults always apply.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use std::fs;

/// Filesystem layout under the tethering data directory.
///
/// The daemon stack keeps its config under `conf/`, runtime state under
/// `var/` and helper binaries under `bin/`.
#[derive(Debug, Clone)]
pub struct Paths {
    data_dir: PathBuf,
}

impl Paths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn dnsmasq_conf(&self) -> PathBuf {
        self.data_dir.join("conf/dnsmasq.conf")
    }

    pub fn dnsmasq_leases(&self) -> PathBuf {
        self.data_dir.join("var/dnsmasq.leases")
    }

    pub fn dnsmasq_pid(&self) -> PathBuf {
        self.data_dir.join("var/dnsmasq.pid")
    }

    pub fn wpa_supplicant_conf(&self) -> PathBuf {
        self.data_dir.join("conf/wpa_supplicant.conf")
    }

    pub fn tiwlan_ini(&self) -> PathBuf {
        self.data_dir.join("conf/tiwlan.ini")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.data_dir.join("bin")
    }

    pub fn tether_bin(&self) -> PathBuf {
        self.data_dir.join("bin/tether")
    }
}

/// Persisted controller preferences.
///
/// Every field has a serde default so that adding new fields later
/// doesn't break old settings files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Data directory holding the daemon stack's conf/var/bin tree.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Custom DNS server pair (None = use the built-in defaults).
    #[serde(default)]
    pub dns: Option<(String, String)>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/var/lib/tetherkit")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            dns: None,
        }
    }
}

impl Settings {
    /// Settings file path: `~/.config/tetherkit/settings.json`.
    ///
    /// Returns `None` if the home/config directory can't be determined.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tetherkit").join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        let Ok(contents) = fs::read_to_string(&path) else {
            return Self::default();
        };

        serde_json::from_str(&contents).unwrap_or_default()
    }

    /// Save settings to disk. Creates parent directories if needed.
    /// Best-effort — never panics.
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            return;
        };

        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let Ok(json) = serde_json::to_string_pretty(self) else {
            return;
        };

        let _ = fs::write(&path, json);
    }

    pub fn paths(&self) -> Paths {
        Paths::new(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_data_dir_layout() {
        let paths = Paths::new("/data/tether");
        assert_eq!(
            paths.dnsmasq_conf(),
            PathBuf::from("/data/tether/conf/dnsmasq.conf")
        );
        assert_eq!(
            paths.dnsmasq_leases(),
            PathBuf::from("/data/tether/var/dnsmasq.leases")
        );
        assert_eq!(
            paths.dnsmasq_pid(),
            PathBuf::from("/data/tether/var/dnsmasq.pid")
        );
        assert_eq!(
            paths.tiwlan_ini(),
            PathBuf::from("/data/tether/conf/tiwlan.ini")
        );
        assert_eq!(paths.tether_bin(), PathBuf::from("/data/tether/bin/tether"));
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = Settings {
            data_dir: PathBuf::from("/data/tether"),
            dns: Some(("10.0.0.1".into(), "10.0.0.2".into())),
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data_dir, settings.data_dir);
        assert_eq!(back.dns, settings.dns);
    }

    #[test]
    fn settings_default_on_garbage() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.data_dir, default_data_dir());
        assert!(settings.dns.is_none());
    }
}
