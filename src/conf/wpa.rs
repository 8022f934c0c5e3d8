//! wpa_supplicant config access and reconciliation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::conf::patch::{self, Assignment};
use crate::config::Paths;
use crate::textfile;

/// The wireless-security config, a flat `key=value` file.
pub struct WpaSupplicantConf {
    path: PathBuf,
    lock: Mutex<()>,
}

impl WpaSupplicantConf {
    pub fn new(paths: &Paths) -> Self {
        Self {
            path: paths.wpa_supplicant_conf(),
            lock: Mutex::new(()),
        }
    }

    /// Read the file into a key/value table.
    ///
    /// Returns `None` when the file is absent. Lines are split on the first
    /// `=`; lines without one, or with an empty key or value, are skipped.
    pub fn read(&self) -> Option<HashMap<String, String>> {
        if !self.path.exists() {
            return None;
        }

        let mut table = HashMap::new();
        for line in textfile::read_lines(&self.path) {
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();
                if !key.is_empty() && !value.is_empty() {
                    table.insert(key.to_string(), value.to_string());
                }
            }
        }
        Some(table)
    }

    /// Rewrite every `key=value` line whose key appears in `values`.
    ///
    /// The replacement is the flat `key=value` form; a desired value that
    /// itself contains `=` is written as-is and will split differently on
    /// the next read.
    pub fn update(&self, values: &HashMap<String, String>) -> bool {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let assignments: Vec<Assignment> = values
            .iter()
            .map(|(key, value)| Assignment::key(key, format!("{}={}", key, value)))
            .collect();
        patch::reconcile(&self.path, &assignments)
    }
}
