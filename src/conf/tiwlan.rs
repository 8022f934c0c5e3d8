//! TI wireless-driver ini access and reconciliation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::conf::patch::{self, Assignment};
use crate::config::Paths;
use crate::textfile;

/// The wireless-driver ini, `key = value` shaped.
pub struct TiWlanConf {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TiWlanConf {
    pub fn new(paths: &Paths) -> Self {
        Self {
            path: paths.tiwlan_ini(),
            lock: Mutex::new(()),
        }
    }

    /// Read the ini into a key/value table (missing file reads as empty).
    pub fn read(&self) -> HashMap<String, String> {
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
        table
    }

    /// Rewrite each line containing a target key name to `key = value`.
    ///
    /// Matching is by substring, so a key name that occurs inside another
    /// setting's line will capture that line instead. A key with no
    /// existing line in the file is not added.
    pub fn update(&self, values: &HashMap<String, String>) -> bool {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let assignments: Vec<Assignment> = values
            .iter()
            .map(|(key, value)| Assignment::token(key, format!("{} = {}", key, value)))
            .collect();
        patch::reconcile(&self.path, &assignments)
    }

    /// Rewrite a single setting.
    pub fn update_one(&self, key: &str, value: &str) -> bool {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        self.update(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture(contents: &str) -> (tempfile::TempDir, Paths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::new(dir.path());
        fs::create_dir_all(dir.path().join("conf")).unwrap();
        fs::write(paths.tiwlan_ini(), contents).unwrap();
        (dir, paths)
    }

    #[test]
    fn update_one_rewrites_the_matching_line() {
        let (_dir, paths) = fixture("WiFiAdhoc = 0\ndot11DesiredSSID = OldNet\n");
        let conf = TiWlanConf::new(&paths);

        assert!(conf.update_one("dot11DesiredSSID", "NewNet"));
        let contents = fs::read_to_string(paths.tiwlan_ini()).unwrap();
        assert_eq!(contents, "WiFiAdhoc = 0\ndot11DesiredSSID = NewNet\n");

        assert!(!conf.update_one("dot11DesiredSSID", "NewNet"));
    }

    #[test]
    fn update_cannot_add_a_new_key() {
        let (_dir, paths) = fixture("WiFiAdhoc = 0\n");
        let conf = TiWlanConf::new(&paths);

        assert!(!conf.update_one("dot11DesiredChannel", "6"));
        let contents = fs::read_to_string(paths.tiwlan_ini()).unwrap();
        assert_eq!(contents, "WiFiAdhoc = 0\n");
    }

    #[test]
    fn update_rewrites_every_line_containing_the_key() {
        let (_dir, paths) = fixture("WiFiAdhoc = 0\nWiFiAdhoc = 1\n");
        let conf = TiWlanConf::new(&paths);

        assert!(conf.update_one("WiFiAdhoc", "1"));
        let contents = fs::read_to_string(paths.tiwlan_ini()).unwrap();
        assert_eq!(contents, "WiFiAdhoc = 1\nWiFiAdhoc = 1\n");
    }

    #[test]
    fn read_parses_spaced_pairs() {
        let (_dir, paths) = fixture("WiFiAdhoc = 0\ndot11DesiredChannel = 6\n");
        let conf = TiWlanConf::new(&paths);
        let table = conf.read();
        assert_eq!(table.get("WiFiAdhoc").unwrap(), "0");
        assert_eq!(table.get("dot11DesiredChannel").unwrap(), "6");
    }

    #[test]
    fn update_applies_several_keys_at_once() {
        let (_dir, paths) = fixture("WiFiAdhoc = 0\ndot11DesiredChannel = 1\n");
        let conf = TiWlanConf::new(&paths);

        let mut values = HashMap::new();
        values.insert("WiFiAdhoc".to_string(), "1".to_string());
        values.insert("dot11DesiredChannel".to_string(), "6".to_string());

        assert!(conf.update(&values));
        let table = conf.read();
        assert_eq!(table.get("WiFiAdhoc").unwrap(), "1");
        assert_eq!(table.get("dot11DesiredChannel").unwrap(), "6");
    }
}
