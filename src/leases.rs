//! dnsmasq lease table parsing.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{Result, TetherError};
use crate::textfile;

/// A connected DHCP client, keyed by MAC address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseRecord {
    pub mac_address: String,
    pub ip_address: String,
    pub hostname: String,
    pub connect_time: DateTime<Utc>,
    pub connected: bool,
}

/// Parse the dnsmasq lease file into a MAC-keyed client map.
///
/// The map is rebuilt from scratch on every call; a later line with the
/// same MAC overwrites the earlier record. A missing file parses as an
/// empty map, but a malformed line fails the whole call — the caller
/// decides whether to keep a previously cached view.
pub fn parse_leases(path: &Path) -> Result<HashMap<String, LeaseRecord>> {
    let mut leases = HashMap::new();

    for line in textfile::read_lines(path) {
        if line.is_empty() {
            continue;
        }
        let record = parse_lease_line(&line)?;
        leases.insert(record.mac_address.clone(), record);
    }

    debug!(count = leases.len(), "parsed lease table");
    Ok(leases)
}

/// One lease line: `<epochSeconds> <macAddress> <ipAddress> <hostname>`.
fn parse_lease_line(line: &str) -> Result<LeaseRecord> {
    let fields: Vec<&str> = line.split(' ').collect();
    if fields.len() < 4 {
        return Err(TetherError::ParseError(format!(
            "lease line has {} fields, expected 4: {:?}",
            fields.len(),
            line
        )));
    }

    let epoch_seconds: i64 = fields[0]
        .parse()
        .map_err(|_| TetherError::ParseError(format!("bad lease expiry: {:?}", fields[0])))?;
    // The lease file carries whole seconds; widen to milliseconds.
    let connect_time = DateTime::from_timestamp_millis(epoch_seconds * 1000)
        .ok_or_else(|| TetherError::ParseError(format!("lease expiry out of range: {}", epoch_seconds)))?;

    Ok(LeaseRecord {
        mac_address: fields[1].to_string(),
        ip_address: fields[2].to_string(),
        hostname: fields[3].to_string(),
        connect_time,
        connected: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_a_single_lease() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dnsmasq.leases");
        fs::write(&path, "1717000000 aa:bb:cc:dd:ee:ff 192.168.1.5 myphone\n").unwrap();

        let leases = parse_leases(&path).unwrap();
        assert_eq!(leases.len(), 1);
        let record = &leases["aa:bb:cc:dd:ee:ff"];
        assert_eq!(record.ip_address, "192.168.1.5");
        assert_eq!(record.hostname, "myphone");
        assert_eq!(record.connect_time.timestamp_millis(), 1_717_000_000_000);
        assert!(record.connected);
    }

    #[test]
    fn later_duplicate_mac_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dnsmasq.leases");
        fs::write(
            &path,
            "1717000000 aa:bb:cc:dd:ee:ff 192.168.1.5 myphone\n\
             1717000500 aa:bb:cc:dd:ee:ff 192.168.1.9 myphone\n",
        )
        .unwrap();

        let leases = parse_leases(&path).unwrap();
        assert_eq!(leases.len(), 1);
        assert_eq!(leases["aa:bb:cc:dd:ee:ff"].ip_address, "192.168.1.9");
    }

    #[test]
    fn malformed_line_fails_the_whole_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dnsmasq.leases");
        fs::write(
            &path,
            "1717000000 aa:bb:cc:dd:ee:ff 192.168.1.5 myphone\n\
             1717000500 aa:bb:cc:dd:ee:00\n",
        )
        .unwrap();

        assert!(parse_leases(&path).is_err());
    }

    #[test]
    fn missing_file_parses_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let leases = parse_leases(&dir.path().join("absent.leases")).unwrap();
        assert!(leases.is_empty());
    }
}
