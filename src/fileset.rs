//! Installed-fileset version checking.
//!
//! The installed `tether` helper script carries an `@Version=<n>` marker in
//! its leading lines; comparing it against the shipped version decides
//! whether the fileset needs reinstalling.

use std::path::Path;

use tracing::debug;

use crate::textfile;

/// Version of the fileset bundled with this build.
pub const FILESET_VERSION: &str = "10";

/// Check whether the installed artifact at `path` is outdated.
///
/// An absent file reports `false` — not outdated. Otherwise the first
/// three lines are scanned for an `@Version` marker and the text after its
/// first `=` is compared, trimmed, against `expected`. No marker within
/// those lines, or a mismatch, reports `true`.
pub fn is_outdated(path: &Path, expected: &str) -> bool {
    if !path.exists() {
        return false;
    }

    for line in textfile::read_lines(path).iter().take(3) {
        if !line.contains("@Version") {
            continue;
        }
        let installed = line.split_once('=').map(|(_, v)| v.trim());
        debug!(?installed, expected, "found version marker");
        return installed != Some(expected);
    }
    true
}
