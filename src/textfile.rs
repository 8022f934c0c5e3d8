//! Lenient line-oriented file IO shared by the config reconcilers and parsers.
//!
//! Reads never fail: a missing or unreadable file yields an empty line list
//! (log at most). Writes overwrite the whole file in place — no temp file,
//! no rename — matching the on-disk behavior the daemons already tolerate.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;

/// Read all lines of a file, trimming each.
///
/// A file that doesn't exist or can't be read is reported as having no lines.
pub fn read_lines(path: &Path) -> Vec<String> {
    debug!(path = %path.display(), "reading lines from file");
    match fs::read_to_string(path) {
        Ok(contents) => contents.lines().map(|l| l.trim().to_string()).collect(),
        Err(e) => {
            warn!(path = %path.display(), "could not read file: {}", e);
            Vec::new()
        }
    }
}

/// Overwrite `path` with `lines`, each followed by a newline.
///
/// Truncates and rewrites in place; a crash mid-write can leave the file
/// partially written.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    debug!(path = %path.display(), count = lines.len(), "writing lines to file");
    let mut file = fs::File::create(path)?;
    for line in lines {
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let lines = read_lines(&dir.path().join("nope.conf"));
        assert!(lines.is_empty());
    }

    #[test]
    fn lines_are_trimmed_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.conf");
        fs::write(&path, "  one  \n\ttwo\n").unwrap();
        assert_eq!(read_lines(&path), vec!["one", "two"]);
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.conf");
        let lines = vec!["alpha".to_string(), "beta".to_string()];
        write_lines(&path, &lines).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "alpha\nbeta\n");
    }
}
