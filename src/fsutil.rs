//! Directory write checks and file creation helpers.

use std::fs;
use std::io;
use std::path::Path;

/// Ensure `dir` exists and that a file can be created inside it.
///
/// A probe file is created and removed again; any failure is returned as is.
pub fn check_write_permission(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let probe = dir.join(format!(".write-test-{}", std::process::id()));
    fs::File::create(&probe)?;
    fs::remove_file(&probe)
}

/// Create `dir` and its parents when missing.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir)
}

/// Write `contents` to `path`, creating parents, and apply `mode` on Unix.
pub fn write_file_with_mode(path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, contents)?;
    set_mode(path, mode)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_write_permission_creates_dir_and_leaves_no_probe() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let dir = temp.path().join("a").join("b");
        check_write_permission(&dir).expect("writable");
        assert!(dir.is_dir());
        let leftovers: Vec<_> = fs::read_dir(&dir).expect("read dir").collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn check_write_permission_fails_below_a_file() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let file = temp.path().join("plain");
        fs::write(&file, "x").expect("write");
        assert!(check_write_permission(&file.join("bin")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn write_file_with_mode_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let temp = tempfile::TempDir::new().expect("temp dir");
        let path = temp.path().join("bin").join("composer");
        write_file_with_mode(&path, b"#!/bin/sh\n", 0o755).expect("write");
        let mode = fs::metadata(&path).expect("meta").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
