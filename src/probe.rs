//! Executable probe for candidate paths.

use std::path::Path;

/// True when `path` is a regular file with at least one execute bit set.
///
/// Evaluated on every call; installation may create the file at any time.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// True when `path` is a regular file.
///
/// Windows has no execute bit; executables are identified by extension and
/// shell association, so existence is the whole check.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_is_not_executable() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        assert!(!is_executable(&temp.path().join("nope")));
    }

    #[test]
    fn directory_is_not_executable() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        assert!(!is_executable(temp.path()));
    }

    #[cfg(unix)]
    #[test]
    fn execute_bit_decides_on_unix() {
        use std::os::unix::fs::PermissionsExt;
        let temp = tempfile::TempDir::new().expect("temp dir");
        let path = temp.path().join("composer");
        std::fs::write(&path, "#!/bin/sh\n").expect("write");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).expect("chmod");
        assert!(!is_executable(&path));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o744)).expect("chmod");
        assert!(is_executable(&path));
    }
}
