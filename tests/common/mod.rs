#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Write a script and mark it executable.
pub fn make_executable(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("write script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    }
    path
}

/// An environment variable name no other test touches.
pub fn unique_var(tag: &str) -> String {
    format!("COMPOSER_KIT_TEST_{}_{}", tag, std::process::id())
}
