//! Operating system identification and per-OS candidate locations.

use std::fmt;
use std::path::PathBuf;

/// Operating systems the toolkit knows how to search and install on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Os {
    Windows,
    MacOs,
    Linux,
    /// BSD family and other Unix systems served by the generic installer.
    Unix(String),
    /// Anything else; detection still works, installation does not.
    Other(String),
}

impl Os {
    /// The OS this process is running on.
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Map an OS identifier (`std::env::consts::OS` style) to a variant.
    pub fn from_name(name: &str) -> Self {
        match name {
            "windows" => Os::Windows,
            "macos" | "darwin" => Os::MacOs,
            "linux" => Os::Linux,
            "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Os::Unix(name.to_string()),
            other => Os::Other(other.to_string()),
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Os::Windows)
    }

    /// Likely composer locations, in priority order.
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        match self {
            Os::Windows => windows_paths(),
            Os::MacOs => {
                let mut paths = vec![
                    PathBuf::from("/usr/local/bin/composer"),
                    PathBuf::from("/usr/bin/composer"),
                    PathBuf::from("/opt/homebrew/bin/composer"),
                ];
                paths.extend(home_paths());
                paths.extend(local_paths());
                paths
            }
            Os::Linux | Os::Unix(_) | Os::Other(_) => {
                let mut paths = vec![
                    PathBuf::from("/usr/local/bin/composer"),
                    PathBuf::from("/usr/bin/composer"),
                ];
                paths.extend(home_paths());
                paths.extend(local_paths());
                paths
            }
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Windows => f.write_str("windows"),
            Os::MacOs => f.write_str("macos"),
            Os::Linux => f.write_str("linux"),
            Os::Unix(name) | Os::Other(name) => f.write_str(name),
        }
    }
}

fn home_paths() -> Vec<PathBuf> {
    let Some(home) = std::env::var_os("HOME") else {
        return Vec::new();
    };
    let home = PathBuf::from(home);
    vec![
        home.join(".composer/vendor/bin/composer"),
        home.join("composer.phar"),
    ]
}

fn local_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("./composer"), PathBuf::from("./composer.phar")]
}

fn windows_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for var in ["APPDATA", "ProgramFiles", "ProgramFiles(x86)"] {
        if let Some(base) = std::env::var_os(var) {
            paths.push(PathBuf::from(base).join("Composer").join("composer.phar"));
        }
    }
    paths.extend(
        ["composer.phar", "composer.bat", "composer"]
            .into_iter()
            .map(PathBuf::from),
    );
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_maps_known_systems() {
        assert_eq!(Os::from_name("windows"), Os::Windows);
        assert_eq!(Os::from_name("darwin"), Os::MacOs);
        assert_eq!(Os::from_name("macos"), Os::MacOs);
        assert_eq!(Os::from_name("linux"), Os::Linux);
        assert_eq!(Os::from_name("freebsd"), Os::Unix("freebsd".to_string()));
        assert_eq!(Os::from_name("plan9"), Os::Other("plan9".to_string()));
    }

    #[test]
    fn unix_candidates_start_with_system_bin() {
        let paths = Os::Linux.candidate_paths();
        assert_eq!(paths[0], PathBuf::from("/usr/local/bin/composer"));
        assert!(paths.contains(&PathBuf::from("./composer.phar")));
        assert!(!paths.contains(&PathBuf::from("/opt/homebrew/bin/composer")));
    }

    #[test]
    fn macos_candidates_include_homebrew() {
        let paths = Os::MacOs.candidate_paths();
        assert!(paths.contains(&PathBuf::from("/opt/homebrew/bin/composer")));
    }

    #[test]
    fn windows_candidates_end_with_bare_names() {
        let paths = Os::Windows.candidate_paths();
        let tail: Vec<_> = paths.iter().rev().take(3).collect();
        assert_eq!(tail[0], &PathBuf::from("composer"));
        assert_eq!(tail[1], &PathBuf::from("composer.bat"));
        assert_eq!(tail[2], &PathBuf::from("composer.phar"));
    }
}
