//! Path helpers for config and data directory arguments

use std::path::PathBuf;

/// Expand a user-supplied path to an absolute path.
///
/// - `~` and `~/rest` resolve against the home directory
/// - relative paths (`data`, `./data`, `../data`) resolve against the cwd
/// - absolute paths are returned unchanged
/// - blank input resolves to the cwd
///
/// ```text
/// expand_path("~/.tracekeep")  // -> /home/user/.tracekeep
/// expand_path("./data")        // -> /current/dir/./data
/// expand_path("/var/lib/tk")   // -> /var/lib/tk
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(path))
    } else if let Some(rest) = path.strip_prefix("~/") {
        match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        }
    } else {
        PathBuf::from(path)
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_absolute_unchanged() {
        assert_eq!(expand_path("/var/lib/tracekeep"), PathBuf::from("/var/lib/tracekeep"));
    }

    #[test]
    fn test_expand_path_relative_becomes_absolute() {
        let result = expand_path("./tracekeep.json");
        assert!(result.is_absolute());
        assert!(result.ends_with("tracekeep.json"));

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(expand_path(".."), cwd.join(".."));
    }

    #[test]
    fn test_expand_path_tilde() {
        let result = expand_path("~/.tracekeep");
        assert!(result.is_absolute());
        assert!(!result.to_string_lossy().contains('~'));
        assert!(result.ends_with(".tracekeep"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~"), home);
        }
    }

    #[test]
    fn test_expand_path_trims_and_handles_blank() {
        assert_eq!(expand_path("  /data  "), PathBuf::from("/data"));
        assert!(expand_path("   ").is_absolute());
    }
}
