//! Mapping between object keys and local paths
//!
//! Keys are `/`-separated strings. When a key becomes a local path it must
//! stay inside the directory it is joined onto.

use std::path::{Component, Path};

use crate::error::{Error, Result};

/// Remote key for an uploaded file: `prefix` followed by its file name
pub fn upload_key(local_path: &Path, prefix: Option<&str>) -> Result<String> {
    let name = local_path
        .file_name()
        .ok_or_else(|| Error::LocalIo(format!("{}: not a file path", local_path.display())))?
        .to_string_lossy();
    Ok(format!("{}{name}", prefix.unwrap_or_default()))
}

/// Remove `prefix` from the start of `key` when present
pub fn strip_prefix<'a>(key: &'a str, prefix: &str) -> &'a str {
    key.strip_prefix(prefix).unwrap_or(key)
}

/// Interpret a key as a path relative to some local directory
///
/// Rejects keys that would escape that directory or name a directory
/// themselves: empty keys, trailing `/`, absolute paths and `..` segments.
pub fn key_to_relative(key: &str) -> Result<&Path> {
    let path = Path::new(key);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if key.is_empty() || key.ends_with('/') || escapes {
        return Err(Error::InvalidKey(key.to_string()));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_key() {
        assert_eq!(upload_key(Path::new("/tmp/data/a.csv"), None).unwrap(), "a.csv");
        assert_eq!(
            upload_key(Path::new("a.csv"), Some("backups/")).unwrap(),
            "backups/a.csv"
        );
        // Prefix is prepended verbatim
        assert_eq!(
            upload_key(Path::new("a.csv"), Some("2024-")).unwrap(),
            "2024-a.csv"
        );
    }

    #[test]
    fn test_upload_key_without_file_name() {
        assert!(matches!(
            upload_key(Path::new("/"), None),
            Err(Error::LocalIo(_))
        ));
        assert!(upload_key(Path::new("dir/.."), None).is_err());
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("backups/a.tar", "backups/"), "a.tar");
        assert_eq!(strip_prefix("a.tar", "backups/"), "a.tar");
        assert_eq!(strip_prefix("a.tar", ""), "a.tar");
    }

    #[test]
    fn test_key_to_relative() {
        assert_eq!(key_to_relative("a.txt").unwrap(), Path::new("a.txt"));
        assert_eq!(
            key_to_relative("logs/2024/a.log").unwrap(),
            Path::new("logs/2024/a.log")
        );
    }

    #[test]
    fn test_key_to_relative_rejects_escapes() {
        for key in ["", "dir/", "../etc/passwd", "a/../../b", "/etc/passwd"] {
            assert!(
                matches!(key_to_relative(key), Err(Error::InvalidKey(_))),
                "{key} should be rejected"
            );
        }
    }
}
