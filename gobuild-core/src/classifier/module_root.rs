//! Module manifest discovery
//!
//! Nothing here caches: a go.mod created between two commands must be seen
//! by the second one.

use std::path::{Path, PathBuf};

/// Manifest file name marking a module root
pub const MANIFEST_FILE: &str = "go.mod";

const MODULE_DIRECTIVE: &str = "module ";

/// Walk `start` and each ancestor in turn, returning the nearest directory
/// that directly contains the manifest.
pub fn find_module_root(start: &Path) -> Option<PathBuf> {
    let found = start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .map(Path::to_path_buf);

    tracing::trace!(start = %start.display(), root = ?found, "Module root lookup");
    found
}

/// Whether `start` or any ancestor is a module root
pub fn has_manifest(start: &Path) -> bool {
    find_module_root(start).is_some()
}

/// Module root of `directory`, or `directory` itself when there is none.
///
/// The fallback is only an execution directory, never a module root.
pub fn project_root(directory: &Path) -> PathBuf {
    find_module_root(directory).unwrap_or_else(|| directory.to_path_buf())
}

/// Module name from the first line of the root's manifest
pub fn read_module_name(root: &Path) -> Option<String> {
    let content = std::fs::read_to_string(root.join(MANIFEST_FILE)).ok()?;
    let first_line = content.lines().next()?.trim();
    first_line
        .strip_prefix(MODULE_DIRECTIVE)
        .map(|name| name.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_no_manifest_anywhere() {
        let temp = tempdir().unwrap();
        let start = temp.path().join("a").join("b");
        std::fs::create_dir_all(&start).unwrap();
        // tempdir ancestors are system directories without go.mod
        assert_eq!(find_module_root(&start), None);
        assert!(!has_manifest(&start));
        assert_eq!(project_root(&start), start);
    }

    #[test]
    fn test_manifest_in_start_directory() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join(MANIFEST_FILE), "module example.com/x\n").unwrap();
        assert_eq!(find_module_root(temp.path()), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn test_nearest_manifest_wins() {
        let temp = tempdir().unwrap();
        let outer = temp.path().join("d1");
        let inner = outer.join("d2").join("d3");
        let start = inner.join("d4").join("d5");
        std::fs::create_dir_all(&start).unwrap();
        std::fs::write(outer.join(MANIFEST_FILE), "module outer\n").unwrap();
        std::fs::write(inner.join(MANIFEST_FILE), "module inner\n").unwrap();

        assert_eq!(find_module_root(&start), Some(inner.clone()));
        assert_eq!(read_module_name(&inner).as_deref(), Some("inner"));
    }

    #[test]
    fn test_directory_named_like_manifest_is_ignored() {
        let temp = tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(find_module_root(temp.path()), None);
    }

    #[test]
    fn test_read_module_name_requires_directive() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join(MANIFEST_FILE), "// comment\nmodule late\n").unwrap();
        assert_eq!(read_module_name(temp.path()), None);

        std::fs::write(
            temp.path().join(MANIFEST_FILE),
            "module github.com/user/project\n\ngo 1.22\n",
        )
        .unwrap();
        assert_eq!(
            read_module_name(temp.path()).as_deref(),
            Some("github.com/user/project")
        );
    }
}
