//! Nested module manifest discovery

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::PomError;
use crate::maven::constants::files;

/// Every `pom.xml` below `root`, excluding `root/pom.xml` itself
///
/// `target/` build output, `src/` trees and hidden directories are skipped.
/// A `pom.xml` under `src/` is a test fixture or resource, never a module.
pub fn find_module_manifests(root: &Path) -> Result<Vec<PathBuf>, PomError> {
    let root_manifest = root.join(files::POM);
    let mut found = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

    for entry in walker {
        let entry = entry.map_err(|source| PomError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || entry.file_name() != files::POM {
            continue;
        }
        let path = entry.into_path();
        if path != root_manifest {
            found.push(path);
        }
    }

    found.sort();
    Ok(found)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| matches!(name, "target" | "src") || name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<project/>").unwrap();
    }

    #[test]
    fn test_finds_nested_manifests() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("pom.xml"));
        touch(&root.join("core/pom.xml"));
        touch(&root.join("web/api/pom.xml"));
        touch(&root.join("core/target/classes/pom.xml"));
        touch(&root.join(".git/pom.xml"));
        touch(&root.join("core/notes.xml"));

        let found = find_module_manifests(root).unwrap();
        assert_eq!(
            found,
            vec![root.join("core/pom.xml"), root.join("web/api/pom.xml")]
        );
    }

    #[test]
    fn test_skips_manifests_under_src() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("pom.xml"));
        touch(&root.join("core/pom.xml"));
        touch(&root.join("core/src/test/resources/pom.xml"));
        touch(&root.join("src/it/simple/pom.xml"));

        let found = find_module_manifests(root).unwrap();
        assert_eq!(found, vec![root.join("core/pom.xml")]);
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_module_manifests(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, PomError::Walk { .. }));
    }
}
