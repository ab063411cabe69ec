mod compare;
mod convert;
mod merge;
mod reverse;

pub use compare::execute_compare;
pub use convert::execute_convert;
pub use merge::execute_merge;
pub use reverse::execute_reverse;

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Collect files with one of the given extensions under a directory,
/// recursing into subdirectories, in sorted order
pub(crate) fn collect_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_into(dir, extensions, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_into(dir: &Path, extensions: &[&str], files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_into(&path, extensions, files)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext))
        {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_recurses_and_filters() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("a.yaml")).unwrap();
        File::create(dir.path().join("skip.txt")).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        File::create(dir.path().join("nested/b.yml")).unwrap();

        let files = collect_files(dir.path(), &["yaml", "yml"]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().is_some()));
    }
}
