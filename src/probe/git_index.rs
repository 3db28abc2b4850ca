//! In-process `git grep` using libgit2 for the file list

use super::{compile_pathspec, needle, pathspec_matches, search, PresenceProbe};
use crate::error::{FeatCmpError, Result};
use git2::Repository;
use log::debug;
use std::path::{Path, PathBuf};

/// Searches the working-tree copies of tracked files
///
/// Like `git grep`, the pathspec is relative to `root`, which may be any
/// directory inside the checkout. Untracked files are never searched.
#[derive(Debug, Clone)]
pub struct GitIndexProbe {
    files: Vec<PathBuf>,
}

impl GitIndexProbe {
    pub fn new(root: &Path, pathspec: &str) -> Result<Self> {
        let pattern = compile_pathspec(pathspec)?;
        let root = root
            .canonicalize()
            .map_err(|e| FeatCmpError::ProbeSetup(format!("{}: {}", root.display(), e)))?;

        let repo = Repository::discover(&root)
            .map_err(|e| FeatCmpError::ProbeSetup(format!("no git repository: {}", e.message())))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| FeatCmpError::ProbeSetup("repository has no working tree".to_string()))?;
        let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
        let prefix = root.strip_prefix(&workdir).unwrap_or(Path::new(""));

        let index = repo
            .index()
            .map_err(|e| FeatCmpError::ProbeSetup(format!("cannot read index: {}", e.message())))?;

        let mut files = Vec::new();
        for entry in index.iter() {
            let Ok(tracked) = std::str::from_utf8(&entry.path) else {
                continue;
            };
            let Ok(relative) = Path::new(tracked).strip_prefix(prefix) else {
                continue;
            };
            if pathspec_matches(&pattern, relative) {
                files.push(workdir.join(tracked));
            }
        }
        debug!("git index probe covers {} tracked files", files.len());

        Ok(Self { files })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl PresenceProbe for GitIndexProbe {
    fn probe(&self, term: &str) -> bool {
        search::any_file_contains(&self.files, &needle(term))
    }

    fn name(&self) -> &'static str {
        "index"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tracked_repo() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let repo = Repository::init(tmp.path()).unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(tmp.path().join("src/lib.rs"), "const A: &str = \"ListenStream\";\n").unwrap();
        fs::write(tmp.path().join("src/untracked.rs"), "const B: &str = \"Untracked\";\n").unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new("src/lib.rs")).unwrap();
        index.write().unwrap();
        tmp
    }

    #[test]
    fn test_only_tracked_files_are_searched() {
        let tmp = tracked_repo();
        let probe = GitIndexProbe::new(tmp.path(), "src/*.rs").unwrap();
        assert_eq!(probe.files().len(), 1);
        assert!(probe.probe("listenstream"));
        assert!(!probe.probe("Untracked"));
    }

    #[test]
    fn test_pathspec_relative_to_subdirectory() {
        let tmp = tracked_repo();
        let probe = GitIndexProbe::new(&tmp.path().join("src"), "*.rs").unwrap();
        assert!(probe.probe("ListenStream"));
    }

    #[test]
    fn test_outside_repository_is_setup_error() {
        let tmp = TempDir::new().unwrap();
        let err = GitIndexProbe::new(tmp.path(), "src/*.rs").unwrap_err();
        assert!(matches!(err, FeatCmpError::ProbeSetup(_)));
    }
}
