//! Presence probes
//!
//! A probe answers one question for a term missing from the registry: does
//! the implementation source mention it? The answer only picks between the
//! "unknown" and "absent" icons, so every probe fails open to `false`.
//!
//! All probes look for the term as a double-quoted string literal, matched
//! case-insensitively, in files selected by a pathspec glob such as
//! `src/*.rs`.

mod search;

#[cfg(feature = "git-probe")]
mod git_index;

use crate::error::{FeatCmpError, Result};
use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[cfg(feature = "git-probe")]
pub use git_index::GitIndexProbe;

/// Capability to check whether a term occurs in the implementation
pub trait PresenceProbe {
    fn probe(&self, term: &str) -> bool;

    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> PresenceProbe for F
where
    F: Fn(&str) -> bool,
{
    fn probe(&self, term: &str) -> bool {
        self(term)
    }
}

/// Probe that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProbe;

impl PresenceProbe for NoProbe {
    fn probe(&self, _term: &str) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// The literal a probe searches for
pub fn needle(term: &str) -> String {
    format!("\"{}\"", term)
}

/// Glob matching with git pathspec semantics, where `*` also crosses `/`
pub(crate) fn pathspec_matches(pattern: &Pattern, relative: &Path) -> bool {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    pattern.matches_path_with(relative, options)
}

pub(crate) fn compile_pathspec(pathspec: &str) -> Result<Pattern> {
    Pattern::new(pathspec)
        .map_err(|e| FeatCmpError::ProbeSetup(format!("invalid pathspec {}: {}", pathspec, e)))
}

/// Runs `git grep` in the implementation checkout
#[derive(Debug, Clone)]
pub struct GitGrepProbe {
    repo: PathBuf,
    pathspec: String,
}

impl GitGrepProbe {
    pub fn new(repo: impl Into<PathBuf>, pathspec: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            pathspec: pathspec.into(),
        }
    }
}

impl PresenceProbe for GitGrepProbe {
    fn probe(&self, term: &str) -> bool {
        let status = Command::new("git")
            .arg("grep")
            .arg("-i")
            .arg("-q")
            .arg("-F")
            .arg(needle(term))
            .arg(&self.pathspec)
            .current_dir(&self.repo)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => status.success(),
            Err(e) => {
                debug!("git grep for {} failed to run: {}", term, e);
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "git"
    }
}

/// Walks the implementation tree and searches matching files in-process
///
/// The file list is collected once when the probe is built.
#[derive(Debug, Clone)]
pub struct SourceTreeProbe {
    files: Vec<PathBuf>,
}

impl SourceTreeProbe {
    pub fn new(root: &Path, pathspec: &str) -> Result<Self> {
        let pattern = compile_pathspec(pathspec)?;
        if !root.is_dir() {
            return Err(FeatCmpError::ProbeSetup(format!(
                "{}: not a directory",
                root.display()
            )));
        }

        let mut files = Vec::new();
        let walker = WalkBuilder::new(root).hidden(true).git_ignore(true).build();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                        continue;
                    }
                    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
                    if pathspec_matches(&pattern, relative) {
                        files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => debug!("skipping entry while walking {}: {}", root.display(), e),
            }
        }
        files.sort();
        debug!("source tree probe covers {} files", files.len());

        Ok(Self { files })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl PresenceProbe for SourceTreeProbe {
    fn probe(&self, term: &str) -> bool {
        search::any_file_contains(&self.files, &needle(term))
    }

    fn name(&self) -> &'static str {
        "tree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn impl_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src/units")).unwrap();
        fs::write(
            tmp.path().join("src/units/service.rs"),
            "match key {\n    \"EXECSTART\" => {}\n    \"RESTART\" => {}\n}\n",
        )
        .unwrap();
        fs::write(tmp.path().join("src/notes.txt"), "\"FooBar\"\n").unwrap();
        fs::write(tmp.path().join("README.rs"), "\"TopLevel\"\n").unwrap();
        tmp
    }

    fn git(dir: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_closure_is_probe() {
        let probe = |term: &str| term == "FooBar";
        assert!(probe.probe("FooBar"));
        assert!(!probe.probe("Other"));
        assert_eq!(PresenceProbe::name(&probe), "custom");
    }

    #[test]
    fn test_no_probe() {
        assert!(!NoProbe.probe("ExecStart"));
    }

    #[test]
    fn test_needle_is_quoted() {
        assert_eq!(needle("Restart"), "\"Restart\"");
    }

    #[test]
    fn test_pathspec_star_crosses_directories() {
        let pattern = compile_pathspec("src/*.rs").unwrap();
        assert!(pathspec_matches(&pattern, Path::new("src/main.rs")));
        assert!(pathspec_matches(&pattern, Path::new("src/units/service.rs")));
        assert!(!pathspec_matches(&pattern, Path::new("tests/a.rs")));
        assert!(!pathspec_matches(&pattern, Path::new("src/notes.txt")));
    }

    #[test]
    fn test_invalid_pathspec() {
        assert!(matches!(
            compile_pathspec("src/[*.rs"),
            Err(FeatCmpError::ProbeSetup(_))
        ));
    }

    #[test]
    fn test_source_tree_probe_case_insensitive_quoted() {
        let tmp = impl_tree();
        let probe = SourceTreeProbe::new(tmp.path(), "src/*.rs").unwrap();
        assert_eq!(probe.files().len(), 1);
        assert!(probe.probe("ExecStart"));
        assert!(probe.probe("restart"));
        // Only as a substring of a longer literal
        assert!(!probe.probe("Exec"));
        // Outside the pathspec
        assert!(!probe.probe("FooBar"));
        assert!(!probe.probe("TopLevel"));
    }

    #[test]
    fn test_source_tree_probe_missing_root() {
        let err = SourceTreeProbe::new(Path::new("/nonexistent/impl"), "src/*.rs").unwrap_err();
        assert!(matches!(err, FeatCmpError::ProbeSetup(_)));
    }

    #[test]
    fn test_git_grep_probe_fails_open_outside_repository() {
        let tmp = impl_tree();
        let probe = GitGrepProbe::new(tmp.path(), "src/*.rs");
        assert!(!probe.probe("ExecStart"));
        let missing = GitGrepProbe::new("/nonexistent/impl", "src/*.rs");
        assert!(!missing.probe("ExecStart"));
    }

    #[test]
    fn test_git_grep_probe_finds_tracked_literal() {
        let tmp = impl_tree();
        fs::write(tmp.path().join("src/dots.rs"), "\"A.B\"\n").unwrap();
        if !git(tmp.path(), &["init", "-q"]) {
            // git is not installed
            return;
        }
        assert!(git(tmp.path(), &["add", "."]));

        let probe = GitGrepProbe::new(tmp.path(), "src/*.rs");
        assert!(probe.probe("ExecStart"));
        assert!(probe.probe("restart"));
        assert!(probe.probe("a.b"));
        assert!(!probe.probe("AxB"));
        assert!(!probe.probe("FooBar"));
        assert!(!probe.probe("TopLevel"));
    }
}
