//! Where page documents come from

use crate::error::{FeatCmpError, Result};
use crate::extract::Document;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Loads the document for a page name
pub trait PageSource {
    fn load(&self, page: &str) -> Result<Document>;
}

/// The `man/` directory of a systemd checkout
#[derive(Debug, Clone)]
pub struct ManDirectory {
    dir: PathBuf,
}

impl ManDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, page: &str) -> PathBuf {
        self.dir.join(format!("{}.xml", page))
    }
}

impl PageSource for ManDirectory {
    fn load(&self, page: &str) -> Result<Document> {
        let path = self.path_for(page);
        let source = std::fs::read_to_string(&path).map_err(|source| FeatCmpError::ReadPage {
            page: page.to_string(),
            path,
            source,
        })?;
        Ok(Document::new(source))
    }
}

/// In-memory pages keyed by name
impl PageSource for BTreeMap<String, String> {
    fn load(&self, page: &str) -> Result<Document> {
        self.get(page)
            .map(|source| Document::new(source.as_str()))
            .ok_or_else(|| FeatCmpError::MissingPage(page.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_man_directory_reads_page() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sd_notify.xml"), "<r><term>READY=1</term></r>").unwrap();
        let man = ManDirectory::new(tmp.path());
        let doc = man.load("sd_notify").unwrap();
        assert_eq!(doc.terms().count(), 1);
    }

    #[test]
    fn test_man_directory_missing_page() {
        let tmp = TempDir::new().unwrap();
        let man = ManDirectory::new(tmp.path());
        match man.load("systemd.timer") {
            Err(FeatCmpError::ReadPage { page, path, .. }) => {
                assert_eq!(page, "systemd.timer");
                assert_eq!(path, tmp.path().join("systemd.timer.xml"));
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_in_memory_missing_page() {
        let pages: BTreeMap<String, String> = BTreeMap::new();
        assert!(matches!(pages.load("x"), Err(FeatCmpError::MissingPage(_))));
    }
}
