// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Fetch-by-name access to the UCD reference files.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use crate::apperr::{Error, Result};

pub trait Source {
    /// Returns the lines of the reference file `name`, e.g. `"DerivedCoreProperties.txt"`.
    fn lines(&self, name: &str) -> Result<Rc<[String]>>;
}

/// Reads files from a local UCD directory (e.g. an unpacked `UCD.zip`).
/// Each file is read at most once.
pub struct DirSource {
    root: PathBuf,
    cache: RefCell<HashMap<String, Rc<[String]>>>,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), cache: Default::default() }
    }
}

impl Source for DirSource {
    fn lines(&self, name: &str) -> Result<Rc<[String]>> {
        if let Some(lines) = self.cache.borrow().get(name) {
            return Ok(lines.clone());
        }

        let path = self.root.join(name);
        let text = fs::read_to_string(&path)
            .map_err(|source| Error::Io { name: path.display().to_string(), source })?;
        let lines: Rc<[String]> = text.lines().map(str::to_string).collect();
        tracing::debug!(path = %path.display(), lines = lines.len(), "loaded reference file");

        self.cache.borrow_mut().insert(name.to_string(), lines.clone());
        Ok(lines)
    }
}

/// Serves reference files from memory.
#[derive(Default)]
pub struct MemorySource {
    files: HashMap<String, Rc<[String]>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, text: &str) -> Self {
        self.files.insert(name.to_string(), text.lines().map(str::to_string).collect());
        self
    }
}

impl Source for MemorySource {
    fn lines(&self, name: &str) -> Result<Rc<[String]>> {
        self.files.get(name).cloned().ok_or_else(|| Error::Io {
            name: name.to_string(),
            source: std::io::ErrorKind::NotFound.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Test.txt"), "a\nb\n").unwrap();

        let source = DirSource::new(dir.path());
        let lines = source.lines("Test.txt").unwrap();
        assert_eq!(&*lines, ["a", "b"]);

        // Served from the cache from now on.
        fs::remove_file(dir.path().join("Test.txt")).unwrap();
        let again = source.lines("Test.txt").unwrap();
        assert!(Rc::ptr_eq(&lines, &again));

        assert!(matches!(source.lines("Missing.txt"), Err(Error::Io { .. })));
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new().with("Test.txt", "x\r\ny");
        assert_eq!(&*source.lines("Test.txt").unwrap(), ["x", "y"]);
        assert!(source.lines("Other.txt").is_err());
    }
}
