//! Source file entity

use std::io;
use std::path::{Path, PathBuf};

/// Extension of program entry files
pub const SOURCE_EXTENSION: &str = ".go";

/// Suffix of test files
pub const TEST_SUFFIX: &str = "_test.go";

/// A source file together with the text it had when the command started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read the file fresh from disk
    pub fn read(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let text = std::fs::read_to_string(&path)?;
        Ok(Self { path, text })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the path names a Go source file
    pub fn is_program_entry(&self) -> bool {
        self.path
            .to_str()
            .is_some_and(|p| p.ends_with(SOURCE_EXTENSION))
    }

    pub fn is_test_file(&self) -> bool {
        self.path.to_str().is_some_and(|p| p.ends_with(TEST_SUFFIX))
    }

    /// Directory holding the file
    pub fn directory(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Base name, e.g. `main.go`
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Base name without extension, e.g. `main`
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// For `foo_test.go`, the sibling `foo.go` it most likely tests
    pub fn tested_sibling(&self) -> Option<PathBuf> {
        if !self.is_test_file() {
            return None;
        }
        let name = self.file_name();
        let base = name.strip_suffix(TEST_SUFFIX)?;
        Some(self.directory().join(format!("{base}{SOURCE_EXTENSION}")))
    }
}
