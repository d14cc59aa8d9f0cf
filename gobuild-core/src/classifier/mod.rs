//! Project-mode classification
//!
//! Decides, from a file's text and location, whether a toolchain command can
//! run directly against a file or directory or needs a module context.
//!
//! Detection is pattern matching over raw text. Marker tokens inside string
//! literals or comments can produce a wrong verdict; that is a known limit of
//! the approach rather than something callers should work around.

mod context;
pub mod imports;
pub mod module_root;
mod source;

pub use context::ProjectContext;
pub use imports::{classify_import_origin, extract_imports, ImportOrigin};
pub use module_root::{find_module_root, has_manifest, project_root, read_module_name};
pub use source::{SourceFile, SOURCE_EXTENSION, TEST_SUFFIX};

use crate::models::Settings;
use regex::Regex;
use std::sync::LazyLock;

static PACKAGE_MAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bpackage main\b").unwrap());

static MAIN_FUNC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfunc\s+main\s*\(").unwrap());

/// Subcommands that can never run outside a module
const MODULE_ONLY_TOKENS: &[&str] = &["get", "mod", "install"];

/// Subcommands that accept a single file when the program is simple
const SINGLE_FILE_TOKENS: &[&str] = &["run", "fmt", "vet"];

/// Subcommands that accept a file list or directory when the program is simple
const BUILD_TOKENS: &[&str] = &["build", "test"];

/// Heuristic classifier for standalone programs and module requirements
#[derive(Debug, Clone, Default)]
pub struct ProjectModeClassifier {
    extra_standard_namespaces: Vec<String>,
}

impl ProjectModeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier honouring the namespaces configured in `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            extra_standard_namespaces: settings.extra_standard_namespaces.clone(),
        }
    }

    pub fn classify_import_origin(&self, path: &str) -> ImportOrigin {
        classify_import_origin(path, &self.extra_standard_namespaces)
    }

    /// Whether every import in `source` resolves without dependency management
    fn imports_are_standard(&self, source: &str) -> bool {
        extract_imports(source).iter().all(|path| {
            let origin = self.classify_import_origin(path);
            if !origin.is_standard_library() {
                tracing::debug!(import = %path, ?origin, "Import requires a module");
            }
            origin.is_standard_library()
        })
    }

    /// Text declares `package main`, defines `func main(` and imports only
    /// standard library packages.
    pub fn is_standalone_source(&self, source: &str) -> bool {
        if !(PACKAGE_MAIN.is_match(source) && MAIN_FUNC.is_match(source)) {
            return false;
        }
        self.imports_are_standard(source)
    }

    /// Text declares `package main` and imports only standard library
    /// packages; the entry function may live in a sibling file.
    pub fn is_simple_multi_file_source(&self, source: &str) -> bool {
        PACKAGE_MAIN.is_match(source) && self.imports_are_standard(source)
    }

    /// A `.go` file that can be compiled and run on its own
    pub fn is_standalone_program(&self, file: &SourceFile) -> bool {
        file.is_program_entry() && self.is_standalone_source(file.text())
    }

    /// A file whose whole directory can be built together without a manifest
    pub fn is_simple_multi_file(&self, file: &SourceFile) -> bool {
        self.is_simple_multi_file_source(file.text())
    }

    /// Whether running `tokens` for `active_file` needs a module manifest.
    ///
    /// First matching row wins: module-only subcommands always need one;
    /// single-file and build subcommands need one unless the active file is
    /// a standalone or simple multi-file program; anything else never does.
    pub fn command_needs_module<S: AsRef<str>>(
        &self,
        tokens: &[S],
        active_file: Option<&SourceFile>,
    ) -> bool {
        let has_any = |set: &[&str]| tokens.iter().any(|t| set.contains(&t.as_ref()));

        if has_any(MODULE_ONLY_TOKENS) {
            return true;
        }

        if has_any(SINGLE_FILE_TOKENS) || has_any(BUILD_TOKENS) {
            let simple = active_file.is_some_and(|file| {
                self.is_standalone_program(file) || self.is_simple_multi_file(file)
            });
            return !simple;
        }

        false
    }
}
