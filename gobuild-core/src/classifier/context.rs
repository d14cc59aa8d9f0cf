//! Per-invocation project context

use super::module_root::{find_module_root, project_root};
use super::{ProjectModeClassifier, SourceFile};
use std::path::{Path, PathBuf};

/// Everything the classifier knows about the file a command was issued for.
///
/// Built fresh for each command and dropped afterwards.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    classifier: ProjectModeClassifier,
    active_file: Option<SourceFile>,
    start_directory: PathBuf,
}

impl ProjectContext {
    pub fn new(
        classifier: ProjectModeClassifier,
        active_file: Option<SourceFile>,
        fallback_directory: PathBuf,
    ) -> Self {
        let start_directory = active_file
            .as_ref()
            .map(SourceFile::directory)
            .unwrap_or(fallback_directory);
        Self {
            classifier,
            active_file,
            start_directory,
        }
    }

    pub fn classifier(&self) -> &ProjectModeClassifier {
        &self.classifier
    }

    pub fn active_file(&self) -> Option<&SourceFile> {
        self.active_file.as_ref()
    }

    /// Directory of the active file, or the fallback when there is none
    pub fn start_directory(&self) -> &Path {
        &self.start_directory
    }

    pub fn is_standalone(&self) -> bool {
        self.active_file
            .as_ref()
            .is_some_and(|f| self.classifier.is_standalone_program(f))
    }

    pub fn is_simple_multi_file(&self) -> bool {
        self.active_file
            .as_ref()
            .is_some_and(|f| self.classifier.is_simple_multi_file(f))
    }

    pub fn module_root(&self) -> Option<PathBuf> {
        find_module_root(&self.start_directory)
    }

    /// Module root, or the start directory when there is no module
    pub fn execution_root(&self) -> PathBuf {
        project_root(&self.start_directory)
    }

    pub fn needs_module<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        self.classifier
            .command_needs_module(tokens, self.active_file.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_context_without_file_uses_fallback() {
        let temp = tempdir().unwrap();
        let ctx = ProjectContext::new(
            ProjectModeClassifier::new(),
            None,
            temp.path().to_path_buf(),
        );
        assert_eq!(ctx.start_directory(), temp.path());
        assert!(!ctx.is_standalone());
        assert!(ctx.needs_module(&["build", "."]));
        assert_eq!(ctx.execution_root(), temp.path().to_path_buf());
    }

    #[test]
    fn test_context_sees_manifest_created_later() {
        let temp = tempdir().unwrap();
        let file = SourceFile::new(temp.path().join("main.go"), "package lib\n");
        let ctx = ProjectContext::new(ProjectModeClassifier::new(), Some(file), PathBuf::new());

        assert_eq!(ctx.module_root(), None);
        std::fs::write(temp.path().join("go.mod"), "module demo\n").unwrap();
        assert_eq!(ctx.module_root(), Some(temp.path().to_path_buf()));
    }
}
