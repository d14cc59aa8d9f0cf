//! Command-level error taxonomy
//!
//! Every variant is recovered at the command boundary: the dispatcher renders
//! it into the output panel and the next command starts from a clean slate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a single palette command
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("The '{command}' command requires a Go module, but no go.mod file was found")]
    MissingManifest { command: String, directory: PathBuf },

    #[error("Command timed out after {seconds} seconds: {command}")]
    ProcessTimeout { command: String, seconds: u64 },

    #[error("{action} failed with exit code {exit_code:?}")]
    ProcessFailure {
        action: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("{tool} not found. Install with: {install_hint}")]
    ToolNotFound { tool: String, install_hint: String },

    #[error("No file is open in the active view")]
    NoActiveFile,

    #[error("No test function found near cursor")]
    NoTestFunction,

    #[error("No symbol selected")]
    NoSymbol,

    #[error("go.mod already exists in this project")]
    ManifestExists,

    #[error("Failed to create go.mod for module {module}")]
    ManifestCreation { module: String, stderr: String },

    #[error("Not a Go source file: {}", .0.display())]
    NotGoSource(PathBuf),

    #[error("{0} cancelled")]
    Cancelled(String),

    #[error("Playground error: {0}")]
    Playground(String),

    #[error(transparent)]
    Setup(#[from] crate::dispatcher::SetupError),

    #[error("Error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// Text shown in the output panel for this error
    pub fn panel_text(&self) -> String {
        match self {
            CommandError::MissingManifest { command, .. } => format!(
                "The '{command}' command requires a Go module, but no go.mod file was found.\n\n\
                 This project appears to need module initialization.\n\n\
                 Solutions:\n\
                 1. Run 'Go: Initialize Module'\n\
                 2. Enable auto-creation in settings: 'auto_create_mod = true'\n\
                 3. Run 'go mod init <module-name>' in terminal\n\n\
                 Note: Single Go files with 'package main' can often run without modules."
            ),
            CommandError::ProcessTimeout { .. } => "Command timed out".to_string(),
            CommandError::ManifestCreation { stderr, .. } => {
                format!("Failed to create go.mod:\n{stderr}")
            }
            CommandError::ProcessFailure { action, stderr, .. } => {
                if stderr.trim().is_empty() {
                    format!("{action} failed")
                } else {
                    stderr.clone()
                }
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_manifest_lists_remediations() {
        let err = CommandError::MissingManifest {
            command: "build".to_string(),
            directory: PathBuf::from("/work"),
        };
        let text = err.panel_text();
        assert!(text.starts_with("The 'build' command requires a Go module"));
        assert!(text.contains("1. Run 'Go: Initialize Module'"));
        assert!(text.contains("auto_create_mod"));
        assert!(text.contains("go mod init <module-name>"));
    }

    #[test]
    fn test_process_failure_prefers_stderr() {
        let err = CommandError::ProcessFailure {
            action: "Formatting".to_string(),
            exit_code: Some(2),
            stdout: String::new(),
            stderr: "<standard input>:1:1: expected 'package'".to_string(),
        };
        assert_eq!(err.panel_text(), "<standard input>:1:1: expected 'package'");

        let silent = CommandError::ProcessFailure {
            action: "Formatting".to_string(),
            exit_code: Some(2),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(silent.panel_text(), "Formatting failed");
    }

    #[test]
    fn test_manifest_creation_failure() {
        let err = CommandError::ManifestCreation {
            module: "bad name".to_string(),
            stderr: "go: malformed module path".to_string(),
        };
        assert_eq!(
            err.panel_text(),
            "Failed to create go.mod:\ngo: malformed module path"
        );
    }

    #[test]
    fn test_tool_not_found_carries_hint() {
        let err = CommandError::ToolNotFound {
            tool: "goimports".to_string(),
            install_hint: "go install golang.org/x/tools/cmd/goimports@latest".to_string(),
        };
        assert_eq!(
            err.panel_text(),
            "goimports not found. Install with: go install golang.org/x/tools/cmd/goimports@latest"
        );
    }
}
