//! Output panel rendering

use crate::classifier::{has_manifest, read_module_name, ProjectContext};
use crate::models::{Invocation, ProcessOutput};
use serde_json::{Map, Value};

/// Title of the output panel
pub const PANEL_TITLE: &str = "Go Output";

const RULE_WIDTH: usize = 50;

/// Default rendering of a finished tool run
pub fn render_output(invocation: &Invocation, output: &ProcessOutput) -> String {
    let mut text = format!(
        "Command: {}\nDirectory: {}\n\n",
        invocation.command_line(),
        invocation.cwd.display()
    );
    if !output.stdout.is_empty() {
        text.push_str(&format!("Output:\n{}\n", output.stdout));
    }
    if !output.stderr.is_empty() {
        text.push_str(&format!("Errors:\n{}\n", output.stderr));
    }
    let exit_code = output
        .exit_code
        .map_or_else(|| "terminated by signal".to_string(), |code| code.to_string());
    text.push_str(&format!("\nExit code: {}", exit_code));
    text
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Environment report built from `go env -json` output.
///
/// Returns `None` when the output isn't a JSON object, in which case the raw
/// text is shown instead.
pub fn render_environment(env_json: &str, ctx: &ProjectContext) -> Option<String> {
    let env: Map<String, Value> = serde_json::from_str(env_json).ok()?;
    let rule = "=".repeat(RULE_WIDTH);

    let mut entries: Vec<_> = env.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut text = format!("Go Environment:\n{rule}\n");
    for (key, value) in entries {
        text.push_str(&format!("{}: {}\n", key, display_value(value)));
    }
    text.push_str(&format!("\n{rule}\n"));

    let standalone = ctx.is_standalone();
    if let Some(file) = ctx.active_file() {
        text.push_str(&format!("Current File: {}\n", file.file_name()));
        if standalone {
            text.push_str("File Type: ✓ Single file program (no module needed)\n");
        } else {
            text.push_str("File Type: Multi-file project (module recommended)\n");
        }
    }

    if has_manifest(ctx.start_directory()) {
        text.push_str("Module Status: ✓ go.mod found\n");
        if let Some(name) = ctx.module_root().as_deref().and_then(read_module_name) {
            text.push_str(&format!("Module Name: {name}\n"));
        }
    } else {
        text.push_str("Module Status: ✗ No go.mod found\n");
        if !standalone {
            text.push_str(
                "Recommendation: Run 'Go: Initialize Module' for multi-file projects\n",
            );
        }
    }

    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ProjectModeClassifier, SourceFile};
    use tempfile::tempdir;

    fn output(stdout: &str, stderr: &str, exit_code: Option<i32>) -> ProcessOutput {
        ProcessOutput {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            duration_ms: 3,
        }
    }

    #[test]
    fn test_render_output_full() {
        let invocation = Invocation::new("go", ["vet", "."], "/work");
        let text = render_output(&invocation, &output("ok\n", "warning\n", Some(1)));
        assert_eq!(
            text,
            "Command: go vet .\nDirectory: /work\n\nOutput:\nok\n\nErrors:\nwarning\n\n\nExit code: 1"
        );
    }

    #[test]
    fn test_render_output_silent_success() {
        let invocation = Invocation::new("go", ["build", "."], "/work");
        let text = render_output(&invocation, &output("", "", Some(0)));
        assert_eq!(text, "Command: go build .\nDirectory: /work\n\n\nExit code: 0");
    }

    #[test]
    fn test_environment_report_standalone_without_module() {
        let temp = tempdir().unwrap();
        let ctx = ProjectContext::new(
            ProjectModeClassifier::new(),
            Some(SourceFile::new(
                temp.path().join("main.go"),
                "package main\nfunc main() {}\n",
            )),
            temp.path().to_path_buf(),
        );
        let text = render_environment(r#"{"GOPATH":"/go","GOARCH":"amd64","CGO_ENABLED":"1"}"#, &ctx)
            .unwrap();

        let arch = text.find("GOARCH: amd64").unwrap();
        let path = text.find("GOPATH: /go").unwrap();
        assert!(text.starts_with("Go Environment:\n"));
        assert!(text.find("CGO_ENABLED: 1").unwrap() < arch);
        assert!(arch < path);
        assert!(text.contains("Current File: main.go\n"));
        assert!(text.contains("Single file program"));
        assert!(text.contains("Module Status: ✗ No go.mod found\n"));
        assert!(!text.contains("Recommendation"));
    }

    #[test]
    fn test_environment_report_with_module() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("go.mod"), "module example.com/app\n\ngo 1.22\n").unwrap();
        let pkg = temp.path().join("pkg");
        std::fs::create_dir_all(&pkg).unwrap();
        let ctx = ProjectContext::new(
            ProjectModeClassifier::new(),
            Some(SourceFile::new(pkg.join("lib.go"), "package pkg\n")),
            temp.path().to_path_buf(),
        );

        let text = render_environment("{}", &ctx).unwrap();
        assert!(text.contains("Multi-file project (module recommended)"));
        assert!(text.contains("Module Status: ✓ go.mod found\n"));
        assert!(text.contains("Module Name: example.com/app\n"));
    }

    #[test]
    fn test_environment_report_rejects_non_object() {
        let ctx = ProjectContext::new(ProjectModeClassifier::new(), None, std::env::temp_dir());
        assert!(render_environment("GOPATH=/go", &ctx).is_none());
        assert!(render_environment("[1, 2]", &ctx).is_none());
    }
}
