//! Terminal-backed editor host

use anyhow::{Context, Result};
use gobuild_core::{Cursor, EditorHost};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Editor host for one command-line invocation.
///
/// The buffer is the file's contents at startup. Replacements are kept in
/// memory until [`TerminalHost::save`] writes them back.
pub struct TerminalHost<R> {
    path: Option<PathBuf>,
    buffer: String,
    cursor: Cursor,
    answers: VecDeque<String>,
    input: R,
    modified: bool,
}

impl TerminalHost<io::StdinLock<'static>> {
    /// Host reading prompt answers from stdin
    pub fn open(path: Option<PathBuf>, cursor: Cursor) -> Result<Self> {
        Self::with_input(path, cursor, io::stdin().lock())
    }
}

impl<R: BufRead> TerminalHost<R> {
    pub fn with_input(path: Option<PathBuf>, cursor: Cursor, input: R) -> Result<Self> {
        let buffer = match &path {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            None => String::new(),
        };
        Ok(Self {
            path,
            buffer,
            cursor,
            answers: VecDeque::new(),
            input,
            modified: false,
        })
    }

    /// Answers used for the next prompts before falling back to the input
    pub fn preset_answers(mut self, answers: impl IntoIterator<Item = String>) -> Self {
        self.answers.extend(answers);
        self
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Write a replaced buffer back to its file
    pub fn save(&mut self) -> Result<()> {
        if !self.modified {
            return Ok(());
        }
        if let Some(path) = &self.path {
            std::fs::write(path, &self.buffer)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::debug!(file = %path.display(), "Buffer written back");
        }
        self.modified = false;
        Ok(())
    }

    fn read_answer(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead> EditorHost for TerminalHost<R> {
    fn file_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn buffer_text(&self) -> String {
        self.buffer.clone()
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn replace_buffer(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.modified = true;
    }

    fn prompt(&mut self, label: &str, default: &str) -> Option<String> {
        if let Some(answer) = self.answers.pop_front() {
            return Some(answer);
        }

        if default.is_empty() {
            eprint!("{label} ");
        } else {
            eprint!("{label} [{default}] ");
        }
        let _ = io::stderr().flush();

        match self.read_answer() {
            Ok(Some(answer)) if answer.trim().is_empty() => Some(default.to_string()),
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read prompt answer");
                None
            }
        }
    }

    fn show_panel(&mut self, title: &str, text: &str) {
        tracing::debug!(title = title, "Output panel");
        println!("{text}");
    }

    fn set_clipboard(&mut self, text: &str) {
        // No system clipboard from a terminal; the URL is printed instead
        println!("{text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as Input;
    use tempfile::tempdir;

    fn host(input: &str) -> TerminalHost<Input<Vec<u8>>> {
        TerminalHost::with_input(None, Cursor::default(), Input::new(input.as_bytes().to_vec()))
            .unwrap()
    }

    #[test]
    fn test_prompt_reads_line() {
        let mut host = host("example.com/app\n");
        assert_eq!(host.prompt("Name:", "").as_deref(), Some("example.com/app"));
    }

    #[test]
    fn test_prompt_empty_line_takes_default() {
        let mut host = host("\n");
        assert_eq!(host.prompt("Name:", "demo").as_deref(), Some("demo"));
    }

    #[test]
    fn test_prompt_eof_cancels() {
        let mut host = host("");
        assert_eq!(host.prompt("Name:", "demo"), None);
    }

    #[test]
    fn test_preset_answers_come_first() {
        let mut host = host("typed\n").preset_answers(["preset".to_string()]);
        assert_eq!(host.prompt("Name:", "").as_deref(), Some("preset"));
        assert_eq!(host.prompt("Name:", "").as_deref(), Some("typed"));
    }

    #[test]
    fn test_replaced_buffer_is_saved() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("main.go");
        std::fs::write(&path, "package main\nfunc main(){}").unwrap();

        let mut host = TerminalHost::with_input(
            Some(path.clone()),
            Cursor::new(1, 0),
            Input::new(Vec::new()),
        )
        .unwrap();
        assert_eq!(host.buffer_text(), "package main\nfunc main(){}");
        assert!(!host.is_modified());

        host.replace_buffer("package main\n\nfunc main() {}\n");
        assert!(host.is_modified());
        host.save().unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "package main\n\nfunc main() {}\n"
        );
        assert!(!host.is_modified());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp = tempdir().unwrap();
        let result = TerminalHost::with_input(
            Some(temp.path().join("absent.go")),
            Cursor::default(),
            Input::new(Vec::new()),
        );
        assert!(result.is_err());
    }
}
