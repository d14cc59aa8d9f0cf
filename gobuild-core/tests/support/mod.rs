//! Shared fakes for dispatcher tests

#![allow(dead_code)]

use async_trait::async_trait;
use gobuild_core::models::{Invocation, ProcessOutput};
use gobuild_core::runner::{ProcessRunner, RunError};
use gobuild_core::{Cursor, EditorHost};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

type Responder = Box<dyn Fn(&Invocation) -> Result<ProcessOutput, RunError> + Send + Sync>;

/// Records every invocation and answers with a scripted response
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    responder: Responder,
}

impl RecordingRunner {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&Invocation) -> Result<ProcessOutput, RunError> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    /// Every invocation succeeds with the given stdout
    pub fn succeeding(stdout: &str) -> Self {
        let stdout = stdout.to_string();
        Self::new(move |_| Ok(output(0, &stdout, "")))
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, RunError> {
        self.calls.lock().unwrap().push(invocation.clone());
        (self.responder)(invocation)
    }
}

pub fn output(exit_code: i32, stdout: &str, stderr: &str) -> ProcessOutput {
    ProcessOutput {
        exit_code: Some(exit_code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        duration_ms: 1,
    }
}

/// Editor host backed by plain fields
#[derive(Default)]
pub struct MemoryHost {
    pub path: Option<PathBuf>,
    pub buffer: String,
    pub cursor: Cursor,
    pub panels: Vec<(String, String)>,
    pub prompt_answers: VecDeque<Option<String>>,
    pub prompt_labels: Vec<(String, String)>,
    pub clipboard: Option<String>,
    pub replacements: usize,
}

impl MemoryHost {
    pub fn with_file(path: impl Into<PathBuf>, buffer: &str) -> Self {
        Self {
            path: Some(path.into()),
            buffer: buffer.to_string(),
            ..Self::default()
        }
    }

    pub fn answering(mut self, answer: Option<&str>) -> Self {
        self.prompt_answers.push_back(answer.map(str::to_string));
        self
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.cursor = Cursor::new(line, column);
        self
    }

    pub fn last_panel(&self) -> &str {
        self.panels
            .last()
            .map(|(_, text)| text.as_str())
            .unwrap_or("")
    }
}

impl EditorHost for MemoryHost {
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
        self.replacements += 1;
    }

    fn prompt(&mut self, label: &str, default: &str) -> Option<String> {
        self.prompt_labels
            .push((label.to_string(), default.to_string()));
        self.prompt_answers.pop_front().flatten()
    }

    fn show_panel(&mut self, title: &str, text: &str) {
        self.panels.push((title.to_string(), text.to_string()));
    }

    fn set_clipboard(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }
}
