//! Command invocation models

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Commands exposed to the editor's command palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteCommand {
    Build,
    Run,
    Test,
    TestAll,
    TestFunction,
    Benchmark,
    Vet,
    Format,
    FixImports,
    ModuleInit,
    ModuleTidy,
    GetDependency,
    Install,
    Clean,
    Coverage,
    DocLookup,
    SendToPlayground,
    ShowEnvironment,
    ShowVersion,
}

impl PaletteCommand {
    pub const ALL: [PaletteCommand; 19] = [
        PaletteCommand::Build,
        PaletteCommand::Run,
        PaletteCommand::Test,
        PaletteCommand::TestAll,
        PaletteCommand::TestFunction,
        PaletteCommand::Benchmark,
        PaletteCommand::Vet,
        PaletteCommand::Format,
        PaletteCommand::FixImports,
        PaletteCommand::ModuleInit,
        PaletteCommand::ModuleTidy,
        PaletteCommand::GetDependency,
        PaletteCommand::Install,
        PaletteCommand::Clean,
        PaletteCommand::Coverage,
        PaletteCommand::DocLookup,
        PaletteCommand::SendToPlayground,
        PaletteCommand::ShowEnvironment,
        PaletteCommand::ShowVersion,
    ];

    /// Palette caption
    pub fn title(&self) -> &'static str {
        match self {
            PaletteCommand::Build => "Go: Build",
            PaletteCommand::Run => "Go: Run",
            PaletteCommand::Test => "Go: Test",
            PaletteCommand::TestAll => "Go: Test All",
            PaletteCommand::TestFunction => "Go: Test Function Under Cursor",
            PaletteCommand::Benchmark => "Go: Benchmark",
            PaletteCommand::Vet => "Go: Vet",
            PaletteCommand::Format => "Go: Format",
            PaletteCommand::FixImports => "Go: Fix Imports",
            PaletteCommand::ModuleInit => "Go: Initialize Module",
            PaletteCommand::ModuleTidy => "Go: Tidy Module",
            PaletteCommand::GetDependency => "Go: Get Dependency",
            PaletteCommand::Install => "Go: Install",
            PaletteCommand::Clean => "Go: Clean",
            PaletteCommand::Coverage => "Go: Coverage",
            PaletteCommand::DocLookup => "Go: Documentation",
            PaletteCommand::SendToPlayground => "Go: Send to Playground",
            PaletteCommand::ShowEnvironment => "Go: Show Environment",
            PaletteCommand::ShowVersion => "Go: Show Version",
        }
    }
}

impl fmt::Display for PaletteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Whether the manifest requirement is evaluated before running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleCheck {
    /// Ask the classifier whether the tokens need a module
    Classify,
    /// Run as-is; used for direct file/directory invocations and retries
    Skip,
}

/// A single external tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable to launch
    pub program: String,
    /// Subcommand tokens
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
    /// Text written to the child's stdin
    pub stdin: Option<String>,
    /// Deadline after which the child is killed
    pub timeout: Duration,
    pub module_check: ModuleCheck,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I, cwd: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.into(),
            stdin: None,
            timeout: Duration::from_secs(30),
            module_check: ModuleCheck::Classify,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn with_module_check(mut self, module_check: ModuleCheck) -> Self {
        self.module_check = module_check;
        self
    }

    pub fn skip_module_check(self) -> Self {
        self.with_module_check(ModuleCheck::Skip)
    }

    pub fn in_dir(mut self, cwd: &Path) -> Self {
        self.cwd = cwd.to_path_buf();
        self
    }

    /// Full command line as shown to the user
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// First subcommand token, used in user-facing messages
    pub fn subcommand(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("command")
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, absent when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}
