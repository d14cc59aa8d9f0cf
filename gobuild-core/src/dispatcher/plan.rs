//! Invocation planning
//!
//! Turns a palette command plus the classifier's verdicts into the concrete
//! toolchain invocation. Standalone files are handed to the tool by name,
//! simple multi-file programs as their directory, everything else runs from
//! the module root and goes through the manifest check.

use crate::classifier::{ProjectContext, SourceFile};
use crate::editor::{line_at, Cursor};
use crate::models::{Invocation, ModuleCheck, Settings};
use regex::Regex;
use std::sync::LazyLock;

static TEST_FUNC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"func\s+(Test\w+)").unwrap());

/// Lines searched above the cursor for an enclosing test function
const TEST_SEARCH_LINES: usize = 49;

/// Output file for coverage profiles
pub const COVERAGE_PROFILE: &str = "coverage.out";

/// Builds invocations for one command against one project context
pub struct Planner<'a> {
    settings: &'a Settings,
    ctx: &'a ProjectContext,
}

impl<'a> Planner<'a> {
    pub fn new(settings: &'a Settings, ctx: &'a ProjectContext) -> Self {
        Self { settings, ctx }
    }

    /// `go <args>` from the project root, subject to the manifest check
    fn module<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new(&self.settings.go_binary, args, self.ctx.execution_root())
            .with_timeout(self.settings.command_timeout())
    }

    /// `go <args>` from the file's directory without a manifest check
    fn direct<I, S>(&self, file: &SourceFile, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new(&self.settings.go_binary, args, file.directory())
            .with_timeout(self.settings.command_timeout())
            .skip_module_check()
    }

    /// `go <args>` from the project root without a manifest check
    fn unchecked<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module(args).skip_module_check()
    }

    fn standalone_file(&self) -> Option<&SourceFile> {
        self.ctx
            .active_file()
            .filter(|_| self.ctx.is_standalone())
    }

    fn simple_multi_file(&self) -> Option<&SourceFile> {
        self.ctx
            .active_file()
            .filter(|_| self.ctx.is_simple_multi_file())
    }

    pub fn build(&self) -> Invocation {
        if let Some(file) = self.standalone_file() {
            self.direct(file, ["build".to_string(), "-o".to_string(), file.stem(), file.file_name()])
        } else if let Some(file) = self.simple_multi_file() {
            self.direct(file, ["build", "."])
        } else {
            self.module(["build", "."])
        }
    }

    pub fn run(&self) -> Invocation {
        let Some(file) = self.ctx.active_file().filter(|f| f.is_program_entry()) else {
            return self.module(["run", "."]);
        };

        if self.ctx.is_standalone() {
            self.direct(file, ["run".to_string(), file.file_name()])
        } else if self.ctx.is_simple_multi_file() {
            self.direct(file, ["run", "."])
        } else {
            self.module(["run", "."])
        }
    }

    pub fn test(&self) -> Invocation {
        let Some(file) = self.standalone_file().filter(|f| f.is_test_file()) else {
            return self.module(["test", "-v", "."]);
        };

        match file.tested_sibling().filter(|p| p.is_file()) {
            Some(sibling) => {
                let sibling_name = sibling
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.direct(file, ["test".to_string(), sibling_name, file.file_name()])
            }
            None => self.direct(file, ["test".to_string(), file.file_name()]),
        }
    }

    pub fn test_all(&self) -> Invocation {
        self.module(["test", "-v", "./..."])
    }

    pub fn test_function(&self, test_name: &str) -> Invocation {
        let pattern = format!("^{test_name}$");
        match self.standalone_file() {
            Some(file) => self.direct(
                file,
                ["test".to_string(), "-run".to_string(), pattern, file.file_name()],
            ),
            None => self.module(["test", "-v", "-run", pattern.as_str(), "."]),
        }
    }

    pub fn benchmark(&self) -> Invocation {
        match self.standalone_file() {
            Some(file) => self.direct(
                file,
                [
                    "test".to_string(),
                    "-bench=.".to_string(),
                    "-benchmem".to_string(),
                    file.file_name(),
                ],
            ),
            None => self.module(["test", "-bench=.", "-benchmem", "."]),
        }
    }

    pub fn vet(&self) -> Invocation {
        match self.standalone_file() {
            Some(file) => self.direct(file, ["vet".to_string(), file.file_name()]),
            None => self.module(["vet", "."]),
        }
    }

    pub fn module_tidy(&self) -> Invocation {
        self.module(["mod", "tidy"])
    }

    pub fn get_dependency(&self, package: &str) -> Invocation {
        self.module(["get", package])
    }

    pub fn install(&self) -> Invocation {
        self.module(["install", "."])
    }

    pub fn clean(&self) -> Invocation {
        self.unchecked(["clean", "-cache", "-modcache", "-testcache"])
    }

    pub fn coverage(&self) -> Invocation {
        let profile = format!("-coverprofile={COVERAGE_PROFILE}");
        match self.standalone_file() {
            Some(file) => self.direct(file, ["test".to_string(), profile, file.file_name()]),
            None => self.module(["test", profile.as_str(), "."]),
        }
    }

    /// HTML report for a profile written by [`Planner::coverage`]
    pub fn coverage_report(&self, profile_run: &Invocation) -> Invocation {
        let html = format!("-html={COVERAGE_PROFILE}");
        self.unchecked(["tool", "cover", html.as_str()])
            .in_dir(&profile_run.cwd)
    }

    pub fn doc(&self, symbol: &str) -> Invocation {
        self.unchecked(["doc", symbol])
    }

    pub fn environment(&self) -> Invocation {
        self.unchecked(["env", "-json"])
            .with_timeout(self.settings.format_timeout())
    }

    pub fn version(&self) -> Invocation {
        self.unchecked(["version"])
    }

    pub fn module_init(&self, module_name: &str) -> Invocation {
        self.unchecked(["mod", "init", module_name])
    }

    /// Formatter fed with the buffer on stdin
    pub fn format(&self, file: &SourceFile, goimports: bool) -> Invocation {
        let program = if goimports {
            &self.settings.goimports_binary
        } else {
            &self.settings.gofmt_binary
        };
        Invocation::new(program, Vec::<String>::new(), file.directory())
            .with_stdin(file.text())
            .with_timeout(self.settings.format_timeout())
            .with_module_check(ModuleCheck::Skip)
    }
}

/// Name of the test function on the cursor line, or on the nearest line
/// above it within the search window.
pub fn find_test_function(text: &str, cursor: Cursor) -> Option<String> {
    let lowest = cursor.line.saturating_sub(TEST_SEARCH_LINES);
    (lowest..=cursor.line).rev().find_map(|line| {
        let content = line_at(text, line)?;
        TEST_FUNC
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}
