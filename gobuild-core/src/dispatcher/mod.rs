//! Palette command dispatch
//!
//! The dispatcher builds a fresh [`ProjectContext`] for every command,
//! plans the invocation, enforces the manifest requirement and renders the
//! result back into the editor host. Errors stop at [`Dispatcher::invoke`]:
//! they are shown in the output panel and returned as
//! [`CommandOutcome::Failed`].

pub mod plan;
pub mod report;
pub mod setup;

pub use plan::{find_test_function, Planner};
pub use report::{render_environment, render_output, PANEL_TITLE};
pub use setup::{ModuleSetup, SetupError, SetupState};

use crate::classifier::{has_manifest, ProjectContext, ProjectModeClassifier, SourceFile};
use crate::editor::{word_at, EditorHost};
use crate::error::CommandError;
use crate::models::{Invocation, ModuleCheck, PaletteCommand, ProcessOutput, Settings};
use crate::playground::PlaygroundClient;
use crate::runner::{spawn_invocation, ProcessRunner, RunError};
use crate::services::logging;
use std::path::PathBuf;
use std::sync::Arc;

const MODULE_NAME_PROMPT: &str = "Module name (e.g., github.com/user/project):";
const GET_PACKAGE_PROMPT: &str = "Go get package:";
const GOIMPORTS_INSTALL_HINT: &str = "go install golang.org/x/tools/cmd/goimports@latest";
const GO_INSTALL_HINT: &str = "https://go.dev/doc/install";

/// How a palette command ended
#[derive(Debug)]
pub enum CommandOutcome {
    /// A tool ran to completion and its output was shown
    Completed {
        invocation: Invocation,
        output: ProcessOutput,
    },
    /// The buffer was replaced with formatted text
    BufferReplaced,
    /// An informational message was shown
    Reported(String),
    /// The user dismissed a prompt
    Cancelled,
    /// The command stopped with an error, already shown to the user
    Failed(CommandError),
}

impl CommandOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, CommandOutcome::Failed(_))
    }
}

/// Runs palette commands against an editor host
pub struct Dispatcher {
    settings: Settings,
    classifier: ProjectModeClassifier,
    runner: Arc<dyn ProcessRunner>,
}

impl Dispatcher {
    pub fn new(settings: Settings, runner: Arc<dyn ProcessRunner>) -> Self {
        let classifier = ProjectModeClassifier::from_settings(&settings);
        Self {
            settings,
            classifier,
            runner,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Context for the host's current file, using the buffer as it is now
    pub fn context(&self, host: &dyn EditorHost) -> ProjectContext {
        let active_file = host
            .file_path()
            .map(|path| SourceFile::new(path, host.buffer_text()));
        let fallback = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        ProjectContext::new(self.classifier.clone(), active_file, fallback)
    }

    /// Run a palette command; errors are reported to the host, never returned
    pub async fn invoke(&self, command: PaletteCommand, host: &mut dyn EditorHost) -> CommandOutcome {
        logging::log_command(command.title(), host.file_path());

        match self.dispatch(command, host).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let text = err.panel_text();
                logging::log_command_error(command.title(), &text);
                host.show_panel(PANEL_TITLE, &text);
                CommandOutcome::Failed(err)
            }
        }
    }

    /// Pre-save hook: formats `.go` files when `format_on_save` is enabled
    pub async fn on_pre_save(&self, host: &mut dyn EditorHost) -> Option<CommandOutcome> {
        if !self.settings.format_on_save {
            return None;
        }
        let is_go = host
            .file_path()
            .and_then(|p| p.to_str())
            .is_some_and(|p| p.ends_with(crate::classifier::SOURCE_EXTENSION));
        if !is_go {
            return None;
        }

        let command = if self.settings.use_goimports {
            PaletteCommand::FixImports
        } else {
            PaletteCommand::Format
        };
        Some(self.invoke(command, host).await)
    }

    async fn dispatch(
        &self,
        command: PaletteCommand,
        host: &mut dyn EditorHost,
    ) -> Result<CommandOutcome, CommandError> {
        let ctx = self.context(host);
        let planner = Planner::new(&self.settings, &ctx);

        match command {
            PaletteCommand::Build => self.run_go_command(planner.build(), &ctx, host).await,
            PaletteCommand::Run => self.run_go_command(planner.run(), &ctx, host).await,
            PaletteCommand::Test => self.run_go_command(planner.test(), &ctx, host).await,
            PaletteCommand::TestAll => self.run_go_command(planner.test_all(), &ctx, host).await,
            PaletteCommand::TestFunction => {
                let test_name = find_test_function(&host.buffer_text(), host.cursor())
                    .ok_or(CommandError::NoTestFunction)?;
                self.run_go_command(planner.test_function(&test_name), &ctx, host)
                    .await
            }
            PaletteCommand::Benchmark => self.run_go_command(planner.benchmark(), &ctx, host).await,
            PaletteCommand::Vet => self.run_go_command(planner.vet(), &ctx, host).await,
            PaletteCommand::Format => self.format(&ctx, &planner, false, host).await,
            PaletteCommand::FixImports => self.format(&ctx, &planner, true, host).await,
            PaletteCommand::ModuleInit => self.module_init(&ctx, &planner, host).await,
            PaletteCommand::ModuleTidy => {
                self.run_go_command(planner.module_tidy(), &ctx, host).await
            }
            PaletteCommand::GetDependency => {
                let package = match host.prompt(GET_PACKAGE_PROMPT, "") {
                    Some(package) if !package.trim().is_empty() => package.trim().to_string(),
                    _ => return Ok(CommandOutcome::Cancelled),
                };
                self.run_go_command(planner.get_dependency(&package), &ctx, host)
                    .await
            }
            PaletteCommand::Install => self.run_go_command(planner.install(), &ctx, host).await,
            PaletteCommand::Clean => self.run_go_command(planner.clean(), &ctx, host).await,
            PaletteCommand::Coverage => self.coverage(&ctx, &planner, host).await,
            PaletteCommand::DocLookup => {
                let symbol = word_at(&host.buffer_text(), host.cursor());
                if symbol.is_empty() {
                    return Err(CommandError::NoSymbol);
                }
                self.run_go_command(planner.doc(&symbol), &ctx, host).await
            }
            PaletteCommand::SendToPlayground => self.send_to_playground(host).await,
            PaletteCommand::ShowEnvironment => self.show_environment(&ctx, &planner, host).await,
            PaletteCommand::ShowVersion => self.run_go_command(planner.version(), &ctx, host).await,
        }
    }

    /// Run an invocation on its own worker and wait for the completion
    async fn execute(&self, invocation: &Invocation) -> Result<ProcessOutput, CommandError> {
        let completion = spawn_invocation(self.runner.clone(), invocation.clone())
            .await
            .map_err(|e| CommandError::Io(std::io::Error::other(e.to_string())))?;
        tracing::debug!(
            id = %completion.id,
            finished_at = %completion.finished_at,
            "Worker completed"
        );

        completion.result.map_err(|err| match err {
            RunError::NotFound { program } => {
                let install_hint = if program == self.settings.goimports_binary {
                    GOIMPORTS_INSTALL_HINT
                } else {
                    GO_INSTALL_HINT
                };
                CommandError::ToolNotFound {
                    tool: program,
                    install_hint: install_hint.to_string(),
                }
            }
            RunError::Timeout { command, seconds } => {
                CommandError::ProcessTimeout { command, seconds }
            }
            other => CommandError::Io(std::io::Error::other(other.to_string())),
        })
    }

    /// Enforce the manifest requirement, then run.
    ///
    /// With auto-creation enabled a missing go.mod is created once and the
    /// invocation is retried once; otherwise the command stops before any
    /// process is spawned.
    async fn execute_checked(
        &self,
        invocation: Invocation,
        ctx: &ProjectContext,
        host: &mut dyn EditorHost,
    ) -> Result<(Invocation, ProcessOutput), CommandError> {
        let needs_module = match invocation.module_check {
            ModuleCheck::Classify => ctx.needs_module(&invocation.args),
            ModuleCheck::Skip => false,
        };

        if !needs_module || has_manifest(&invocation.cwd) {
            let output = self.execute(&invocation).await?;
            return Ok((invocation, output));
        }

        if !self.settings.auto_create_mod {
            return Err(CommandError::MissingManifest {
                command: invocation.subcommand().to_string(),
                directory: invocation.cwd.clone(),
            });
        }

        let mut setup = ModuleSetup::new(invocation);
        let module_name = if self.settings.default_module_name.is_empty() {
            match host.prompt(MODULE_NAME_PROMPT, "") {
                Some(name) if !name.trim().is_empty() => name.trim().to_string(),
                _ => {
                    setup.fail()?;
                    return Err(CommandError::Cancelled("Module creation".to_string()));
                }
            }
        } else {
            self.settings.default_module_name.clone()
        };

        let planner = Planner::new(&self.settings, ctx);
        if let Err(err) = self.create_manifest(&planner, &module_name, host).await {
            setup.fail()?;
            return Err(err);
        }
        setup.manifest_created(module_name)?;
        tracing::info!(
            module = setup.module_name().unwrap_or_default(),
            "Created go.mod; retrying command"
        );

        let retry = setup.take_retry()?;
        let output = self.execute(&retry).await?;
        Ok((retry, output))
    }

    /// Generic run path: check, execute and show the default rendering
    async fn run_go_command(
        &self,
        invocation: Invocation,
        ctx: &ProjectContext,
        host: &mut dyn EditorHost,
    ) -> Result<CommandOutcome, CommandError> {
        let (invocation, output) = self.execute_checked(invocation, ctx, host).await?;
        host.show_panel(PANEL_TITLE, &render_output(&invocation, &output));
        Ok(CommandOutcome::Completed { invocation, output })
    }

    async fn create_manifest(
        &self,
        planner: &Planner<'_>,
        module_name: &str,
        host: &mut dyn EditorHost,
    ) -> Result<(), CommandError> {
        let invocation = planner.module_init(module_name);
        let output = self.execute(&invocation).await?;

        if !output.success() {
            return Err(CommandError::ManifestCreation {
                module: module_name.to_string(),
                stderr: output.stderr,
            });
        }

        tracing::info!(module = module_name, cwd = %invocation.cwd.display(), "Created go.mod");
        host.show_panel(
            PANEL_TITLE,
            &format!("Created go.mod with module: {module_name}"),
        );
        Ok(())
    }

    async fn module_init(
        &self,
        ctx: &ProjectContext,
        planner: &Planner<'_>,
        host: &mut dyn EditorHost,
    ) -> Result<CommandOutcome, CommandError> {
        if has_manifest(ctx.start_directory()) {
            return Err(CommandError::ManifestExists);
        }

        let module_name = match host.prompt(MODULE_NAME_PROMPT, &self.settings.default_module_name) {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => return Ok(CommandOutcome::Cancelled),
        };

        self.create_manifest(planner, &module_name, host).await?;
        Ok(CommandOutcome::Reported(format!(
            "Created go.mod with module: {module_name}"
        )))
    }

    async fn format(
        &self,
        ctx: &ProjectContext,
        planner: &Planner<'_>,
        goimports: bool,
        host: &mut dyn EditorHost,
    ) -> Result<CommandOutcome, CommandError> {
        let file = ctx.active_file().ok_or(CommandError::NoActiveFile)?;
        if !file.is_program_entry() {
            return Err(CommandError::NotGoSource(file.path().to_path_buf()));
        }

        let output = self.execute(&planner.format(file, goimports)).await?;
        if output.success() && !output.stdout.is_empty() {
            host.replace_buffer(&output.stdout);
            tracing::info!(file = %file.path().display(), goimports, "Buffer replaced with formatted source");
            return Ok(CommandOutcome::BufferReplaced);
        }

        let action = if goimports { "goimports" } else { "Formatting" };
        Err(CommandError::ProcessFailure {
            action: action.to_string(),
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    async fn coverage(
        &self,
        ctx: &ProjectContext,
        planner: &Planner<'_>,
        host: &mut dyn EditorHost,
    ) -> Result<CommandOutcome, CommandError> {
        let (profile_run, output) = self.execute_checked(planner.coverage(), ctx, host).await?;
        if !output.success() {
            return Err(CommandError::ProcessFailure {
                action: "Coverage generation".to_string(),
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        self.run_go_command(planner.coverage_report(&profile_run), ctx, host)
            .await
    }

    async fn show_environment(
        &self,
        ctx: &ProjectContext,
        planner: &Planner<'_>,
        host: &mut dyn EditorHost,
    ) -> Result<CommandOutcome, CommandError> {
        let (_, output) = self.execute_checked(planner.environment(), ctx, host).await?;
        if !output.success() {
            return Err(CommandError::ProcessFailure {
                action: "Go environment query".to_string(),
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        let text = render_environment(&output.stdout, ctx).unwrap_or(output.stdout);
        host.show_panel(PANEL_TITLE, &text);
        Ok(CommandOutcome::Reported(text))
    }

    async fn send_to_playground(
        &self,
        host: &mut dyn EditorHost,
    ) -> Result<CommandOutcome, CommandError> {
        let client =
            PlaygroundClient::new(&self.settings.playground_url, self.settings.format_timeout())?;
        let url = client.share(&host.buffer_text()).await?;

        host.show_panel(
            PANEL_TITLE,
            &format!("Playground URL: {url}\n\nURL copied to clipboard!"),
        );
        host.set_clipboard(url.as_str());
        Ok(CommandOutcome::Reported(url.to_string()))
    }
}
