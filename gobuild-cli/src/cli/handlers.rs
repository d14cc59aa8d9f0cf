//! CLI command handlers

use super::host::TerminalHost;
use crate::TargetArgs;
use anyhow::{Context, Result};
use gobuild_core::models::{LogLevel, Settings, SettingsError};
use gobuild_core::runner::TokioProcessRunner;
use gobuild_core::services::logging::init_logging;
use gobuild_core::{CommandOutcome, Cursor, Dispatcher, PaletteCommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Options shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub log_level: Option<String>,
}

fn parse_log_level(value: &str) -> Option<LogLevel> {
    match value.trim().to_lowercase().as_str() {
        "error" => Some(LogLevel::Error),
        "warn" => Some(LogLevel::Warn),
        "info" => Some(LogLevel::Info),
        "debug" => Some(LogLevel::Debug),
        "trace" => Some(LogLevel::Trace),
        _ => None,
    }
}

fn log_level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

fn settings_path(explicit: Option<PathBuf>) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => Ok(Some(path)),
        None => match Settings::default_config_path() {
            Ok(path) => Ok(Some(path)),
            Err(SettingsError::NoConfigDir) => Ok(None),
            Err(e) => Err(anyhow::anyhow!("Failed to get default config path: {}", e)),
        },
    }
}

/// Resolve the settings snapshot for this invocation and start logging
fn load_settings(options: &GlobalOptions) -> Result<Settings> {
    let mut settings = match settings_path(options.config.clone())? {
        Some(path) => Settings::load_from_file(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if let Some(level) = &options.log_level {
        settings.log_level = parse_log_level(level)
            .ok_or_else(|| anyhow::anyhow!("Invalid log level: {}", level))?;
    }

    if let Err(errors) = settings.validate() {
        return Err(anyhow::anyhow!(
            "Invalid settings:\n  - {}",
            errors.join("\n  - ")
        ));
    }

    if let Err(e) = init_logging(settings.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    Ok(settings)
}

fn dispatcher(settings: Settings) -> Dispatcher {
    Dispatcher::new(settings, Arc::new(TokioProcessRunner::new()))
}

fn exit_code(outcome: &CommandOutcome) -> ExitCode {
    match outcome {
        CommandOutcome::Failed(_) => ExitCode::FAILURE,
        CommandOutcome::Completed { output, .. } if !output.success() => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

/// Run one palette command against the target file
pub async fn handle_palette(
    options: &GlobalOptions,
    command: PaletteCommand,
    target: TargetArgs,
    answers: Vec<String>,
) -> Result<ExitCode> {
    let settings = load_settings(options)?;

    // Command-line positions are 1-based
    let cursor = Cursor::new(
        target.line.saturating_sub(1),
        target.column.saturating_sub(1),
    );
    let target_file = target
        .file
        .map(std::path::absolute)
        .transpose()
        .context("Failed to resolve file path")?;
    let mut host = TerminalHost::open(target_file.clone(), cursor)?.preset_answers(answers);

    let outcome = dispatcher(settings).invoke(command, &mut host).await;
    if host.is_modified() {
        tracing::info!(file = ?target_file, "Saving formatted buffer");
    }
    host.save()?;

    tracing::debug!(command = command.title(), failed = outcome.is_failed(), "Command finished");
    Ok(exit_code(&outcome))
}

/// Format a file the way the editor's pre-save hook does
pub async fn handle_pre_save(options: &GlobalOptions, file: PathBuf) -> Result<ExitCode> {
    let settings = load_settings(options)?;
    let file = std::path::absolute(&file).context("Failed to resolve file path")?;
    let mut host = TerminalHost::open(Some(file), Cursor::default())?;

    match dispatcher(settings).on_pre_save(&mut host).await {
        Some(outcome) => {
            host.save()?;
            Ok(exit_code(&outcome))
        }
        None => {
            tracing::debug!("Formatting on save is disabled or the file is not Go source");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_user_input_sync() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

fn ask(question: &str, default: &str) -> Result<String> {
    print!("{} [{}]: ", question, default);
    io::stdout().flush()?;
    Ok(read_user_input_sync()?.trim().to_string())
}

fn ask_bool(question: &str, current: bool) -> Result<bool> {
    let input = ask(question, if current { "y" } else { "n" })?;
    if input.is_empty() {
        return Ok(current);
    }
    Ok(matches!(input.to_lowercase().as_str(), "y" | "yes"))
}

/// Handle the 'config --init' command
pub fn handle_config_init(config_file: Option<PathBuf>) -> Result<()> {
    let config_path = settings_path(config_file)?
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    println!("⚙️  Initializing gobuild configuration");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📄 Config file: {}", config_path.display());

    let mut settings = if config_path.exists() {
        println!("⚠️  Configuration file already exists. Loading existing values...");
        Settings::load_from_file(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to load existing config: {}", e))?
    } else {
        println!("✨ Creating new configuration with defaults...");
        Settings::default()
    };

    println!("\n📝 Please answer the following questions (press Enter to use default):\n");

    let module_name = ask("Default module name", &settings.default_module_name)?;
    if !module_name.is_empty() {
        settings.default_module_name = module_name;
    }

    settings.auto_create_mod =
        ask_bool("Create go.mod automatically when needed? (y/n)", settings.auto_create_mod)?;
    settings.format_on_save = ask_bool("Format on save? (y/n)", settings.format_on_save)?;
    settings.use_goimports =
        ask_bool("Use goimports when formatting on save? (y/n)", settings.use_goimports)?;

    let go_binary = ask("Go executable", &settings.go_binary)?;
    if !go_binary.is_empty() {
        settings.go_binary = go_binary;
    }

    let timeout = ask(
        "Command timeout in seconds",
        &settings.command_timeout_seconds.to_string(),
    )?;
    if !timeout.is_empty() {
        match timeout.parse::<u32>() {
            Ok(seconds) => settings.command_timeout_seconds = seconds,
            Err(_) => println!("⚠️  Invalid timeout value, using default"),
        }
    }

    let level = ask(
        "Log level (error/warn/info/debug/trace)",
        log_level_name(settings.log_level),
    )?;
    if !level.is_empty() {
        match parse_log_level(&level) {
            Some(level) => settings.log_level = level,
            None => println!("⚠️  Invalid log level, using default"),
        }
    }

    println!("\n🔍 Validating configuration...");
    match settings.validate() {
        Ok(()) => println!("✅ Configuration is valid"),
        Err(errors) => {
            println!("❌ Configuration validation failed:");
            for error in &errors {
                println!("   - {}", error);
            }
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("\n💾 Saving configuration to {}...", config_path.display());
    settings
        .save_to_file(&config_path)
        .map_err(|e| anyhow::anyhow!("Failed to save configuration: {}", e))?;

    println!("✅ Configuration saved successfully!");
    println!("\n📋 Configuration summary:");
    println!(
        "   Default module name: {}",
        if settings.default_module_name.is_empty() {
            "(prompt)"
        } else {
            settings.default_module_name.as_str()
        }
    );
    println!("   Auto-create go.mod: {}", settings.auto_create_mod);
    println!("   Format on save: {}", settings.format_on_save);
    println!("   Command timeout: {} seconds", settings.command_timeout_seconds);
    println!("   Log level: {}", log_level_name(settings.log_level));

    Ok(())
}
