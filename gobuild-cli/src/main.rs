mod cli;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cli::handlers::{self, GlobalOptions};
use gobuild_core::PaletteCommand;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "gobuild")]
#[command(version)]
#[command(about = "Go toolchain runner that builds single files without a go.mod")]
#[command(
    help_template = "{name} - {version}\n{about}\n\n{usage-heading}\n  {usage}\n\n{all-args}{options}\n"
)]
struct Cli {
    /// Path to the settings file (default: ~/.config/gobuild/settings.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured log level (error/warn/info/debug/trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Active file and cursor a command is issued for
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Go source file the command acts on
    pub file: Option<PathBuf>,

    /// Cursor line (1-based)
    #[arg(short, long, default_value = "1")]
    pub line: usize,

    /// Cursor column (1-based)
    #[arg(short = 'c', long, default_value = "1")]
    pub column: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the file, its directory or the module
    Build {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Run the file, its directory or the module
    Run {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Test the current package, or a standalone test file with its sibling
    Test {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Test every package in the module
    TestAll {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Run the test function enclosing the cursor
    ///
    /// Examples:
    ///   gobuild test-function calc_test.go --line 12
    TestFunction {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Run benchmarks with allocation statistics
    Bench {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Run go vet
    Vet {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Format the file in place with gofmt
    Fmt {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Fix imports and format the file in place with goimports
    Imports {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Create go.mod for the project
    ModInit {
        #[command(flatten)]
        target: TargetArgs,

        /// Module name; prompts when omitted
        #[arg(long)]
        name: Option<String>,
    },

    /// Run go mod tidy
    ModTidy {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Add a dependency with go get
    Get {
        /// Package path; prompts when omitted
        package: Option<String>,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Run go install
    Install {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Clear the build, module and test caches
    Clean,

    /// Write a coverage profile and open the HTML report
    Coverage {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show documentation for the symbol under the cursor
    Doc {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Share the file on the Go playground
    Playground {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show the Go environment and module status
    Env {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show the Go version
    Version,

    /// Format a file as a pre-save hook would (honours format_on_save)
    PreSave {
        /// File about to be saved
        file: PathBuf,
    },

    /// Configure gobuild settings interactively
    Config {
        /// Start interactive configuration setup
        #[arg(long)]
        init: bool,

        /// Path to configuration file
        #[arg(long)]
        config_file: Option<PathBuf>,
    },
}

impl Commands {
    /// Palette command, target and prompt answers for a command-line invocation
    fn into_palette(self) -> Option<(PaletteCommand, TargetArgs, Vec<String>)> {
        let plain = |command, target| Some((command, target, Vec::<String>::new()));
        match self {
            Commands::Build { target } => plain(PaletteCommand::Build, target),
            Commands::Run { target } => plain(PaletteCommand::Run, target),
            Commands::Test { target } => plain(PaletteCommand::Test, target),
            Commands::TestAll { target } => plain(PaletteCommand::TestAll, target),
            Commands::TestFunction { target } => plain(PaletteCommand::TestFunction, target),
            Commands::Bench { target } => plain(PaletteCommand::Benchmark, target),
            Commands::Vet { target } => plain(PaletteCommand::Vet, target),
            Commands::Fmt { target } => plain(PaletteCommand::Format, target),
            Commands::Imports { target } => plain(PaletteCommand::FixImports, target),
            Commands::ModInit { target, name } => {
                Some((PaletteCommand::ModuleInit, target, name.into_iter().collect()))
            }
            Commands::ModTidy { target } => plain(PaletteCommand::ModuleTidy, target),
            Commands::Get { package, target } => Some((
                PaletteCommand::GetDependency,
                target,
                package.into_iter().collect(),
            )),
            Commands::Install { target } => plain(PaletteCommand::Install, target),
            Commands::Clean => plain(PaletteCommand::Clean, TargetArgs::default()),
            Commands::Coverage { target } => plain(PaletteCommand::Coverage, target),
            Commands::Doc { target } => plain(PaletteCommand::DocLookup, target),
            Commands::Playground { target } => plain(PaletteCommand::SendToPlayground, target),
            Commands::Env { target } => plain(PaletteCommand::ShowEnvironment, target),
            Commands::Version => plain(PaletteCommand::ShowVersion, TargetArgs::default()),
            Commands::PreSave { .. } | Commands::Config { .. } => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let options = GlobalOptions {
        config: cli.config,
        log_level: cli.log_level,
    };

    match cli.command {
        Commands::PreSave { file } => handlers::handle_pre_save(&options, file).await,
        Commands::Config { init, config_file } => {
            if init {
                handlers::handle_config_init(config_file.or(options.config))?;
            } else {
                println!("Config command requires --init flag");
                println!("Usage: gobuild config --init [--config-file PATH]");
            }
            Ok(ExitCode::SUCCESS)
        }
        command => match command.into_palette() {
            Some((palette, target, answers)) => {
                handlers::handle_palette(&options, palette, target, answers).await
            }
            None => Ok(ExitCode::SUCCESS),
        },
    }
}
