use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::io;
use std::path::{Path, PathBuf};

use upload_artifact_cli::output::{OutputFormat, OutputFormatter};
use upload_artifact_cli::{
    CliError, CliOverrides, CliResult, ConfigManager, ErrorContext, ExitCode, UploadSettings,
    WorkflowSink, terminal,
};
use upload_artifact_core::{LocalArtifactStore, LocalFileSystem, NoFilesFoundAction};

#[derive(Parser)]
#[command(name = "upload-artifact")]
#[command(author, version, about = "Upload Artifact - Find files by path patterns and store them as named artifacts", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Configuration file (defaults to the per-user config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find files and upload them as artifacts
    Upload {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output format for the run summary
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show what would be uploaded, without uploading
    Plan {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Remove artifacts whose retention period has ended
    Prune {
        /// Artifact store directory
        #[arg(long, value_name = "DIR")]
        store_dir: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct InputArgs {
    /// Artifact name (combined mode)
    #[arg(short, long)]
    name: Option<String>,

    /// Upload each search path as its own artifact
    #[arg(long)]
    individual: bool,

    /// Search path: file, directory or glob, ! prefix to exclude (repeatable)
    #[arg(short, long = "path", value_name = "PATTERN")]
    path: Vec<String>,

    /// What to do when a search path matches nothing: warn, error or ignore
    #[arg(long, value_name = "ACTION")]
    if_no_files_found: Option<NoFilesFoundAction>,

    /// Days to keep the artifact
    #[arg(long, value_name = "DAYS")]
    retention_days: Option<u32>,

    /// Artifact store directory
    #[arg(long, value_name = "DIR")]
    store_dir: Option<PathBuf>,

    /// Do not follow symbolic links while searching directories
    #[arg(long)]
    no_follow_symlinks: bool,

    /// Directory relative search paths are resolved against
    #[arg(long, value_name = "DIR")]
    working_directory: Option<PathBuf>,
}

impl InputArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            name: self.name.clone(),
            individual: self.individual.then_some(true),
            path: (!self.path.is_empty()).then(|| self.path.clone()),
            if_no_files_found: self.if_no_files_found,
            retention_days: self.retention_days,
            store_dir: self.store_dir.clone(),
            follow_symlinks: self.no_follow_symlinks.then_some(false),
            working_directory: self.working_directory.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("upload_artifact_core", log::LevelFilter::Debug)
            .filter_module("upload_artifact_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = match cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };

    let result = match cli.command {
        Commands::Upload { inputs, format } => upload_command(&config, &inputs, format).await,
        Commands::Plan { inputs, format } => plan_command(&config, &inputs, format),
        Commands::Prune { store_dir } => prune_command(store_dir).await,
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(ExitCode::Success)
        }
    };

    match result {
        Ok(code) => code.into(),
        Err(error) => {
            eprint!("{}", error.format_for_user(cli.debug));
            error.exit_code().into()
        }
    }
}

fn load_settings(
    config: &ConfigManager,
    inputs: &InputArgs,
) -> CliResult<(UploadSettings, PathBuf)> {
    let settings = config.load(&inputs.overrides()).map_err(|e| {
        CliError::misuse(&format!("{e:#}"))
            .with_context("config", &config.get_config_path().display().to_string())
    })?;
    log::debug!("Settings: {settings:?}");

    let cwd = current_dir()?;
    Ok((settings, cwd))
}

fn current_dir() -> CliResult<PathBuf> {
    std::env::current_dir().map_err(|e| {
        CliError::filesystem(&format!("Cannot read the current directory: {e}"))
            .with_source(Box::new(e))
    })
}

async fn upload_command(
    config: &ConfigManager,
    inputs: &InputArgs,
    format: OutputFormat,
) -> CliResult<ExitCode> {
    let (settings, cwd) = load_settings(config, inputs)?;
    let store_dir = settings.store_dir(&cwd);
    log::debug!("Artifact store: {}", store_dir.display());

    let fs = LocalFileSystem::new().with_follow_links(settings.follow_symlinks);
    let store = LocalArtifactStore::new(store_dir);
    let sink = WorkflowSink::new();

    let report = upload_artifact_core::run(&settings.to_inputs(&cwd), &fs, &store, &sink).await?;

    let formatter = format.formatter(terminal::stdout_supports_color());
    print!("{}", formatter.format_report(&report)?);

    Ok(if report.succeeded() {
        ExitCode::Success
    } else {
        ExitCode::GeneralError
    })
}

fn plan_command(
    config: &ConfigManager,
    inputs: &InputArgs,
    format: OutputFormat,
) -> CliResult<ExitCode> {
    let (settings, cwd) = load_settings(config, inputs)?;
    let fs = LocalFileSystem::new().with_follow_links(settings.follow_symlinks);
    let sink = WorkflowSink::new();

    let entries = upload_artifact_core::preview(&settings.to_inputs(&cwd), &fs, &sink)?;

    let formatter = format.formatter(terminal::stdout_supports_color());
    print!("{}", formatter.format_preview(&entries)?);

    Ok(if entries.iter().any(|entry| entry.decision.is_fail()) {
        ExitCode::GeneralError
    } else {
        ExitCode::Success
    })
}

async fn prune_command(store_dir: Option<PathBuf>) -> CliResult<ExitCode> {
    let cwd = current_dir()?;
    let store_dir = match store_dir {
        Some(dir) => cwd.join(dir),
        None => upload_artifact_cli::paths::get_store_dir(),
    };
    let store = LocalArtifactStore::new(&store_dir);

    let pruned = store.prune_expired(chrono::Utc::now()).await?;
    report_pruned(&pruned, &store_dir);

    Ok(ExitCode::Success)
}

fn report_pruned(pruned: &[String], store_dir: &Path) {
    if pruned.is_empty() {
        println!("No expired artifacts in {}", store_dir.display());
    } else {
        for name in pruned {
            println!("Removed {name}");
        }
    }
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "upload-artifact", &mut io::stdout());
}
