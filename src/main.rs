#![forbid(unsafe_code)]

mod config;
mod constants;
mod metamode;
mod nvidia;
mod positioning;
mod types;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use config::{Bootstrap, ConfigStore, Layout};
use constants::exit;
use nvidia::{CommandRunner, NvidiaSettings, SettingsCommand, SystemRunner};
use types::ScreenKey;

/// Configure nvidia-settings for multiple screens
#[derive(Debug, Parser)]
#[command(name = "nvx", version)]
struct Cli {
    /// Screen layout, e.g. `1 2 3`; defaults to the [Layout] section of the config file
    layout: Vec<ScreenKey>,

    /// Number of screens per row, e.g. 2 with 4 screens gives a 2x2 layout; a single row if not set
    #[arg(short, long)]
    wrap: Option<usize>,

    /// Config file to use instead of ~/.config/nvx/nvx.conf
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the nvidia-settings command without running it
    #[arg(long)]
    dry_run: bool,

    /// Print the computed screen positions as JSON
    #[arg(long)]
    print_layout: bool,
}

fn init_tracing() {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    // stdout is reserved for command output and --print-layout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install log subscriber: {e}");
    }
}

fn print_bootstrap_notice(path: &Path) {
    println!("No config file found.");
    println!(
        "A new config file using default configuration was created under '{}'.\n\
         Make sure to properly change the config according to your screen setup before running \
         this command again to avoid getting a black screen.\n\
         Run `xrandr` to have information on your screen ids, supported resolutions and refresh rates.",
        path.display()
    );
}

fn run(cli: Cli, runner: &impl CommandRunner) -> Result<ExitCode> {
    let layout_override = Layout::from_command_line(&cli.layout, cli.wrap)?;
    let store = cli
        .config
        .map(ConfigStore::new)
        .unwrap_or_else(ConfigStore::at_default_path);

    if store.bootstrap()? == Bootstrap::Created {
        print_bootstrap_notice(store.path());
        return Ok(ExitCode::from(exit::BOOTSTRAPPED));
    }

    let config = store.load(layout_override)?;
    let positioned = positioning::compute_positions(&config.layout, &config.screens)?;

    if cli.print_layout {
        let placed: Vec<_> = positioned.placed().collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&placed).context("Failed to serialize layout")?
        );
    }

    let metamode = metamode::composite(&positioned)
        .ok_or_else(|| anyhow!("No screen to apply: every screen in the layout is a placeholder"))?;
    let command = SettingsCommand::assign_metamode(&metamode);
    println!("Running {command}");

    if cli.dry_run {
        info!("Dry run, nvidia-settings not called");
        return Ok(ExitCode::SUCCESS);
    }

    let output = NvidiaSettings::new(runner).apply(&command)?;
    println!("##### Command output:");
    print!("{}", output.stdout);
    if !output.stderr.is_empty() {
        eprint!("{}", output.stderr);
    }
    println!("##### Done");
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse(), &SystemRunner) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit::FAILURE)
        }
    }
}
