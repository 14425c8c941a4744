use clap::{Parser, Subcommand, ValueEnum};
use quill_cli::{commands, logging};
use quill_core::context::{
    AppConfig, AppConfigExt, DeviceConfig, TierTableKind, WordCountingStrategy,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Writing-session tracker and button daemon")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daemon (default)
    Run {
        /// Log actions instead of running their commands
        #[arg(long)]
        dry_run: bool,
        /// Button device to read; repeat to read several. Replaces the configured list.
        #[arg(short, long = "device")]
        devices: Vec<String>,
        /// Keyboard device to count keystrokes from. Replaces the configured list.
        #[arg(short, long = "keyboard")]
        keyboards: Vec<String>,
        #[arg(long)]
        status_dir: Option<String>,
    },
    /// Show the records published by a running daemon
    Status {
        #[arg(long)]
        status_dir: Option<PathBuf>,
        /// Print the raw statistics record
        #[arg(long)]
        json: bool,
    },
    /// List achievement titles
    Tiers {
        #[arg(short, long, value_enum)]
        table: Option<Table>,
        /// Show progress for this many words
        #[arg(short, long)]
        words: Option<u64>,
    },
    /// Print the effective configuration
    Config,
    /// Count a text file as if it had been typed
    Replay {
        path: PathBuf,
        #[arg(long, value_enum)]
        counting: Option<Counting>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Table {
    Scriptorium,
    Chronicle,
}

impl From<Table> for TierTableKind {
    fn from(table: Table) -> Self {
        match table {
            Table::Scriptorium => TierTableKind::Scriptorium,
            Table::Chronicle => TierTableKind::Chronicle,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Counting {
    Ratio,
    Boundary,
}

impl From<Counting> for WordCountingStrategy {
    fn from(counting: Counting) -> Self {
        match counting {
            Counting::Ratio => WordCountingStrategy::ApproximateRatio,
            Counting::Boundary => WordCountingStrategy::BoundaryDetection,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run {
        dry_run: false,
        devices: Vec::new(),
        keyboards: Vec::new(),
        status_dir: None,
    });

    // The daemon logs config loading too
    let _log_guard = matches!(command, Commands::Run { .. })
        .then(logging::init)
        .flatten();
    let mut config = AppConfig::load();

    match command {
        Commands::Run {
            dry_run,
            devices,
            keyboards,
            status_dir,
        } => {
            if !devices.is_empty() || !keyboards.is_empty() {
                config.devices = devices
                    .into_iter()
                    .map(DeviceConfig::buttons)
                    .chain(keyboards.into_iter().map(DeviceConfig::keyboard))
                    .collect();
            }
            if let Some(dir) = status_dir {
                config.status_directory = dir;
            }
            commands::run(config, dry_run).await
        }
        Commands::Status { status_dir, json } => {
            let dir = status_dir.unwrap_or_else(|| PathBuf::from(&config.status_directory));
            commands::show_status(&dir, json);
            Ok(())
        }
        Commands::Tiers { table, words } => {
            let table = table.map(Into::into).unwrap_or(config.achievement_table);
            commands::show_tiers(table, words);
            Ok(())
        }
        Commands::Config => commands::show_config(&config),
        Commands::Replay { path, counting } => {
            if let Some(counting) = counting {
                config.word_counting = counting.into();
            }
            commands::replay_file(&path, &config)
        }
    }
}
