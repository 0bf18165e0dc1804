// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::watch;

use newshaiku::app_config::{self, Config};
use newshaiku::file_utils::FileManager;
use newshaiku::language_utils;
use newshaiku::server::{self, PresenterState};
use newshaiku::{Controller, HaikuStore};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan the feed for haikus every interval until interrupted
    Extract {
        /// Feed URL to scan instead of the configured one
        #[arg(long)]
        feed_url: Option<String>,

        /// Keep only haikus related to the seasons
        #[arg(long)]
        season_filter: bool,
    },

    /// Scan the feed once and exit
    Once {
        /// Feed URL to scan instead of the configured one
        #[arg(long)]
        feed_url: Option<String>,

        /// Keep only haikus related to the seasons
        #[arg(long)]
        season_filter: bool,
    },

    /// Serve a random haiku on a web page
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:8000
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// Generate shell completions for newshaiku
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// newshaiku - haikus found in the news
///
/// Scans news feed summaries for accidental 5-7-5 Norwegian haikus and
/// shows a random one on a web page.
#[derive(Parser, Debug)]
#[command(name = "newshaiku")]
#[command(version)]
#[command(about = "Finds accidental haikus in the news")]
#[command(long_about = "newshaiku scans a news feed for passages that read as 5-7-5 haikus and serves them on a web page.

EXAMPLES:
    newshaiku extract                          # Scan the feed every hour
    newshaiku once --season-filter             # One pass, seasonal haikus only
    newshaiku serve --addr 0.0.0.0:8000        # Show a random haiku
    newshaiku completions bash > newshaiku.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

NLP SERVICE:
    Tokenization, tagging and word vectors come from an HTTP analysis service
    (nlp.endpoint in the config) running a Norwegian pipeline such as nb_core_news_md.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install with the most verbose level; the effective level is set after loading the config
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell.clone(), &mut cmd, "newshaiku", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(&cli.config_path, cli.log_level.clone())?;

    match cli.command {
        Commands::Extract { feed_url, season_filter } => {
            apply_extract_overrides(&mut config, feed_url, season_filter)?;
            run_extract(config).await
        }
        Commands::Once { feed_url, season_filter } => {
            apply_extract_overrides(&mut config, feed_url, season_filter)?;
            run_once(config).await
        }
        Commands::Serve { addr } => {
            if let Some(addr) = addr {
                config.server.listen_addr = addr;
            }
            config.validate().context("Configuration validation failed")?;
            run_serve(config).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load the configuration file, creating a default one when it is missing
fn load_config(config_path: &str, cli_log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if FileManager::file_exists(config_path) {
        let content = FileManager::read_to_string(config_path)?;
        serde_json::from_str::<Config>(&content)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        FileManager::write_to_file(config_path, &config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(log_level) = cli_log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config.validate().context("Configuration validation failed")?;

    if !language_utils::is_norwegian(&config.nlp.language) {
        warn!(
            "Syllables are estimated with Norwegian vowels but the NLP language is {}",
            language_utils::get_language_name(&config.nlp.language)?
        );
    }

    Ok(config)
}

fn apply_extract_overrides(config: &mut Config, feed_url: Option<String>, season_filter: bool) -> Result<()> {
    if let Some(url) = feed_url {
        config.feed.url = url;
    }
    if season_filter {
        config.detection.season_filter = true;
    }
    config.validate().context("Configuration validation failed")
}

/// Watch channel flipped to true on Ctrl-C
fn shutdown_on_ctrl_c() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping");
            let _ = tx.send(true);
        }
    });
    rx
}

async fn run_extract(config: Config) -> Result<()> {
    let controller = Controller::with_config(&config).await?;
    controller.run(shutdown_on_ctrl_c()).await
}

async fn run_once(config: Config) -> Result<()> {
    let controller = Controller::with_config(&config).await?;
    let report = controller.run_pass().await?;
    info!(
        "Found {} haikus in {} entries, written to {:?}",
        report.haikus,
        report.entries,
        controller.store().path()
    );
    Ok(())
}

async fn run_serve(config: Config) -> Result<()> {
    let store = HaikuStore::new(PathBuf::from(&config.storage.haikus_path));
    let state = PresenterState::from_config(&config.server, store)
        .context("Failed to load haikus for the presenter")?;
    server::serve(&config.server, state, shutdown_on_ctrl_c()).await
}
