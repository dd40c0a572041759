use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

mod convert;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use convert::Convert;
use tracing::instrument;
use txtwatch::{CONFIG_FILE_NAME, Config, Watcher};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// The directory to watch
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Path to a config file (defaults to `.txtwatch.toml` in the root)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose, self.quiet);

        self.command
            .unwrap_or(Command::Watch)
            .run(&self.root, self.config.as_deref())
    }

    fn setup_logging(verbosity: u8, quiet: bool) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match (quiet, verbosity) {
            (true, _) => tracing::Level::WARN,
            (false, 0) => tracing::Level::INFO,
            (false, 1) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn load_config(root: &Path, explicit: Option<&Path>) -> anyhow::Result<Config> {
    let config = match explicit {
        Some(path) => Config::load(path)?,
        None => Config::load_from_root(root)?,
    };
    tracing::debug!("Using {config:?}");
    Ok(config)
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Watch the root and render text files as they are created (default)
    Watch,

    /// Render existing text files now
    Convert(Convert),

    /// Write a default config file into the root
    Init,
}

impl Command {
    fn run(self, root: &Path, config: Option<&Path>) -> anyhow::Result<()> {
        match self {
            Self::Watch => watch(root, &load_config(root, config)?)?,
            Self::Convert(command) => command.run(root, &load_config(root, config)?)?,
            Self::Init => init(root)?,
        }
        Ok(())
    }
}

#[instrument(level = "debug", skip(config))]
fn watch(root: &Path, config: &Config) -> anyhow::Result<()> {
    let watcher = Watcher::new(root, config)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("failed to install interrupt handler")?;

    watcher.start()?.run_until(&shutdown)?;
    Ok(())
}

#[instrument]
fn init(root: &Path) -> anyhow::Result<()> {
    let path = root.join(CONFIG_FILE_NAME);
    if path.exists() {
        anyhow::bail!("Already initialized (found existing {CONFIG_FILE_NAME})");
    }

    Config::default()
        .save(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}
