use std::path::{Path, PathBuf};

use notify::{Event, EventKind, event::CreateKind};

use crate::{
    Config,
    domain::GrammarError,
    storage::{Settle, Transcoder},
};

/// Filters filesystem events and renders the text files they name.
///
/// Processing errors are logged and never returned, so one bad file cannot
/// stop the watcher.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: Config,
    settle: Settle,
    transcoder: Transcoder,
}

impl Dispatcher {
    /// Creates a dispatcher from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured title grammar is invalid.
    pub fn new(config: &Config) -> Result<Self, GrammarError> {
        Ok(Self {
            config: config.clone(),
            settle: Settle::from(&config.settle),
            transcoder: Transcoder::from_config(config)?,
        })
    }

    /// Returns the paths in an event that should be rendered.
    ///
    /// Only creation events are considered. Directories are skipped, as are
    /// files that do not have the source extension.
    #[must_use]
    pub fn accepted<'a>(&self, event: &'a Event) -> Vec<&'a Path> {
        match event.kind {
            EventKind::Create(CreateKind::Folder) => Vec::new(),
            EventKind::Create(_) => event
                .paths
                .iter()
                .map(PathBuf::as_path)
                .filter(|path| !path.is_dir())
                .filter(|path| self.config.is_source(path))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Handles a single event.
    ///
    /// Returns the number of files that were rendered successfully.
    #[must_use]
    pub fn dispatch(&self, event: &Event) -> usize {
        let mut converted = 0;
        for path in self.accepted(event) {
            tracing::info!("New text file detected: {}", path.display());
            if self.process(path).is_some() {
                converted += 1;
            }
        }
        converted
    }

    /// Waits for a file to settle, then renders it.
    ///
    /// Returns the output path, or `None` if processing failed.
    #[must_use]
    pub fn process(&self, path: &Path) -> Option<PathBuf> {
        if !self.settle.wait(path) {
            tracing::debug!("{} may still be in flux", path.display());
        }

        tracing::info!("Processing {}", path.display());
        match self.transcoder.transcode(path) {
            Ok(output) => {
                tracing::info!(
                    "Successfully converted {} to {}",
                    path.display(),
                    output.display()
                );
                Some(output)
            }
            Err(e) => {
                tracing::error!("Error processing {}: {e}", path.display());
                None
            }
        }
    }
}
