//! The watch loop.
//!
//! A `notify` watcher runs on its own background thread and forwards raw
//! events over a channel. The thread that owns the [`Session`] receives them
//! one at a time and hands them to the [`Dispatcher`], so files are processed
//! strictly one after another.

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError},
    },
    time::Duration,
};

use notify::{RecommendedWatcher, RecursiveMode, Watcher as _};

use crate::{Config, domain::GrammarError};

mod dispatcher;
pub use dispatcher::Dispatcher;

/// How often the loop wakes up to check for shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Watches a directory and renders text files as they are created.
#[derive(Debug)]
pub struct Watcher {
    root: PathBuf,
    recursive: bool,
    dispatcher: Dispatcher,
}

impl Watcher {
    /// Creates a watcher for the given root.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not an existing directory, or the
    /// configured grammar is invalid.
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Result<Self, WatchError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(WatchError::MissingRoot(root));
        }

        Ok(Self {
            root,
            recursive: config.recursive,
            dispatcher: Dispatcher::new(config)?,
        })
    }

    /// Starts watching the root.
    ///
    /// Events are queued from this point on, and are handled by polling the
    /// returned [`Session`].
    ///
    /// # Errors
    ///
    /// Returns an error if the platform watcher cannot be created or cannot
    /// watch the root.
    pub fn start(&self) -> Result<Session<'_>, WatchError> {
        let (sender, events) = mpsc::channel();
        let mut notifier = notify::recommended_watcher(sender)?;

        let mode = if self.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        notifier.watch(&self.root, mode)?;

        tracing::info!("Starting file watcher for directory: {}", self.root.display());

        Ok(Session {
            watcher: self,
            notifier,
            events,
        })
    }
}

/// A running watch on a directory.
///
/// Dropping the session stops the background watcher thread.
#[derive(Debug)]
pub struct Session<'a> {
    watcher: &'a Watcher,
    notifier: RecommendedWatcher,
    events: Receiver<notify::Result<notify::Event>>,
}

impl Session<'_> {
    /// Waits up to `timeout` for one event and handles it.
    ///
    /// Returns `true` if an event was received.
    ///
    /// # Errors
    ///
    /// Returns an error if the background watcher has gone away.
    pub fn poll(&self, timeout: Duration) -> Result<bool, WatchError> {
        match self.events.recv_timeout(timeout) {
            Ok(Ok(event)) => {
                tracing::trace!("Received {event:?}");
                let converted = self.watcher.dispatcher.dispatch(&event);
                tracing::trace!("Converted {converted} file(s)");
                Ok(true)
            }
            Ok(Err(e)) => {
                tracing::warn!("File watcher error: {e}");
                Ok(true)
            }
            Err(RecvTimeoutError::Timeout) => Ok(false),
            Err(RecvTimeoutError::Disconnected) => Err(WatchError::Disconnected),
        }
    }

    /// Handles events until `shutdown` is set, then stops the watcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the background watcher goes away unexpectedly.
    pub fn run_until(self, shutdown: &AtomicBool) -> Result<(), WatchError> {
        while !shutdown.load(Ordering::SeqCst) {
            self.poll(POLL_INTERVAL)?;
        }

        // Joins the notify thread
        drop(self.notifier);
        tracing::info!("File watcher stopped.");
        Ok(())
    }
}

/// Errors that stop the watcher from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The root directory does not exist.
    #[error("watch directory '{}' does not exist", .0.display())]
    MissingRoot(PathBuf),

    /// The configured title grammar is invalid.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// The platform watcher failed.
    #[error("failed to watch directory")]
    Notify(#[from] notify::Error),

    /// The platform watcher stopped sending events.
    #[error("file watcher disconnected")]
    Disconnected,
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path, time::Instant};

    use tempfile::TempDir;

    use super::*;
    use crate::domain::SettleConfig;

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.settle = SettleConfig::Delay { delay_ms: 0 };
        config
    }

    /// Polls the session until `path` exists or a few seconds pass.
    fn poll_for(session: &Session<'_>, path: &Path) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            session.poll(Duration::from_millis(50)).unwrap();
            if path.exists() {
                return true;
            }
        }
        false
    }

    #[test]
    fn missing_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let result = Watcher::new(tmp.path().join("nope"), &Config::default());
        assert!(matches!(result, Err(WatchError::MissingRoot(_))));
    }

    #[test]
    fn file_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "").unwrap();
        let result = Watcher::new(&file, &Config::default());
        assert!(matches!(result, Err(WatchError::MissingRoot(_))));
    }

    #[test]
    fn invalid_grammar_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.title = crate::domain::TitleConfig::Pattern {
            pattern: "(".to_string(),
        };
        let result = Watcher::new(tmp.path(), &config);
        assert!(matches!(result, Err(WatchError::Grammar(_))));
    }

    #[test]
    fn renders_created_file() {
        let tmp = TempDir::new().unwrap();
        let watcher = Watcher::new(tmp.path(), &fast_config()).unwrap();
        let session = watcher.start().unwrap();

        fs::write(tmp.path().join("news.txt"), "News | 新闻\n").unwrap();

        let output = tmp.path().join("news.html");
        assert!(poll_for(&session, &output), "no output rendered");
        let html = fs::read_to_string(output).unwrap();
        assert!(html.contains("<h2>News - 新闻</h2>"));
    }

    #[test]
    fn renders_created_file_in_subdirectory() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let watcher = Watcher::new(tmp.path(), &fast_config()).unwrap();
        let session = watcher.start().unwrap();

        fs::write(sub.join("nested.txt"), "hello\n").unwrap();

        assert!(poll_for(&session, &sub.join("nested.html")));
    }

    #[test]
    fn run_until_returns_once_shutdown_is_set() {
        let tmp = TempDir::new().unwrap();
        let watcher = Watcher::new(tmp.path(), &fast_config()).unwrap();
        let session = watcher.start().unwrap();

        let shutdown = AtomicBool::new(true);
        session.run_until(&shutdown).unwrap();
    }
}
