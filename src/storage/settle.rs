use std::{path::Path, thread, time::Duration};

use crate::domain::SettleConfig;

/// Waits for a freshly created file to be fully written.
///
/// This narrows the race against a writer that is still flushing, but does
/// not close it: a writer that pauses for longer than the wait will still be
/// read half-way through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// Sleep for a fixed delay.
    Delay(Duration),

    /// Poll the file length until two consecutive checks agree.
    StableSize {
        /// Time between checks.
        interval: Duration,
        /// Give up after this many checks.
        max_checks: u32,
    },
}

impl Settle {
    /// Blocks until the file is considered settled.
    ///
    /// Returns `false` if the file size never stabilised or the file
    /// disappeared while waiting. Callers may go ahead and read the file
    /// either way.
    #[must_use]
    pub fn wait(&self, path: &Path) -> bool {
        match *self {
            Self::Delay(delay) => {
                thread::sleep(delay);
                true
            }
            Self::StableSize {
                interval,
                max_checks,
            } => {
                let mut previous = file_len(path);
                for _ in 0..max_checks {
                    thread::sleep(interval);
                    let current = file_len(path);
                    match (previous, current) {
                        (_, None) => {
                            tracing::debug!("{} vanished while settling", path.display());
                            return false;
                        }
                        (Some(before), Some(after)) if before == after => return true,
                        _ => previous = current,
                    }
                }
                tracing::debug!(
                    "{} still changing after {max_checks} checks",
                    path.display()
                );
                false
            }
        }
    }
}

impl From<&SettleConfig> for Settle {
    fn from(config: &SettleConfig) -> Self {
        match *config {
            SettleConfig::Delay { delay_ms } => Self::Delay(Duration::from_millis(delay_ms)),
            SettleConfig::StableSize {
                interval_ms,
                max_checks,
            } => Self::StableSize {
                interval: Duration::from_millis(interval_ms),
                max_checks,
            },
        }
    }
}

impl Default for Settle {
    fn default() -> Self {
        Self::from(&SettleConfig::default())
    }
}

fn file_len(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|metadata| metadata.len())
}
