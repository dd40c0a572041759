use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::instrument;
use txtwatch::{Config, Transcoder, storage::collect_sources};

use super::terminal::Colorize;

#[derive(Debug, Parser, Default)]
#[command(about = "Render existing text files without watching")]
pub struct Convert {
    /// Files to render (defaults to every matching file under the root)
    paths: Vec<PathBuf>,
}

/// Counts of rendered and failed files.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    converted: usize,
    failed: usize,
}

impl Convert {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, root: &Path, config: &Config) -> anyhow::Result<()> {
        let transcoder = Transcoder::from_config(config)?;

        let paths = if self.paths.is_empty() {
            collect_sources(root, config)
        } else {
            self.paths
        };

        if paths.is_empty() {
            println!(
                "{}",
                format!("No .{} files found under {}", config.extension(), root.display()).dim()
            );
            return Ok(());
        }

        let summary = convert_all(&transcoder, &paths);
        summary.print();

        if summary.failed > 0 {
            anyhow::bail!("{} file(s) could not be converted", summary.failed);
        }
        Ok(())
    }
}

fn convert_all(transcoder: &Transcoder, paths: &[PathBuf]) -> Summary {
    let mut summary = Summary::default();
    for path in paths {
        tracing::info!("Processing {}", path.display());
        match transcoder.transcode(path) {
            Ok(output) => {
                tracing::info!(
                    "Successfully converted {} to {}",
                    path.display(),
                    output.display()
                );
                summary.converted += 1;
            }
            Err(e) => {
                tracing::error!("Error processing {}: {e}", path.display());
                summary.failed += 1;
            }
        }
    }
    summary
}

impl Summary {
    fn print(&self) {
        let converted = format!("{} converted", self.converted);
        if self.failed == 0 {
            println!("{}", converted.success());
        } else {
            let failed = format!("{} failed", self.failed);
            println!("{}, {}", converted.success(), failed.failure());
        }
    }
}
