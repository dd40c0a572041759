use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    Config,
    domain::{Document, Grammar, GrammarError},
};

/// Converts a text file into an HTML file next to it.
#[derive(Debug, Clone)]
pub struct Transcoder {
    grammar: Grammar,
    output_extension: String,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new(Grammar::default(), "html")
    }
}

impl Transcoder {
    /// Creates a transcoder with the given grammar and output extension.
    #[must_use]
    pub fn new(grammar: Grammar, output_extension: impl Into<String>) -> Self {
        Self {
            grammar,
            output_extension: output_extension.into(),
        }
    }

    /// Creates a transcoder from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured title grammar is invalid.
    pub fn from_config(config: &Config) -> Result<Self, GrammarError> {
        Ok(Self::new(config.grammar()?, config.output_extension()))
    }

    /// Returns the sibling path the rendered document is written to.
    ///
    /// The output has the same directory and base name as the input, with the
    /// extension replaced.
    #[must_use]
    pub fn output_path(&self, input: &Path) -> PathBuf {
        input.with_extension(&self.output_extension)
    }

    /// Reads and parses a text file.
    ///
    /// The document title is the file name without its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no file name, or the file cannot be
    /// read as UTF-8.
    pub fn parse(&self, input: &Path) -> Result<Document, TranscodeError> {
        let title = input
            .file_stem()
            .ok_or_else(|| TranscodeError::InvalidPath(input.to_path_buf()))?
            .to_string_lossy();

        let content = fs::read_to_string(input).map_err(|source| TranscodeError::Read {
            path: input.to_path_buf(),
            source,
        })?;

        Ok(Document::parse(
            title,
            universal_lines(&content),
            &self.grammar,
        ))
    }

    /// Renders a text file and writes the result to its output path,
    /// replacing any existing file.
    ///
    /// Returns the path that was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read, the output path is the
    /// input itself, or the output cannot be written.
    pub fn transcode(&self, input: &Path) -> Result<PathBuf, TranscodeError> {
        let output = self.output_path(input);
        if output == input {
            return Err(TranscodeError::SameFile(output));
        }
        let html = self.parse(input)?.render();

        fs::write(&output, html).map_err(|source| TranscodeError::Write {
            path: output.clone(),
            source,
        })?;

        Ok(output)
    }
}

/// Splits text on `\n`, `\r\n` and lone `\r` line endings.
fn universal_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Errors that can occur while transcoding a single file.
#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    /// The path has no file name to derive a title or output from.
    #[error("{} has no file name", .0.display())]
    InvalidPath(PathBuf),

    /// The output path would overwrite the source file.
    #[error("refusing to overwrite source file {}", .0.display())]
    SameFile(PathBuf),

    /// The source file could not be read, or was not valid UTF-8.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file that was read.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The rendered file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The file that was written.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}
