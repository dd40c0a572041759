use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Grammar, GrammarError, TitleGrammar, grammar::DEFAULT_SEPARATOR};

/// The name of the configuration file looked up in the watched root.
pub const FILE_NAME: &str = ".txtwatch.toml";

/// Configuration for watching and rendering.
///
/// This struct holds settings that control which files are picked up, how
/// long to wait before reading them, and which title grammar to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Versions", into = "Versions")]
pub struct Config {
    /// The extension of source files, without the leading dot.
    ///
    /// Matching is case-sensitive against the end of the file name.
    extension: String,

    /// The extension given to rendered files, without the leading dot.
    output_extension: String,

    /// Whether subdirectories of the root are watched too.
    pub recursive: bool,

    /// How to wait for a freshly created file to be fully written.
    pub settle: SettleConfig,

    /// How title lines are recognised.
    pub title: TitleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            output_extension: default_output_extension(),
            recursive: true,
            settle: SettleConfig::default(),
            title: TitleConfig::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `.txtwatch.toml` from the root, falling back to the defaults if
    /// there is no such file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_root(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(FILE_NAME);
        if path.is_file() {
            tracing::debug!("Loading config from {}", path.display());
            Self::load(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the source file extension.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the rendered file extension.
    #[must_use]
    pub fn output_extension(&self) -> &str {
        &self.output_extension
    }

    /// Checks whether a path names a source file.
    ///
    /// Only the file name is inspected; the path need not exist.
    #[must_use]
    pub fn is_source(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(self.extension.as_str()))
            .is_some_and(|rest| rest.ends_with('.'))
    }

    /// Builds the line grammar selected by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured title grammar is invalid.
    pub fn grammar(&self) -> Result<Grammar, GrammarError> {
        self.title.grammar().map(Grammar::new)
    }
}

/// Strategy for waiting until a freshly created file is fully written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum SettleConfig {
    /// Sleep for a fixed delay.
    Delay {
        /// The delay, in milliseconds.
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
    },

    /// Poll the file size until two consecutive checks agree.
    StableSize {
        /// Time between checks, in milliseconds.
        #[serde(default = "default_interval_ms")]
        interval_ms: u64,

        /// Give up waiting after this many checks.
        #[serde(default = "default_max_checks")]
        max_checks: u32,
    },
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self::Delay {
            delay_ms: default_delay_ms(),
        }
    }
}

/// Which title grammar to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "grammar", rename_all = "kebab-case")]
pub enum TitleConfig {
    /// Split the line at a literal separator.
    Separator {
        /// The separator text.
        #[serde(default = "default_separator")]
        separator: String,
    },

    /// Match the whole line against a pattern with two capture groups.
    Pattern {
        /// The regular expression.
        #[serde(default = "default_pattern")]
        pattern: String,
    },
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self::Separator {
            separator: default_separator(),
        }
    }
}

impl TitleConfig {
    /// Builds the title grammar.
    ///
    /// # Errors
    ///
    /// Returns an error if the separator is empty or the pattern is invalid.
    pub fn grammar(&self) -> Result<TitleGrammar, GrammarError> {
        match self {
            Self::Separator { separator } => TitleGrammar::separator(separator.as_str()),
            Self::Pattern { pattern } => TitleGrammar::pattern(pattern),
        }
    }
}

fn default_extension() -> String {
    "txt".to_string()
}

fn default_output_extension() -> String {
    "html".to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_delay_ms() -> u64 {
    1000
}

const fn default_interval_ms() -> u64 {
    250
}

const fn default_max_checks() -> u32 {
    20
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_pattern() -> String {
    r"(.+?)\s+\|\s+(.+)".to_string()
}

/// Errors that can occur when loading or saving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}", path.display())]
    Read {
        /// The file that was read.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file {}", path.display())]
    Parse {
        /// The file that was parsed.
        path: PathBuf,
        /// The underlying error.
        source: toml::de::Error,
    },

    /// The configuration could not be serialized.
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),

    /// Rendered files would replace their own sources.
    #[error("output extension '{0}' must differ from the source extension")]
    SameExtension(String),

    /// The configuration file could not be written.
    #[error("failed to write config file {}", path.display())]
    Write {
        /// The file that was written.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_extension")]
        extension: String,

        #[serde(default = "default_output_extension")]
        output_extension: String,

        #[serde(default = "default_true")]
        recursive: bool,

        #[serde(default)]
        settle: SettleConfig,

        #[serde(default)]
        title: TitleConfig,
    },
}

impl TryFrom<Versions> for Config {
    type Error = ConfigError;

    fn try_from(versions: Versions) -> Result<Self, Self::Error> {
        match versions {
            Versions::V1 {
                extension,
                output_extension,
                recursive,
                settle,
                title,
            } => {
                if extension == output_extension {
                    return Err(ConfigError::SameExtension(output_extension));
                }
                Ok(Self {
                    extension,
                    output_extension,
                    recursive,
                    settle,
                    title,
                })
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            extension: config.extension,
            output_extension: config.output_extension,
            recursive: config.recursive,
            settle: config.settle,
            title: config.title,
        }
    }
}
