//! Domain models for the line grammar.
//!
//! This module contains the classified block types, the ordered classifier
//! that produces them, the document model that groups them into HTML, and the
//! configuration that selects the grammar.

/// Classified blocks and the flattened output nodes.
pub mod block;
pub use block::{Block, Node};

mod config;
pub use config::{Config, ConfigError, FILE_NAME as CONFIG_FILE_NAME, SettleConfig, TitleConfig};

/// Line classification rules.
pub mod grammar;
pub use grammar::{Error as GrammarError, Grammar, TitleGrammar};

/// HTML document assembly.
pub mod document;
pub use document::Document;
