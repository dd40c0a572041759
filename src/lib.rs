//! Text-to-HTML Directory Watcher
//!
//! Newly created plain-text files in a watched directory are rendered as HTML
//! documents next to their source.

pub mod domain;
pub use domain::{Block, CONFIG_FILE_NAME, Config, Document, Grammar, Node, TitleGrammar};

/// Reading sources, settling fresh files and writing rendered output.
pub mod storage;
pub use storage::{Settle, TranscodeError, Transcoder};

pub mod watch;
pub use watch::{Dispatcher, Session, WatchError, Watcher};
