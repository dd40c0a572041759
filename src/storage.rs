mod settle;
mod sources;
mod transcoder;

pub use settle::Settle;
pub use sources::collect_sources;
pub use transcoder::{TranscodeError, Transcoder};
