//! The `cast-labeler` command: trace a transaction, name its addresses, write a labeled replay.

pub mod cmd;
pub mod opts;
pub mod runner;

pub use cmd::Outcome;
pub use opts::{KnownLabel, LabelArgs};
pub use runner::TraceRunner;
