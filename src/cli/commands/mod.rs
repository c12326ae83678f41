//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which loads the
//! manifests once and routes CLI subcommands to their implementations.

pub mod check;
pub mod dispatcher;
pub mod list;
pub mod resolve;
pub mod stats;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
