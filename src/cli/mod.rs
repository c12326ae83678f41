//! Command-line interface for template-cache.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations
//! - [`session`] - Manifest loading shared by every command

pub mod args;
pub mod commands;
pub mod session;

pub use args::{Cli, Commands, ResolveArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
pub use session::TemplateSession;
