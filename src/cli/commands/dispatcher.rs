//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::cli::session::TemplateSession;
use crate::error::Result;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `session` - Loaded manifest and populated cache
    /// * `out` - Where to write command output
    fn execute(&self, session: &mut TemplateSession, out: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    working_dir: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher resolving relative paths against `working_dir`.
    pub fn new(working_dir: PathBuf) -> Self {
        Self { working_dir }
    }

    /// Get the working directory.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Load the manifests named on the command line, then route the
    /// subcommand to its implementation.
    ///
    /// Output is flushed before returning, so a failed write surfaces as an
    /// error instead of a successful result.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        let mut session = TemplateSession::open(&cli.manifest, &self.working_dir, cli.strict)?;

        let result = match &cli.command {
            Commands::Check => super::check::CheckCommand::new(cli.json).execute(&mut session, out),
            Commands::Resolve(args) => {
                let cmd = super::resolve::ResolveCommand::new(args.clone(), cli.json);
                cmd.execute(&mut session, out)
            }
            Commands::List => super::list::ListCommand::new(cli.json).execute(&mut session, out),
            Commands::Stats => super::stats::StatsCommand::new(cli.json).execute(&mut session, out),
        }?;

        out.flush()?;
        Ok(result)
    }
}
