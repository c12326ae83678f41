//! Stats command implementation.
//!
//! The `template-cache stats` command resolves every template, then reports
//! how many entries each cache tier holds.

use std::io::Write;

use crate::cli::session::TemplateSession;
use crate::error::Result;

use super::dispatcher::{Command, CommandResult};

/// The stats command implementation.
pub struct StatsCommand {
    json: bool,
}

impl StatsCommand {
    /// Create a new stats command.
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl Command for StatsCommand {
    fn execute(&self, session: &mut TemplateSession, out: &mut dyn Write) -> Result<CommandResult> {
        for name in session.names() {
            // Failures are already logged by the cache.
            let _ = session.config.get_template_images(&name);
        }

        let stats = session.config.stats();

        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
        } else {
            writeln!(out, "Mode: {}", session.mode())?;
            writeln!(out, "Registered names: {}", stats.registered)?;
            writeln!(out, "Assembled lists: {}", stats.assembled)?;
            writeln!(out, "Banked images: {}", stats.banked)?;
        }

        Ok(CommandResult::success())
    }
}
