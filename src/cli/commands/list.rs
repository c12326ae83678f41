//! List command implementation.
//!
//! The `template-cache list` command lists registered templates with their
//! roots in search order.

use std::collections::BTreeMap;
use std::io::Write;

use console::style;

use crate::cache::TemplatePaths;
use crate::cli::session::TemplateSession;
use crate::error::Result;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    json: bool,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl Command for ListCommand {
    fn execute(&self, session: &mut TemplateSession, out: &mut dyn Write) -> Result<CommandResult> {
        let config = &session.config;
        let registered: BTreeMap<&str, &TemplatePaths> = config
            .names()
            .into_iter()
            .filter_map(|name| config.paths(name).map(|paths| (name, paths)))
            .collect();

        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&registered)?)?;
            return Ok(CommandResult::success());
        }

        if registered.is_empty() {
            writeln!(out, "No templates registered")?;
            return Ok(CommandResult::success());
        }

        for (name, paths) in registered {
            writeln!(out, "{}", style(name).bold())?;
            writeln!(out, "  files: {}", paths.filenames.join(", "))?;
            for root in paths.search_order() {
                writeln!(out, "  {}", root.display())?;
            }
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
templates:
  - name: hero
    root: /skin1
    filenames: [idle.png, attack.png]
  - name: hero
    root: /skin2
    filenames: [idle.png, attack.png]
"#;

    #[test]
    fn lists_roots_newest_first() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("templates.yml"), MANIFEST).unwrap();
        let mut session = TemplateSession::open(&[], temp.path(), false).unwrap();

        let mut out = Vec::new();
        ListCommand::new(false)
            .execute(&mut session, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("files: idle.png, attack.png"));
        let skin2 = text.find("/skin2").unwrap();
        let skin1 = text.find("/skin1").unwrap();
        assert!(skin2 < skin1);
    }

    #[test]
    fn empty_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("templates.yml"), "").unwrap();
        let mut session = TemplateSession::open(&[], temp.path(), false).unwrap();

        let mut out = Vec::new();
        ListCommand::new(false)
            .execute(&mut session, &mut out)
            .unwrap();
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("No templates registered"));
    }

    #[test]
    fn json_output_keeps_registration_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("templates.yml"), MANIFEST).unwrap();
        let mut session = TemplateSession::open(&[], temp.path(), false).unwrap();

        let mut out = Vec::new();
        ListCommand::new(true).execute(&mut session, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["hero"]["roots"][0], "/skin1");
        assert_eq!(value["hero"]["roots"][1], "/skin2");
    }
}
