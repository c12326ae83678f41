//! Check command implementation.
//!
//! The `template-cache check` command resolves every registered template
//! and reports which ones fail.

use std::io::Write;

use console::style;
use serde::Serialize;

use crate::cli::session::TemplateSession;
use crate::error::Result;

use super::dispatcher::{Command, CommandResult};

/// Outcome for one template name.
#[derive(Debug, Serialize)]
struct CheckReport {
    name: String,
    ok: bool,
    images: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// The check command implementation.
pub struct CheckCommand {
    json: bool,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl Command for CheckCommand {
    fn execute(&self, session: &mut TemplateSession, out: &mut dyn Write) -> Result<CommandResult> {
        let mut reports = Vec::new();
        for name in session.names() {
            let report = match session.config.get_template_images(&name) {
                Ok(images) => CheckReport {
                    images: images.len(),
                    name,
                    ok: true,
                    error: None,
                },
                Err(e) => CheckReport {
                    name,
                    ok: false,
                    images: 0,
                    error: Some(e.to_string()),
                },
            };
            reports.push(report);
        }

        let failed = reports.iter().filter(|r| !r.ok).count();

        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
        } else {
            for failure in &session.failures {
                writeln!(
                    out,
                    "{} {} rejected at {}: {}",
                    style("!").yellow(),
                    failure.name,
                    failure.root.display(),
                    failure.error
                )?;
            }
            for report in &reports {
                match &report.error {
                    None => writeln!(
                        out,
                        "{} {} ({} images)",
                        style("✓").green(),
                        report.name,
                        report.images
                    )?,
                    Some(error) => writeln!(out, "{} {}: {}", style("✗").red(), report.name, error)?,
                }
            }
            writeln!(
                out,
                "\n{} templates checked ({} mode), {} failed",
                reports.len(),
                session.mode(),
                failed
            )?;
        }

        Ok(if failed == 0 {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
templates:
  - name: hero
    root: skin
    filenames: [idle.png]
  - name: villain
    root: skin
    filenames: [missing.png]
"#;

    fn setup() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("skin")).unwrap();
        RgbImage::new(2, 2)
            .save(temp.path().join("skin").join("idle.png"))
            .unwrap();
        fs::write(temp.path().join("templates.yml"), MANIFEST).unwrap();
        temp
    }

    #[test]
    fn reports_failures_with_exit_code() {
        let temp = setup();
        let mut session = TemplateSession::open(&[], temp.path(), false).unwrap();

        let mut out = Vec::new();
        let result = CheckCommand::new(false).execute(&mut session, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(text.contains("hero (1 images)"));
        assert!(text.contains("villain"));
        assert!(text.contains("2 templates checked (lenient mode), 1 failed"));
    }

    #[test]
    fn strict_mode_lists_rejected_registrations() {
        let temp = setup();
        let mut session =
            TemplateSession::open(&[PathBuf::from("templates.yml")], temp.path(), true).unwrap();

        let mut out = Vec::new();
        CheckCommand::new(false).execute(&mut session, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("villain rejected at"));
        assert!(text.contains("strict mode"));
    }

    #[test]
    fn json_output() {
        let temp = setup();
        let mut session = TemplateSession::open(&[], temp.path(), false).unwrap();

        let mut out = Vec::new();
        CheckCommand::new(true).execute(&mut session, &mut out).unwrap();

        let reports: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(reports[0]["name"], "hero");
        assert_eq!(reports[0]["ok"], true);
        assert_eq!(reports[1]["ok"], false);
    }
}
