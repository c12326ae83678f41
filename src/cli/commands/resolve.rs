//! Resolve command implementation.
//!
//! The `template-cache resolve <name>...` command shows which file each
//! template image was loaded from.

use std::io::Write;
use std::path::PathBuf;

use console::style;
use serde::Serialize;

use crate::cli::args::ResolveArgs;
use crate::cli::session::TemplateSession;
use crate::error::Result;

use super::dispatcher::{Command, CommandResult};

#[derive(Debug, Serialize)]
struct ResolvedImage {
    source: PathBuf,
    width: u32,
    height: u32,
    color: String,
}

#[derive(Debug, Serialize)]
struct ResolvedTemplate {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<ResolvedImage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// The resolve command implementation.
pub struct ResolveCommand {
    args: ResolveArgs,
    json: bool,
}

impl ResolveCommand {
    /// Create a new resolve command.
    pub fn new(args: ResolveArgs, json: bool) -> Self {
        Self { args, json }
    }
}

impl Command for ResolveCommand {
    fn execute(&self, session: &mut TemplateSession, out: &mut dyn Write) -> Result<CommandResult> {
        let resolved: Vec<ResolvedTemplate> = self
            .args
            .names
            .iter()
            .map(|name| match session.config.get_template_images(name) {
                Ok(images) => ResolvedTemplate {
                    name: name.clone(),
                    images: Some(
                        images
                            .iter()
                            .map(|image| {
                                let (width, height) = image.dimensions();
                                let color = image
                                    .pixels()
                                    .map(|pixels| format!("{:?}", pixels.color()).to_lowercase())
                                    .unwrap_or_default();
                                ResolvedImage {
                                    source: image.source().to_path_buf(),
                                    width,
                                    height,
                                    color,
                                }
                            })
                            .collect(),
                    ),
                    error: None,
                },
                Err(e) => ResolvedTemplate {
                    name: name.clone(),
                    images: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        let failed = resolved.iter().any(|r| r.error.is_some());

        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&resolved)?)?;
        } else {
            for template in &resolved {
                writeln!(out, "{}", style(&template.name).bold())?;
                if let Some(error) = &template.error {
                    writeln!(out, "  {} {}", style("✗").red(), error)?;
                }
                for image in template.images.iter().flatten() {
                    writeln!(
                        out,
                        "  {} ({}x{})",
                        image.source.display(),
                        image.width,
                        image.height
                    )?;
                }
            }
        }

        Ok(if failed {
            CommandResult::failure(1)
        } else {
            CommandResult::success()
        })
    }
}
