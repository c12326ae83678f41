//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// template-cache - Resolve and inspect template image sets.
#[derive(Debug, Parser)]
#[command(name = "template-cache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Manifest file; repeat to layer overrides (default: ./templates.yml)
    #[arg(short, long, global = true)]
    pub manifest: Vec<PathBuf>,

    /// Validate every template at registration time
    #[arg(long, global = true, env = "TEMPLATE_CACHE_STRICT")]
    pub strict: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve every registered template and report failures
    Check,

    /// Show the images a template resolves to
    Resolve(ResolveArgs),

    /// List registered templates and their search roots
    List,

    /// Resolve everything and show cache statistics
    Stats,
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ResolveArgs {
    /// Template names to resolve
    #[arg(required = true)]
    pub names: Vec<String>,
}
