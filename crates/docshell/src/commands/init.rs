//! Write a starter configuration.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::DEFAULT_CONFIG_PATH;

/// Run the init command.
pub async fn run(config_path: Option<PathBuf>, yes: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());
    tracing::info!("Run 'docshell build' to generate the page.");

    Ok(())
}

pub const DEFAULT_CONFIG: &str = r#"# docshell configuration

[package]
# Package handed to the extractor
id = "github.com/cpmech/goga"

# Page title (inserted without escaping)
title = "Goga &ndash; Documentation"

# Extractor, run as `<extractor> -html <id>`
extractor = "godoc"

# Full extraction command line, replacing the one above
# command = "godoc -html github.com/cpmech/goga"

[output]
# Generated page
path = "doc/index.html"

# Text shown in the footer
license = "LICENSE"

# Assets referenced by the page, relative to it
stylesheet = "static/style.css"
script = "static/godocs.js"

# Link rewrites, applied in order to the extractor output
[[rewrite]]
from = "/src/target"
to = "https://github.com/cpmech/goga/blob/master"

[build]
# Stop when the extraction command fails
fail_fast = false
"#;
