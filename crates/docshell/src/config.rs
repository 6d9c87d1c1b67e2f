//! Configuration file structure (docshell.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docshell_static::{AssemblyConfig, RewriteRule};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "docshell.toml";

/// Top-level config file. Every key is optional; missing keys keep the
/// built-in defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    package: PackageConfig,
    #[serde(default)]
    output: OutputConfig,
    /// Replaces the default rule list when present, even if empty
    rewrite: Option<Vec<RewriteEntry>>,
    #[serde(default)]
    build: BuildSettings,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PackageConfig {
    id: Option<String>,
    title: Option<String>,
    extractor: Option<String>,
    /// Full extraction command line
    command: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct OutputConfig {
    path: Option<PathBuf>,
    license: Option<PathBuf>,
    stylesheet: Option<String>,
    script: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RewriteEntry {
    from: String,
    to: String,
    #[serde(default)]
    regex: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct BuildSettings {
    #[serde(default)]
    fail_fast: bool,
}

impl ConfigFile {
    /// Parse config file contents.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay the file's settings on the built-in defaults.
    pub fn into_assembly_config(self) -> AssemblyConfig {
        let defaults = AssemblyConfig::default();

        AssemblyConfig {
            output_path: self.output.path.unwrap_or(defaults.output_path),
            package_id: self.package.id.unwrap_or(defaults.package_id),
            title: self.package.title.unwrap_or(defaults.title),
            stylesheet_path: self.output.stylesheet.unwrap_or(defaults.stylesheet_path),
            script_path: self.output.script.unwrap_or(defaults.script_path),
            license_path: self.output.license.unwrap_or(defaults.license_path),
            extractor: self.package.extractor.unwrap_or(defaults.extractor),
            extract_command: self.package.command.or(defaults.extract_command),
            rewrite_rules: match self.rewrite {
                Some(entries) => entries
                    .into_iter()
                    .map(|e| RewriteRule {
                        from: e.from,
                        to: e.to,
                        regex: e.regex,
                    })
                    .collect(),
                None => defaults.rewrite_rules,
            },
            fail_fast: self.build.fail_fast,
        }
    }
}

/// Load configuration.
///
/// An explicitly given path must exist. Without one, `docshell.toml` in the
/// current directory is used when present and defaults otherwise. A file that
/// exists but does not parse is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !path.exists() {
                return Ok(ConfigFile::default());
            }
            path
        }
    };

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config = ConfigFile::parse(&content)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    tracing::info!("Loaded config from {}", config_path.display());
    Ok(config)
}
