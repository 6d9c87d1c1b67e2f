//! Documentation page build command.

use std::path::PathBuf;

use anyhow::Result;
use docshell_exec::CommandRunner;
use docshell_static::DocAssembler;

use crate::config::load_config;

/// Flags that override the config file for one build.
#[derive(Debug, Default)]
pub struct BuildOptions {
    pub output: Option<PathBuf>,
    pub fail_fast: bool,
    pub debug: bool,
    pub verbose: bool,
}

/// Run the build command.
pub async fn run(config_path: Option<PathBuf>, options: BuildOptions) -> Result<()> {
    tracing::info!("Building documentation page...");

    let mut config = load_config(config_path.as_deref())?.into_assembly_config();

    if let Some(output) = options.output {
        config.output_path = output;
    }
    if options.fail_fast {
        config.fail_fast = true;
    }

    let runner = CommandRunner::new()
        .verbose(options.verbose)
        .debug(options.debug);

    let report = DocAssembler::new(config, runner)?.assemble().await?;

    tracing::info!(
        "Built {} byte page with {} bytes of documentation and {} rewritten links in {}ms",
        report.total_bytes,
        report.body_bytes,
        report.rewrites,
        report.duration_ms
    );
    tracing::info!("Extractor finished with {}", report.extractor_status);

    tracing::info!("Output: {}", report.output_path.display());

    Ok(())
}
