//! Documentation page assembler.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use docshell_exec::{CommandRunner, ExitState};

use crate::document::{AssemblyStage, OutputDocument};
use crate::rewrite::{RewriteError, RewriteRule, Rewriter};
use crate::templates::{TemplateContext, TemplateEngine};

const SCAFFOLD_OPEN: &str = "<h2 id=\"pkg-index\">Index</h2>\n<div id=\"manual-nav\">\n<dl>\n";
const SCAFFOLD_CLOSE: &str = "</dl>\n</div><!-- manual-nav -->\n";

/// Configuration for assembling a documentation page.
#[derive(Debug, Clone)]
pub struct AssemblyConfig {
    /// Output HTML file
    pub output_path: PathBuf,

    /// Package identifier handed to the extractor
    pub package_id: String,

    /// Page title, used for `<title>` and the top heading
    pub title: String,

    /// Stylesheet URL referenced by the page
    pub stylesheet_path: String,

    /// Client script URL referenced by the page
    pub script_path: String,

    /// License file shown in the footer
    pub license_path: PathBuf,

    /// Extractor program, run as `<extractor> -html <package_id>`
    pub extractor: String,

    /// Full extraction command line, replacing the extractor invocation
    pub extract_command: Option<String>,

    /// Rewrites applied to the page after the extractor output is inserted
    pub rewrite_rules: Vec<RewriteRule>,

    /// Abort when the extraction command fails instead of continuing
    pub fail_fast: bool,
}

impl AssemblyConfig {
    /// The command line that produces the page body.
    pub fn extraction_command(&self) -> String {
        match &self.extract_command {
            Some(command) => command.clone(),
            None => format!("{} -html {}", self.extractor, self.package_id),
        }
    }
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("doc/index.html"),
            package_id: "github.com/cpmech/goga".to_string(),
            title: "Goga &ndash; Documentation".to_string(),
            stylesheet_path: "static/style.css".to_string(),
            script_path: "static/godocs.js".to_string(),
            license_path: PathBuf::from("LICENSE"),
            extractor: "godoc".to_string(),
            extract_command: None,
            rewrite_rules: vec![RewriteRule::literal(
                "/src/target",
                "https://github.com/cpmech/goga/blob/master",
            )],
            fail_fast: false,
        }
    }
}

/// Result of an assembly run.
#[derive(Debug)]
pub struct AssemblyReport {
    /// Output file
    pub output_path: PathBuf,

    /// Bytes of extractor output embedded in the page
    pub body_bytes: usize,

    /// Size of the finished page in bytes
    pub total_bytes: usize,

    /// Number of link rewrites applied
    pub rewrites: usize,

    /// How the extraction command ended
    pub extractor_status: ExitState,

    /// Total assembly time in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur during assembly.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error("Failed to read license {path}: {message}")]
    LicenseError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error(transparent)]
    RewriteError(#[from] RewriteError),

    #[error("Extraction command `{command}` failed ({status}): {stderr}")]
    ExtractionError {
        command: String,
        status: ExitState,
        stderr: String,
    },

    #[error("Assembly step out of order: {requested:?} cannot follow {current:?}")]
    OutOfOrder {
        current: AssemblyStage,
        requested: AssemblyStage,
    },
}

/// Builds the documentation page.
pub struct DocAssembler {
    config: AssemblyConfig,
    runner: CommandRunner,
    templates: TemplateEngine,
    rewriter: Rewriter,
}

impl DocAssembler {
    /// Create an assembler, validating the rewrite rules up front.
    pub fn new(config: AssemblyConfig, runner: CommandRunner) -> Result<Self, AssembleError> {
        let rewriter = Rewriter::new(&config.rewrite_rules)?;

        Ok(Self {
            config,
            runner,
            templates: TemplateEngine::new(),
            rewriter,
        })
    }

    /// Regenerate the page from scratch.
    ///
    /// A failing extraction command is logged and the page is finished
    /// around whatever it printed, unless `fail_fast` is set.
    pub async fn assemble(&self) -> Result<AssemblyReport, AssembleError> {
        let start = Instant::now();
        let config = &self.config;

        // The footer cannot be rendered without the license, so read it
        // before touching the output.
        let license = fs::read_to_string(&config.license_path).map_err(|e| {
            AssembleError::LicenseError {
                path: config.license_path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let context = TemplateContext {
            title: config.title.clone(),
            stylesheet: config.stylesheet_path.clone(),
            script: config.script_path.clone(),
            license,
        };

        let header = self
            .templates
            .render_header(&context)
            .map_err(|e| AssembleError::TemplateError(e.to_string()))?;
        let footer = self
            .templates
            .render_footer(&context)
            .map_err(|e| AssembleError::TemplateError(e.to_string()))?;

        let mut doc = OutputDocument::create(&config.output_path, &header)?;

        doc.append(
            format!("<h1>{}</h1>\n", config.title).as_bytes(),
            AssemblyStage::TitleWritten,
        )?;
        doc.append(SCAFFOLD_OPEN.as_bytes(), AssemblyStage::ScaffoldOpen)?;

        let command = config.extraction_command();
        tracing::info!("Extracting documentation for {}", config.package_id);
        let outcome = self.runner.run(&command).await;

        if !outcome.succeeded() {
            if config.fail_fast {
                return Err(AssembleError::ExtractionError {
                    command,
                    status: outcome.status,
                    stderr: outcome.stderr,
                });
            }
            tracing::warn!("Extraction command `{}` {}", command, outcome.status);
        }
        if !outcome.stderr.is_empty() {
            tracing::warn!("Extractor: {}", outcome.stderr);
        }
        if outcome.stdout.is_empty() {
            tracing::warn!("Extractor produced no output");
        }

        doc.append(&outcome.stdout, AssemblyStage::BodyInserted)?;

        let rewrites = doc.rewrite_links(&self.rewriter)?;
        tracing::debug!(
            "Applied {} rewrite rules ({} replacements)",
            self.rewriter.len(),
            rewrites
        );

        doc.append(SCAFFOLD_CLOSE.as_bytes(), AssemblyStage::ScaffoldClosed)?;
        doc.append(footer.as_bytes(), AssemblyStage::Complete)?;

        Ok(AssemblyReport {
            output_path: doc.path().to_path_buf(),
            body_bytes: outcome.stdout.len(),
            total_bytes: doc.len(),
            rewrites,
            extractor_status: outcome.status,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
