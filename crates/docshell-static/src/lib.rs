//! Static documentation page assembler for docshell.
//!
//! Wraps the HTML produced by a source-documentation extractor in a fixed page
//! shell and retargets its source links at a public repository.

pub mod assembler;
pub mod document;
pub mod rewrite;
pub mod templates;

pub use assembler::{AssembleError, AssemblyConfig, AssemblyReport, DocAssembler};
pub use document::{AssemblyStage, OutputDocument};
pub use rewrite::{RewriteError, RewriteRule, Rewriter};
pub use templates::{TemplateContext, TemplateEngine};
