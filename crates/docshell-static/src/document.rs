//! The output page, grown one fragment at a time.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::assembler::AssembleError;
use crate::rewrite::Rewriter;

/// Where a page is in its assembly.
///
/// Stages only move forward, one step at a time, and every step appends to
/// the file except `LinksRewritten`, which edits it in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssemblyStage {
    Empty,
    HeaderWritten,
    TitleWritten,
    ScaffoldOpen,
    BodyInserted,
    LinksRewritten,
    ScaffoldClosed,
    Complete,
}

impl AssemblyStage {
    /// The stage that follows this one.
    pub fn next(self) -> Option<Self> {
        use AssemblyStage::*;

        match self {
            Empty => Some(HeaderWritten),
            HeaderWritten => Some(TitleWritten),
            TitleWritten => Some(ScaffoldOpen),
            ScaffoldOpen => Some(BodyInserted),
            BodyInserted => Some(LinksRewritten),
            LinksRewritten => Some(ScaffoldClosed),
            ScaffoldClosed => Some(Complete),
            Complete => None,
        }
    }
}

/// A single HTML file on disk being assembled in order.
#[derive(Debug)]
pub struct OutputDocument {
    path: PathBuf,
    stage: AssemblyStage,
    written: usize,
}

impl OutputDocument {
    /// Start a fresh document at `path` containing only `header`.
    ///
    /// Any previous file at `path` is replaced and missing parent
    /// directories are created.
    pub fn create(path: &Path, header: &str) -> Result<Self, AssembleError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;
            }
        }

        fs::write(path, header).map_err(|e| write_error(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            stage: AssemblyStage::HeaderWritten,
            written: header.len(),
        })
    }

    /// Append `fragment` to the end of the file, moving to `stage`.
    ///
    /// The bytes are written unchanged.
    pub fn append(&mut self, fragment: &[u8], stage: AssemblyStage) -> Result<(), AssembleError> {
        if stage == AssemblyStage::LinksRewritten {
            return Err(AssembleError::OutOfOrder {
                current: self.stage,
                requested: stage,
            });
        }
        self.advance_to(stage)?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| write_error(&self.path, e))?;
        file.write_all(fragment)
            .map_err(|e| write_error(&self.path, e))?;

        self.written += fragment.len();
        self.stage = stage;
        Ok(())
    }

    /// Apply `rewriter` to everything written so far.
    ///
    /// Only valid right after the body has been inserted. Returns the number
    /// of replacements made.
    pub fn rewrite_links(&mut self, rewriter: &Rewriter) -> Result<usize, AssembleError> {
        self.advance_to(AssemblyStage::LinksRewritten)?;

        let count = rewriter.rewrite_file(&self.path)?;
        self.written = fs::metadata(&self.path)
            .map_err(|e| write_error(&self.path, e))?
            .len() as usize;

        self.stage = AssemblyStage::LinksRewritten;
        Ok(count)
    }

    /// Output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current stage.
    pub fn stage(&self) -> AssemblyStage {
        self.stage
    }

    /// Size of the file in bytes.
    pub fn len(&self) -> usize {
        self.written
    }

    /// True when the file is empty.
    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    fn advance_to(&self, requested: AssemblyStage) -> Result<(), AssembleError> {
        if self.stage.next() == Some(requested) {
            Ok(())
        } else {
            Err(AssembleError::OutOfOrder {
                current: self.stage,
                requested,
            })
        }
    }
}

fn write_error(path: &Path, e: std::io::Error) -> AssembleError {
    AssembleError::WriteError(format!("{}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::RewriteRule;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn stages_form_a_single_chain() {
        let mut stage = AssemblyStage::Empty;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            seen.push(next);
            stage = next;
        }

        assert_eq!(seen.len(), 8);
        assert_eq!(stage, AssemblyStage::Complete);
    }

    #[test]
    fn appends_in_order() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("doc").join("index.html");

        let mut doc = OutputDocument::create(&path, "<header>").unwrap();
        doc.append(b"<h1>T</h1>", AssemblyStage::TitleWritten).unwrap();
        doc.append(b"<dl>", AssemblyStage::ScaffoldOpen).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<header><h1>T</h1><dl>");
        assert_eq!(doc.stage(), AssemblyStage::ScaffoldOpen);
        assert_eq!(doc.len(), 22);
    }

    #[test]
    fn create_replaces_previous_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("index.html");
        fs::write(&path, "stale content from an earlier run").unwrap();

        OutputDocument::create(&path, "fresh").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn rejects_skipped_stages() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("index.html");

        let mut doc = OutputDocument::create(&path, "h").unwrap();
        let err = doc.append(b"body", AssemblyStage::BodyInserted).unwrap_err();

        assert!(matches!(
            err,
            AssembleError::OutOfOrder {
                current: AssemblyStage::HeaderWritten,
                requested: AssemblyStage::BodyInserted,
            }
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "h");
    }

    #[test]
    fn rewrite_only_follows_body() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("index.html");
        let rewriter = Rewriter::new(&[RewriteRule::literal("/src/target", "https://x")]).unwrap();

        let mut doc = OutputDocument::create(&path, "h").unwrap();
        assert!(doc.rewrite_links(&rewriter).is_err());

        doc.append(b"t", AssemblyStage::TitleWritten).unwrap();
        doc.append(b"s", AssemblyStage::ScaffoldOpen).unwrap();
        doc.append(b"/src/target/a.go", AssemblyStage::BodyInserted).unwrap();
        assert!(doc.append(b"x", AssemblyStage::LinksRewritten).is_err());

        assert_eq!(doc.rewrite_links(&rewriter).unwrap(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "htshttps://x/a.go");
        assert_eq!(doc.len(), 17);
    }
}
