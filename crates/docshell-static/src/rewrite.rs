//! Link rewriting for extractor output.
//!
//! The extractor links source files under a local marker path. Rules replace
//! that marker with a public source-browsing URL, in order, over the whole
//! accumulated page.

use std::fs;
use std::path::Path;

use regex::bytes::{NoExpand, Regex};

/// A find/replace pair applied to the generated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    /// Text (or pattern, when `regex` is set) to find
    pub from: String,
    /// Replacement text; may use `$1` style groups when `regex` is set
    pub to: String,
    /// Treat `from` as a regular expression
    pub regex: bool,
}

impl RewriteRule {
    /// A rule matching `from` literally.
    pub fn literal(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            regex: false,
        }
    }

    /// A rule matching `from` as a regular expression.
    pub fn pattern(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            regex: true,
        }
    }
}

/// Errors that can occur while rewriting.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("Rewrite rule has an empty pattern")]
    EmptyPattern,

    #[error("Invalid rewrite pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to rewrite {path}: {message}")]
    Io { path: String, message: String },
}

#[derive(Debug)]
struct CompiledRule {
    matcher: Regex,
    to: Vec<u8>,
    expand: bool,
}

/// An ordered, validated set of rewrite rules.
///
/// Rules run over raw bytes so extractor output that is not valid UTF-8 is
/// carried through untouched.
#[derive(Debug)]
pub struct Rewriter {
    rules: Vec<CompiledRule>,
}

impl Rewriter {
    /// Validate and compile `rules`, keeping their order.
    pub fn new(rules: &[RewriteRule]) -> Result<Self, RewriteError> {
        let rules = rules
            .iter()
            .map(|rule| {
                if rule.from.is_empty() {
                    return Err(RewriteError::EmptyPattern);
                }

                let pattern = if rule.regex {
                    rule.from.clone()
                } else {
                    regex::escape(&rule.from)
                };
                let matcher =
                    Regex::new(&pattern).map_err(|source| RewriteError::InvalidPattern {
                        pattern: rule.from.clone(),
                        source,
                    })?;

                Ok(CompiledRule {
                    matcher,
                    to: rule.to.clone().into_bytes(),
                    expand: rule.regex,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order and return the new content with the number
    /// of replacements made.
    pub fn apply(&self, content: &[u8]) -> (Vec<u8>, usize) {
        let mut current = content.to_vec();
        let mut count = 0;

        for rule in &self.rules {
            let hits = rule.matcher.find_iter(&current).count();
            if hits == 0 {
                continue;
            }

            current = if rule.expand {
                rule.matcher.replace_all(&current, rule.to.as_slice()).into_owned()
            } else {
                rule.matcher
                    .replace_all(&current, NoExpand(rule.to.as_slice()))
                    .into_owned()
            };
            count += hits;
        }

        (current, count)
    }

    /// Rewrite the file at `path` in place.
    ///
    /// The file is left untouched when no rule matches.
    pub fn rewrite_file(&self, path: &Path) -> Result<usize, RewriteError> {
        let io_error = |e: std::io::Error| RewriteError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let content = fs::read(path).map_err(io_error)?;
        let (rewritten, count) = self.apply(&content);

        if count > 0 {
            fs::write(path, rewritten).map_err(io_error)?;
        }

        tracing::debug!("Rewrote {} links in {}", count, path.display());

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const PREFIX: &str = "https://github.com/cpmech/goga/blob/master";

    fn source_rule() -> RewriteRule {
        RewriteRule::literal("/src/target", PREFIX)
    }

    fn apply_str(rewriter: &Rewriter, text: &str) -> (String, usize) {
        let (out, count) = rewriter.apply(text.as_bytes());
        (String::from_utf8(out).unwrap(), count)
    }

    #[test]
    fn rewrites_every_marker() {
        let rewriter = Rewriter::new(&[source_rule()]).unwrap();
        let html = r#"<a href="/src/target/a.go">a</a> <a href="/src/target/b.go?s=1:2#L3">b</a>"#;

        let (out, count) = apply_str(&rewriter, html);

        assert_eq!(count, 2);
        assert_eq!(
            out,
            format!(
                r#"<a href="{p}/a.go">a</a> <a href="{p}/b.go?s=1:2#L3">b</a>"#,
                p = PREFIX
            )
        );
    }

    #[test]
    fn applying_twice_is_a_no_op() {
        let rewriter = Rewriter::new(&[source_rule()]).unwrap();
        let (once, _) = apply_str(&rewriter, r#"<a href="/src/target/x.go">x.go</a>"#);
        let (twice, count) = apply_str(&rewriter, &once);

        assert_eq!(twice, once);
        assert_eq!(count, 0);
        assert!(!twice.contains("/src/target"));
    }

    #[test]
    fn rules_apply_in_order() {
        let rewriter = Rewriter::new(&[
            RewriteRule::literal("/src/target", "/pkg"),
            RewriteRule::literal("/pkg", "/browse"),
        ])
        .unwrap();

        let (out, count) = apply_str(&rewriter, "/src/target/x.go");

        assert_eq!(out, "/browse/x.go");
        assert_eq!(count, 2);
    }

    #[test]
    fn literal_rules_do_not_expand_dollars() {
        let rewriter = Rewriter::new(&[RewriteRule::literal("a.b", "$1")]).unwrap();
        let (out, _) = apply_str(&rewriter, "a.b axb");

        assert_eq!(out, "$1 axb");
    }

    #[test]
    fn pattern_rules_use_groups() {
        let rewriter = Rewriter::new(&[RewriteRule::pattern(
            r"/src/target/([a-z_]+)\.go",
            "https://example.org/blob/main/$1.go",
        )])
        .unwrap();

        let (out, count) = apply_str(&rewriter, r#"<a href="/src/target/params.go">"#);

        assert_eq!(out, r#"<a href="https://example.org/blob/main/params.go">"#);
        assert_eq!(count, 1);
    }

    #[test]
    fn rejects_bad_rules() {
        assert!(matches!(
            Rewriter::new(&[RewriteRule::literal("", "x")]),
            Err(RewriteError::EmptyPattern)
        ));
        assert!(matches!(
            Rewriter::new(&[RewriteRule::pattern("(unclosed", "x")]),
            Err(RewriteError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn rewrites_file_in_place_idempotently() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("index.html");
        fs::write(&path, "<a href=\"/src/target/x.go\">x.go</a>\n").unwrap();

        let rewriter = Rewriter::new(&[source_rule()]).unwrap();

        assert_eq!(rewriter.rewrite_file(&path).unwrap(), 1);
        let first = fs::read(&path).unwrap();

        assert_eq!(rewriter.rewrite_file(&path).unwrap(), 0);
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            String::from_utf8(second).unwrap(),
            format!("<a href=\"{}/x.go\">x.go</a>\n", PREFIX)
        );
    }

    #[test]
    fn keeps_bytes_that_are_not_utf8() {
        let rewriter = Rewriter::new(&[source_rule()]).unwrap();
        let body = b"<a href=\"/src/target/caf\xe9.go\">caf\xe9</a>";

        let (out, count) = rewriter.apply(body);

        assert_eq!(count, 1);
        let mut expected = format!("<a href=\"{}/caf", PREFIX).into_bytes();
        expected.extend_from_slice(b"\xe9.go\">caf\xe9</a>");
        assert_eq!(out, expected);
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = tempdir().unwrap();
        let rewriter = Rewriter::new(&[source_rule()]).unwrap();

        let err = rewriter
            .rewrite_file(&temp.path().join("absent.html"))
            .unwrap_err();

        assert!(err.to_string().contains("absent.html"));
    }
}
