//! Template engine for the page shell around the extracted documentation.

use minijinja::{context, Environment};

/// Values substituted into the page shell.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TemplateContext {
    /// Page title, placed in `<title>` only
    pub title: String,
    /// Stylesheet URL referenced from the head
    pub stylesheet: String,
    /// Client script URL referenced from the head
    pub script: String,
    /// License text shown in the footer
    pub license: String,
}

/// Template engine using minijinja.
///
/// The header and footer are a matched pair: every element the header leaves
/// open is closed by the footer, innermost first.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in shell templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);

        env.add_template("header.html", HEADER_TEMPLATE)
            .expect("Failed to add header template");

        env.add_template("footer.html", FOOTER_TEMPLATE)
            .expect("Failed to add footer template");

        Self { env }
    }

    /// Render the page prologue, up to and including the inner wrapper `<div>`.
    ///
    /// The title is trusted and inserted without escaping.
    pub fn render_header(&self, context: &TemplateContext) -> Result<String, minijinja::Error> {
        self.env.get_template("header.html")?.render(context! {
            title => &context.title,
            stylesheet => &context.stylesheet,
            script => &context.script,
        })
    }

    /// Render the page epilogue with the license in a `<pre>` block.
    pub fn render_footer(&self, context: &TemplateContext) -> Result<String, minijinja::Error> {
        self.env.get_template("footer.html")?.render(context! {
            license => &context.license,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const HEADER_TEMPLATE: &str = r##"<html>
<head>
<meta http-equiv="Content-Type" content="text/html; charset=utf-8">
<title>{{ title | safe }}</title>
<link type="text/css" rel="stylesheet" href="{{ stylesheet | safe }}">
<script type="text/javascript" src="{{ script | safe }}"></script>
<style type="text/css"></style>
</head>
<body>
<div id="page" class="wide">
<div class="container">
"##;

const FOOTER_TEMPLATE: &str = r##"
<div id="footer">
<br /><br />
<hr>
<pre class="copyright">
{{ license | safe }}</pre><!-- copyright -->
</div><!-- footer -->

</div><!-- container -->
</div><!-- page -->
</body>
</html>
"##;
