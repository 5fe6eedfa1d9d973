//! Markdown rendering using pulldown-cmark.

use std::path::Path;

use folio_core::{Frontmatter, Result, frontmatter::parse_frontmatter};
use pulldown_cmark::{Options, Parser, html};

/// A markdown file split into metadata and rendered body.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Parsed frontmatter metadata.
    pub frontmatter: Frontmatter,

    /// Rendered HTML body.
    pub html: String,

    /// Raw body source (without frontmatter).
    pub raw: String,
}

/// Markdown renderer with the extensions posts are written with.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new renderer with default options.
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self { options }
    }

    /// Parse a markdown file with frontmatter.
    pub fn parse(&self, content: &str, path: &Path) -> Result<RenderedDocument> {
        let (frontmatter, body) = parse_frontmatter(content, path)?;
        let html = self.render(&body);

        Ok(RenderedDocument {
            frontmatter,
            html,
            raw: body,
        })
    }

    /// Render a markdown body (no frontmatter) to HTML.
    pub fn render(&self, body: &str) -> String {
        let parser = Parser::new_ext(body, self.options);
        let mut out = String::with_capacity(body.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}
