//! Sitemap generation.
//!
//! Builds `/sitemap.xml` from three inputs: the `now` page's last update, the
//! category summaries and the post list. Timestamps are compared as strings,
//! so they must share one ISO-8601 precision (the content store guarantees
//! this by normalising them).

use folio_content::PostSource;
use folio_core::{CategorySummary, Mode, Post};
use tracing::debug;

use crate::error::Result;

/// Namespace of the `<urlset>` root element.
pub const SITEMAP_NAMESPACE: &str = "https://www.sitemaps.org/schemas/sitemap/0.9";

/// Content type of the sitemap response.
pub const CONTENT_TYPE: &str = "application/xml";

/// Cache policy of the sitemap response: browsers revalidate, shared caches keep it an hour.
pub const CACHE_CONTROL: &str = "max-age=0, s-maxage=3600";

/// Slug of the standalone "now" page.
pub const NOW_SLUG: &str = "now";

/// Slug of the blog index.
pub const BLOG_SLUG: &str = "blog";

/// A sitemap route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Path segment(s) without surrounding slashes; empty for the root.
    pub slug: String,

    /// ISO-8601 last modification; empty counts as absent.
    pub lastmod: Option<String>,
}

impl RouteEntry {
    /// Create a route entry.
    pub fn new(slug: impl Into<String>, lastmod: Option<String>) -> Self {
        Self {
            slug: slug.into(),
            lastmod,
        }
    }

    /// Date portion of `lastmod` (everything before the first `T`).
    pub fn lastmod_date(&self) -> Option<&str> {
        self.lastmod
            .as_deref()
            .filter(|lastmod| !lastmod.is_empty())
            .and_then(|lastmod| lastmod.split('T').next())
    }
}

/// Everything the sitemap is built from.
#[derive(Debug, Clone, Default)]
pub struct SitemapSources {
    /// `updated` of the now page, if it has one.
    pub now_lastmod: Option<String>,

    pub categories: Vec<CategorySummary>,

    pub posts: Vec<Post>,
}

impl SitemapSources {
    /// Fetch the three inputs one after another.
    pub fn fetch(source: &dyn PostSource, now_page: &str, mode: Mode) -> Result<Self> {
        let now_lastmod = source.page(now_page)?.and_then(|page| page.updated);
        let categories = source.all_categories(mode)?;
        let posts = source.all_posts(mode)?;

        Ok(Self {
            now_lastmod,
            categories,
            posts,
        })
    }

    /// Hardcoded routes, then categories, then posts.
    pub fn routes(&self) -> Vec<RouteEntry> {
        let hardcoded = [
            RouteEntry::new("", None),
            RouteEntry::new(NOW_SLUG, self.now_lastmod.clone()),
            RouteEntry::new(BLOG_SLUG, Some(latest_lastmod(&self.categories))),
        ];

        let categories = self
            .categories
            .iter()
            .map(|c| RouteEntry::new(c.category.clone(), Some(c.lastmod.clone())));

        let posts = self
            .posts
            .iter()
            .map(|p| RouteEntry::new(p.path(), Some(p.lastmod().to_string())));

        hardcoded.into_iter().chain(categories).chain(posts).collect()
    }
}

/// Greatest category `lastmod` by plain string comparison; empty when there
/// are no categories. Ties keep the first one seen.
pub fn latest_lastmod(categories: &[CategorySummary]) -> String {
    categories
        .iter()
        .fold("", |acc, c| {
            if c.lastmod.as_str() > acc {
                c.lastmod.as_str()
            } else {
                acc
            }
        })
        .to_string()
}

/// Sitemap generator for one origin.
#[derive(Debug, Clone)]
pub struct SitemapGenerator {
    origin: String,
}

impl SitemapGenerator {
    /// Create a generator; a trailing slash on `origin` is dropped.
    #[must_use]
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    /// Origin that every `<loc>` starts with.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Generate the sitemap document.
    pub fn generate(&self, sources: &SitemapSources) -> String {
        self.render(&sources.routes())
    }

    /// Render route entries into a sitemap document.
    pub fn render(&self, routes: &[RouteEntry]) -> String {
        debug!(count = routes.len(), origin = %self.origin, "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8" ?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NAMESPACE}">"#));
        xml.push('\n');

        for route in routes {
            xml.push_str("  ");
            xml.push_str(&self.url_to_xml(route));
            xml.push('\n');
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// `<loc>` value for a slug: origin, slash, slug, slash.
    pub fn loc(&self, slug: &str) -> String {
        let slug = slug.trim_matches('/');
        if slug.is_empty() {
            format!("{}/", self.origin)
        } else {
            format!("{}/{slug}/", self.origin)
        }
    }

    fn url_to_xml(&self, route: &RouteEntry) -> String {
        let mut xml = format!("<url><loc>{}</loc>", escape_xml(&self.loc(&route.slug)));
        if let Some(date) = route.lastmod_date() {
            xml.push_str(&format!("<lastmod>{}</lastmod>", escape_xml(date)));
        }
        xml.push_str("</url>");
        xml
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
