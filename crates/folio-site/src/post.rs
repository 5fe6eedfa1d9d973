//! View model for `/{category}/{slug}/`.

use folio_content::PostSource;
use folio_core::{Mode, Post};
use serde::Serialize;
use tracing::debug;

use crate::error::{POST_NOT_FOUND, Result, SiteError};

/// Everything the post page renders, including its SEO fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPage {
    pub post: Post,

    /// Number of posts in the same category.
    pub category_count: usize,

    /// `<title>` text: the SEO title when set, else the post title.
    pub title: String,

    /// Meta description: the post description when set, else the post title.
    pub description: String,
}

impl PostPage {
    /// Look up a post and its category count. Every call is a fresh lookup.
    pub fn load(source: &dyn PostSource, category: &str, slug: &str, mode: Mode) -> Result<Self> {
        let Some(post) = source.single_post(category, slug)? else {
            debug!(category, slug, "post not found");
            return Err(SiteError::NotFound(POST_NOT_FOUND));
        };

        let category_count = source.category_count(category, mode)?;
        Ok(Self::from_post(post, category_count))
    }

    /// Build the view model, applying the SEO fallbacks.
    pub fn from_post(post: Post, category_count: usize) -> Self {
        let title = non_empty(post.seo_title.as_deref())
            .unwrap_or(&post.title)
            .to_string();
        let description = non_empty(post.description.as_deref())
            .unwrap_or(&post.title)
            .to_string();

        Self {
            post,
            category_count,
            title,
            description,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
