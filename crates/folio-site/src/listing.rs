//! View models for `/blog/`, `/{category}/` and standalone pages.

use std::collections::HashMap;

use folio_content::{PostSource, store::summarize_categories};
use folio_core::{Mode, Page, Post};
use serde::Serialize;

use crate::error::{CATEGORY_NOT_FOUND, PAGE_NOT_FOUND, Result, SiteError};

/// A post as it appears in a listing (no body).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub updated: Option<String>,
    pub tags: Vec<String>,
    pub reading_time: u32,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            slug: post.slug,
            title: post.title,
            description: post.description,
            date: post.date,
            updated: post.updated,
            tags: post.tags,
            reading_time: post.reading_time,
        }
    }
}

/// One row of the blog index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub category: String,
    pub lastmod: String,
    pub count: usize,
}

/// `/blog/`: every category with its post count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogIndex {
    pub title: String,
    pub categories: Vec<CategoryEntry>,
}

impl BlogIndex {
    /// Build the index from a single post listing.
    pub fn load(source: &dyn PostSource, title: &str, mode: Mode) -> Result<Self> {
        let posts = source.all_posts(mode)?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for post in &posts {
            *counts.entry(post.category.as_str()).or_default() += 1;
        }

        let categories = summarize_categories(&posts)
            .into_iter()
            .map(|summary| CategoryEntry {
                count: counts.get(summary.category.as_str()).copied().unwrap_or(0),
                category: summary.category,
                lastmod: summary.lastmod,
            })
            .collect();

        Ok(Self {
            title: title.to_string(),
            categories,
        })
    }
}

/// `/{category}/`: the posts filed under one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryListing {
    pub category: String,
    pub count: usize,
    pub posts: Vec<PostSummary>,
}

impl CategoryListing {
    /// Load a category; a category with no visible posts does not exist.
    pub fn load(source: &dyn PostSource, category: &str, mode: Mode) -> Result<Self> {
        let posts = source.category_posts(category, mode)?;
        if posts.is_empty() {
            return Err(SiteError::NotFound(CATEGORY_NOT_FOUND));
        }

        Ok(Self {
            category: category.to_string(),
            count: posts.len(),
            posts: posts.into_iter().map(PostSummary::from).collect(),
        })
    }
}

/// Load a standalone page or fail with not found.
pub fn load_page(source: &dyn PostSource, name: &str) -> Result<Page> {
    source
        .page(name)?
        .ok_or(SiteError::NotFound(PAGE_NOT_FOUND))
}
