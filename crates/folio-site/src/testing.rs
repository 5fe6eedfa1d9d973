//! In-memory `PostSource` for unit tests.

use folio_content::{
    PostSource, Result, StoreError,
    store::{sort_newest_first, summarize_categories},
};
use folio_core::{CategorySummary, Mode, Page, Post};

pub(crate) fn post(category: &str, slug: &str, date: &str) -> Post {
    Post {
        category: category.to_string(),
        slug: slug.to_string(),
        title: format!("{category}/{slug} title"),
        seo_title: None,
        description: None,
        date: date.to_string(),
        updated: None,
        draft: false,
        tags: Vec::new(),
        html: format!("<p>{slug}</p>\n"),
        reading_time: 1,
    }
}

#[derive(Debug, Default)]
pub(crate) struct MemorySource {
    pub posts: Vec<Post>,
    pub pages: Vec<Page>,
    /// Returned verbatim by `all_categories` when set.
    pub categories: Option<Vec<CategorySummary>>,
    pub fail: bool,
}

impl MemorySource {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(StoreError::Source("memory source offline".to_string()));
        }
        Ok(())
    }

    fn visible(&self, mode: Mode) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| mode.shows_drafts() || !p.draft)
            .cloned()
            .collect();
        sort_newest_first(&mut posts);
        posts
    }
}

impl PostSource for MemorySource {
    fn single_post(&self, category: &str, slug: &str) -> Result<Option<Post>> {
        self.check()?;
        Ok(self
            .posts
            .iter()
            .find(|p| p.category == category && p.slug == slug)
            .cloned())
    }

    fn category_count(&self, category: &str, mode: Mode) -> Result<usize> {
        Ok(self.category_posts(category, mode)?.len())
    }

    fn all_categories(&self, mode: Mode) -> Result<Vec<CategorySummary>> {
        self.check()?;
        match &self.categories {
            Some(categories) => Ok(categories.clone()),
            None => Ok(summarize_categories(&self.visible(mode))),
        }
    }

    fn all_posts(&self, mode: Mode) -> Result<Vec<Post>> {
        self.check()?;
        Ok(self.visible(mode))
    }

    fn category_posts(&self, category: &str, mode: Mode) -> Result<Vec<Post>> {
        self.check()?;
        Ok(self
            .visible(mode)
            .into_iter()
            .filter(|p| p.category == category)
            .collect())
    }

    fn page(&self, name: &str) -> Result<Option<Page>> {
        self.check()?;
        Ok(self.pages.iter().find(|p| p.name == name).cloned())
    }
}
