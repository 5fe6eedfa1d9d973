//! File-backed content store.
//!
//! Re-reads the content directory on every query.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use folio_core::{
    CategorySummary, Mode, Page, Post, content::reading_time, normalize_timestamp,
};
use rayon::prelude::*;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::{MarkdownRenderer, PostSource, Result, StoreError};

const EXTENSION: &str = "md";

/// Markdown content store rooted at a directory.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    renderer: MarkdownRenderer,
}

impl ContentStore {
    /// Create a store over `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Content root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every post file, or only those of one category.
    pub fn post_files(&self, category: Option<&str>) -> Result<Vec<PathBuf>> {
        let (dir, depth) = match category {
            Some(category) => (self.root.join(category), 1),
            None => (self.root.clone(), 2),
        };

        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        // filter_entry never sees entries above min_depth, so depth is checked per entry.
        let walker = WalkDir::new(&dir)
            .max_depth(depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry));

        for entry in walker {
            let entry = entry?;
            if entry.depth() == depth
                && entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == EXTENSION)
            {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Every standalone page file directly under the root.
    pub fn page_files(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let hidden = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with('.'));
            if !hidden && path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Parse one post file. Category and slug come from its location.
    pub fn load_post(&self, path: &Path) -> Result<Post> {
        let slug = file_stem(path)?;
        let category = path
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .ok_or_else(|| StoreError::InvalidPath(path.to_path_buf()))?
            .to_string();

        let source = fs::read_to_string(path)?;
        let doc = self.renderer.parse(&source, path)?;
        let fm = doc.frontmatter;
        fm.validate_post(path)?;

        let date = normalize_timestamp(fm.date.as_deref().unwrap_or_default())?;
        let updated = fm
            .updated
            .as_deref()
            .filter(|updated| !updated.is_empty())
            .map(normalize_timestamp)
            .transpose()?;

        Ok(Post {
            category,
            slug,
            title: fm.title,
            seo_title: fm.seo_title,
            description: fm.description,
            date,
            updated,
            draft: fm.draft,
            tags: fm.tags,
            html: doc.html,
            reading_time: reading_time(&doc.raw),
        })
    }

    /// Parse one standalone page file.
    pub fn load_page(&self, path: &Path) -> Result<Page> {
        let name = file_stem(path)?;
        let source = fs::read_to_string(path)?;
        let doc = self.renderer.parse(&source, path)?;
        doc.frontmatter.validate(path)?;

        let updated = doc
            .frontmatter
            .updated
            .as_deref()
            .filter(|updated| !updated.is_empty())
            .map(normalize_timestamp)
            .transpose()?;

        Ok(Page {
            name,
            title: doc.frontmatter.title,
            updated,
            html: doc.html,
        })
    }

    /// Load and filter posts in parallel; any unreadable file fails the call.
    fn load_posts(&self, category: Option<&str>, mode: Mode) -> Result<Vec<Post>> {
        let files = self.post_files(category)?;
        debug!(count = files.len(), ?category, "loading posts");

        let posts: Vec<Post> = files
            .par_iter()
            .map(|path| self.load_post(path))
            .collect::<Result<Vec<_>>>()?;

        let mut visible: Vec<Post> = posts
            .into_iter()
            .filter(|post| mode.shows_drafts() || !post.draft)
            .collect();
        sort_newest_first(&mut visible);
        Ok(visible)
    }
}

impl PostSource for ContentStore {
    fn single_post(&self, category: &str, slug: &str) -> Result<Option<Post>> {
        if !is_safe_segment(category) || !is_safe_segment(slug) {
            return Ok(None);
        }

        let path = self
            .root
            .join(category)
            .join(format!("{slug}.{EXTENSION}"));
        if !path.is_file() {
            return Ok(None);
        }

        self.load_post(&path).map(Some)
    }

    fn category_count(&self, category: &str, mode: Mode) -> Result<usize> {
        Ok(self.category_posts(category, mode)?.len())
    }

    fn all_categories(&self, mode: Mode) -> Result<Vec<CategorySummary>> {
        let posts = self.load_posts(None, mode)?;
        Ok(summarize_categories(&posts))
    }

    fn all_posts(&self, mode: Mode) -> Result<Vec<Post>> {
        self.load_posts(None, mode)
    }

    fn category_posts(&self, category: &str, mode: Mode) -> Result<Vec<Post>> {
        if !is_safe_segment(category) {
            return Ok(Vec::new());
        }
        self.load_posts(Some(category), mode)
    }

    fn page(&self, name: &str) -> Result<Option<Page>> {
        if !is_safe_segment(name) {
            return Ok(None);
        }

        let path = self.root.join(format!("{name}.{EXTENSION}"));
        if !path.is_file() {
            return Ok(None);
        }

        self.load_page(&path).map(Some)
    }
}

/// One summary per category, sorted by name, with the greatest post lastmod.
pub fn summarize_categories(posts: &[Post]) -> Vec<CategorySummary> {
    let mut latest: BTreeMap<&str, &str> = BTreeMap::new();
    for post in posts {
        let lastmod = post.lastmod();
        latest
            .entry(post.category.as_str())
            .and_modify(|current| {
                if lastmod > *current {
                    *current = lastmod;
                }
            })
            .or_insert(lastmod);
    }

    latest
        .into_iter()
        .map(|(category, lastmod)| CategorySummary {
            category: category.to_string(),
            lastmod: lastmod.to_string(),
        })
        .collect()
}

/// Newest `date` first; ties by category, then slug.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| match b.date.cmp(&a.date) {
        Ordering::Equal => (&a.category, &a.slug).cmp(&(&b.category, &b.slug)),
        other => other,
    });
}

/// Whether a request path segment may be joined onto the content root.
fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.starts_with('.') && !segment.contains(['/', '\\'])
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| StoreError::InvalidPath(path.to_path_buf()))
}
