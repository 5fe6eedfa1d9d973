//! Folio Content Library
//!
//! Data access for the blog: the [`PostSource`] trait the site handlers query,
//! and [`ContentStore`], its implementation over a directory of markdown files.
//!
//! # Layout
//!
//! ```text
//! content/
//! ├── now.md              standalone page "now"
//! ├── tech/
//! │   ├── hello-rust.md   post tech/hello-rust
//! │   └── async.md
//! └── life/
//!     └── moving.md
//! ```

pub mod markdown;
pub mod store;

use std::path::PathBuf;

use folio_core::{CategorySummary, CoreError, Mode, Page, Post};
use thiserror::Error;

pub use markdown::MarkdownRenderer;
pub use store::ContentStore;

/// Content store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Frontmatter, timestamp or other core error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A content file whose name cannot be used as a slug.
    #[error("invalid content path: {0}")]
    InvalidPath(PathBuf),

    /// Failure reported by a non-file source.
    #[error("source error: {0}")]
    Source(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Read-only queries the site handlers make.
///
/// Every call is a fresh lookup; implementations must not assume callers cache.
pub trait PostSource: Send + Sync {
    /// The post at `category/slug`, regardless of mode.
    fn single_post(&self, category: &str, slug: &str) -> Result<Option<Post>>;

    /// Number of posts visible in `category`.
    fn category_count(&self, category: &str, mode: Mode) -> Result<usize>;

    /// One summary per category with visible posts, sorted by name.
    fn all_categories(&self, mode: Mode) -> Result<Vec<CategorySummary>>;

    /// All visible posts, newest first.
    fn all_posts(&self, mode: Mode) -> Result<Vec<Post>>;

    /// Visible posts in one category, newest first.
    fn category_posts(&self, category: &str, mode: Mode) -> Result<Vec<Post>>;

    /// A standalone page such as `now`.
    fn page(&self, name: &str) -> Result<Option<Page>>;
}
