//! Errors raised while building a page.

use folio_content::StoreError;
use thiserror::Error;

/// Diagnostic returned when `/{category}/{slug}/` has no post.
pub const POST_NOT_FOUND: &str = "post not found";

/// Diagnostic returned when a category has no visible posts.
pub const CATEGORY_NOT_FOUND: &str = "category not found";

/// Diagnostic returned when a standalone page is missing.
pub const PAGE_NOT_FOUND: &str = "page not found";

/// Site errors.
#[derive(Debug, Error)]
pub enum SiteError {
    /// The requested resource does not exist.
    #[error("{0}")]
    NotFound(&'static str),

    /// The data source failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for site operations.
pub type Result<T> = std::result::Result<T, SiteError>;

impl SiteError {
    /// Whether this error means "no such resource".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = SiteError::NotFound(POST_NOT_FOUND);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "post not found");
    }

    #[test]
    fn test_store_error_is_not_not_found() {
        let err: SiteError = StoreError::Source("backend down".to_string()).into();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("backend down"));
    }
}
