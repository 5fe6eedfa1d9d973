//! Folio Site Library
//!
//! Turns data-source queries into what the HTTP layer sends back.
//!
//! # Modules
//!
//! - [`post`] - post page view model with SEO fallbacks
//! - [`listing`] - blog index, category listings and standalone pages
//! - [`sitemap`] - XML sitemap assembly
//! - [`error`] - not-found and data-source failures

pub mod error;
pub mod listing;
pub mod post;
pub mod sitemap;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Result, SiteError};
pub use listing::{BlogIndex, CategoryListing, PostSummary, load_page};
pub use post::PostPage;
pub use sitemap::{RouteEntry, SitemapGenerator, SitemapSources};
