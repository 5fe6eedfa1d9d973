//! Folio Core Library
//!
//! Core types, configuration, and error handling for the Folio blog server.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;

pub use config::Config;
pub use content::{CategorySummary, Mode, Page, Post, normalize_timestamp};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
