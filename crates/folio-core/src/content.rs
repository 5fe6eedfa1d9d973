//! Content types shared by the store and the site handlers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{CoreError, Result};

/// Which content a query may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Drafts are visible.
    Development,
    /// Drafts are hidden.
    Production,
}

impl Mode {
    /// Whether drafts are part of query results in this mode.
    pub fn shows_drafts(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// A blog post, as handed out by the data-access layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// Category the post is filed under (first path segment).
    pub category: String,

    /// URL slug, unique within the category.
    pub slug: String,

    /// Display title.
    pub title: String,

    /// Title override for search engines.
    pub seo_title: Option<String>,

    /// Summary for meta tags and listings.
    pub description: Option<String>,

    /// Creation timestamp (normalised RFC 3339).
    pub date: String,

    /// Last-modified timestamp (normalised RFC 3339).
    pub updated: Option<String>,

    pub draft: bool,

    pub tags: Vec<String>,

    /// Rendered HTML body.
    pub html: String,

    /// Reading time in minutes.
    pub reading_time: u32,
}

impl Post {
    /// Most recent modification: `updated` when present, otherwise `date`.
    pub fn lastmod(&self) -> &str {
        self.updated
            .as_deref()
            .filter(|updated| !updated.is_empty())
            .unwrap_or(&self.date)
    }

    /// Path of the post relative to the site root, without slashes around it.
    pub fn path(&self) -> String {
        format!("{}/{}", self.category, self.slug)
    }
}

/// Per-category summary used by listings and the sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// Category name.
    pub category: String,

    /// Most recent post timestamp within the category.
    pub lastmod: String,
}

/// A standalone markdown page such as `now`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// File stem the page was loaded from.
    pub name: String,

    pub title: String,

    /// Last-modified timestamp (normalised RFC 3339).
    pub updated: Option<String>,

    /// Rendered HTML body.
    pub html: String,
}

/// Normalise an ISO-8601 timestamp to RFC 3339 UTC with millisecond precision.
///
/// Strings produced here compare lexicographically in time order. Accepts
/// RFC 3339 with any offset, a naive `YYYY-MM-DDTHH:MM:SS` (read as UTC) and a
/// bare `YYYY-MM-DD` (midnight UTC).
pub fn normalize_timestamp(value: &str) -> Result<String> {
    let value = value.trim();

    let parsed = if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        dt.with_timezone(&Utc)
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        naive.and_utc()
    } else if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0)
            .ok_or_else(|| CoreError::timestamp(value))?
            .and_utc()
    } else {
        return Err(CoreError::timestamp(value));
    };

    Ok(parsed.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Estimated reading time in minutes at 200 words per minute, at least one.
pub fn reading_time(text: &str) -> u32 {
    let words = text.split_whitespace().count() as u32;
    (words / 200).max(1)
}
