//! Frontmatter parsing for content files.

use std::path::Path;

use serde::Deserialize;

use crate::error::{CoreError, Result};

/// Frontmatter metadata for posts and pages.
///
/// Timestamps are kept as written; the store normalises them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Frontmatter {
    /// Page title (required).
    #[serde(default)]
    pub title: String,

    /// Title override for search engines.
    #[serde(default, alias = "seoTitle")]
    pub seo_title: Option<String>,

    /// Description for meta tags and summaries.
    #[serde(default)]
    pub description: Option<String>,

    /// Publication date.
    #[serde(default)]
    pub date: Option<String>,

    /// Last updated date.
    #[serde(default)]
    pub updated: Option<String>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Tags for the post.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();

    let after_first = &content[delimiter.len()..];
    let closing_pos = after_first.find(delimiter)?;

    let frontmatter = after_first[..closing_pos].trim();
    let body = after_first[closing_pos + delimiter.len()..].trim_start();

    Some((format, frontmatter, body))
}

/// Parse frontmatter from a string, returning it with the remaining body.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok((Frontmatter::default(), content.to_string()));
    };

    let frontmatter = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => parse_toml(fm_str, path)?,
    };

    Ok((frontmatter, body.to_string()))
}

/// TOML datetimes are typed values; turn top-level ones into strings first.
fn parse_toml(fm_str: &str, path: &Path) -> Result<Frontmatter> {
    let mut table: toml::Table =
        toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    for (_, value) in table.iter_mut() {
        if let toml::Value::Datetime(dt) = value {
            *value = toml::Value::String(dt.to_string());
        }
    }

    toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| CoreError::frontmatter(path, e.to_string()))
}

impl Frontmatter {
    /// Validate fields every page needs.
    pub fn validate(&self, path: &Path) -> Result<()> {
        if self.title.is_empty() {
            return Err(CoreError::frontmatter(path, "title is required"));
        }
        Ok(())
    }

    /// Validate fields a post needs on top of a page.
    pub fn validate_post(&self, path: &Path) -> Result<()> {
        self.validate(path)?;
        if self.date.as_deref().is_none_or(str::is_empty) {
            return Err(CoreError::frontmatter(path, "date is required"));
        }
        Ok(())
    }
}
