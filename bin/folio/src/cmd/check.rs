//! Check command - validate configuration and content

use std::{collections::HashSet, path::Path};

use color_eyre::eyre::{Result, bail};
use folio_content::ContentStore;
use folio_core::Config;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Parses every post and page so broken frontmatter shows up before a
/// request trips over it.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e}");
            bail!("Configuration error: {e}");
        }
    };

    if config.base_url().is_none() {
        result.add_warning("site.base_url is not set; sitemap origin will come from the Host header");
    }

    let content_dir = config.content.dir.as_path();
    if content_dir.is_dir() {
        println!("\nChecking content files...");
        validate_content(&config, &mut result)?;
        check_layout(content_dir, &mut result);
    } else {
        result.add_warning(format!(
            "Content directory {} does not exist",
            content_dir.display()
        ));
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Parse every post and page under the content root.
fn validate_content(config: &Config, result: &mut ValidationResult) -> Result<()> {
    let store = ContentStore::new(&config.content.dir);
    let mut checked = 0;
    let mut failed = 0;
    let mut drafts = 0;
    let mut categories = HashSet::new();

    for path in store.post_files(None)? {
        checked += 1;
        match store.load_post(&path) {
            Ok(post) => {
                if post.draft {
                    drafts += 1;
                }
                categories.insert(post.category);
            }
            Err(e) => {
                failed += 1;
                result.add_error(format!("{}: {e}", path.display()));
            }
        }
    }

    let mut has_now_page = false;
    for path in store.page_files()? {
        checked += 1;
        match store.load_page(&path) {
            Ok(page) => {
                if page.name == config.content.now_page {
                    has_now_page = true;
                    if page.updated.is_none() {
                        result.add_warning(format!(
                            "{} has no `updated` date; the sitemap will omit its lastmod",
                            path.display()
                        ));
                    }
                }
            }
            Err(e) => {
                failed += 1;
                result.add_error(format!("{}: {e}", path.display()));
            }
        }
    }

    if !has_now_page {
        result.add_warning(format!(
            "Missing {}.md; /{}/ will return 404",
            config.content.now_page, config.content.now_page
        ));
    }

    println!(
        "  ✓ Checked {checked} files in {} categories ({drafts} drafts)",
        categories.len()
    );
    if failed > 0 {
        println!("  ✗ {failed} files failed to parse");
    }

    Ok(())
}

/// Warn about Markdown files the store will never pick up.
fn check_layout(dir: &Path, result: &mut ValidationResult) {
    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| e.ok())
        .filter(|e| e.depth() > 2 && e.file_type().is_file())
    {
        if entry.path().extension().is_some_and(|ext| ext == "md") {
            result.add_warning(format!(
                "{} is nested too deeply and will be ignored",
                entry.path().display()
            ));
        }
    }
}
