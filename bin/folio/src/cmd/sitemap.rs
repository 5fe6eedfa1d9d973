//! Sitemap command - write sitemap.xml without running the server

use std::{fs, io::Write, path::Path};

use color_eyre::eyre::{Result, WrapErr, eyre};
use folio_content::ContentStore;
use folio_core::{Config, Mode};
use folio_site::{SitemapGenerator, SitemapSources};

/// Run the sitemap command.
///
/// The origin comes from `--origin`, falling back to `site.base_url`.
pub fn run(config_path: &Path, origin: Option<&str>, dev: bool, output: Option<&Path>) -> Result<()> {
    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;

    let origin = origin
        .or_else(|| config.base_url())
        .ok_or_else(|| eyre!("No origin: pass --origin or set site.base_url"))?;
    let mode = if dev { Mode::Development } else { config.mode() };

    tracing::info!(origin, ?mode, "Generating sitemap");

    let store = ContentStore::new(&config.content.dir);
    let sources = SitemapSources::fetch(&store, &config.content.now_page, mode)
        .wrap_err("Failed to read content")?;
    let xml = SitemapGenerator::new(origin).generate(&sources);

    match output {
        Some(path) => {
            fs::write(path, &xml).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            println!("  ✓ Wrote {} ({} posts)", path.display(), sources.posts.len());
        }
        None => {
            std::io::stdout()
                .write_all(xml.as_bytes())
                .wrap_err("Failed to write sitemap")?;
        }
    }

    Ok(())
}
