//! Asset pipeline for the documentation theme.
//!
//! Every build writes the built-in stylesheet and page script, copies the
//! theme's own `assets/` tree over them, then adds the runtime scripts
//! supplied by a [`RuntimeScriptProvider`]. Files are overwritten, never
//! deleted, so stale assets from older builds stay in place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::builder::BuildError;

pub const STYLESHEET: &str = "style.css";
pub const SITE_SCRIPT: &str = "site.js";

/// A script file the rendered pages need at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeScript {
    /// Name inside `<output>/assets/`
    pub file_name: String,
    /// Where to copy it from
    pub source: PathBuf,
}

/// Supplies scripts that live outside the theme, typically in an installed
/// package.
pub trait RuntimeScriptProvider: Send + Sync {
    /// List the scripts to copy. Every listed source must exist.
    fn fetch_runtime_scripts(&self) -> Result<Vec<RuntimeScript>, BuildError>;
}

/// Runtime scripts taken from a package directory, e.g. `node_modules/rctf`.
#[derive(Debug, Clone)]
pub struct PackageScripts {
    package_dir: PathBuf,
    files: Vec<PathBuf>,
}

impl PackageScripts {
    pub fn new(package_dir: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            package_dir: package_dir.into(),
            files,
        }
    }
}

impl RuntimeScriptProvider for PackageScripts {
    fn fetch_runtime_scripts(&self) -> Result<Vec<RuntimeScript>, BuildError> {
        self.files
            .iter()
            .map(|file| {
                let source = self.package_dir.join(file);
                let file_name = file
                    .file_name()
                    .and_then(|f| f.to_str())
                    .ok_or_else(|| BuildError::MissingFile(source.display().to_string()))?;

                Ok(RuntimeScript {
                    file_name: file_name.to_string(),
                    source,
                })
            })
            .collect()
    }
}

/// Writes and copies everything under `<output>/assets/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetPipeline {
    minify: bool,
}

impl AssetPipeline {
    pub fn new(minify: bool) -> Self {
        Self { minify }
    }

    /// The built-in stylesheet, minified when enabled.
    pub fn generate_css(&self) -> String {
        if !self.minify {
            return DEFAULT_CSS.to_string();
        }

        match Self::minify_css(DEFAULT_CSS) {
            Ok(css) => css,
            Err(e) => {
                tracing::warn!("{}, keeping unminified stylesheet", e);
                DEFAULT_CSS.to_string()
            }
        }
    }

    /// The built-in page script.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    /// Populate `assets_dir`. Returns the number of files written.
    pub async fn install(
        &self,
        assets_dir: &Path,
        theme_dir: Option<&Path>,
        scripts: Option<&dyn RuntimeScriptProvider>,
    ) -> Result<usize, BuildError> {
        tokio::fs::create_dir_all(assets_dir)
            .await
            .map_err(|e| BuildError::WriteError(format!("{}: {}", assets_dir.display(), e)))?;

        let mut count = 0;

        write_asset(&assets_dir.join(STYLESHEET), &self.generate_css()).await?;
        write_asset(&assets_dir.join(SITE_SCRIPT), DEFAULT_JS).await?;
        count += 2;

        if let Some(theme_dir) = theme_dir {
            let theme_assets = theme_dir.join("assets");
            if theme_assets.is_dir() {
                let copied = copy_dir(&theme_assets, assets_dir).await?;
                tracing::info!("Copied {} theme assets from {}", copied, theme_assets.display());
                count += copied;
            } else {
                tracing::debug!("Theme has no assets directory at {}", theme_assets.display());
            }
        }

        if let Some(provider) = scripts {
            for script in provider.fetch_runtime_scripts()? {
                let dest = assets_dir.join(&script.file_name);
                tokio::fs::copy(&script.source, &dest).await.map_err(|e| {
                    if e.kind() == ErrorKind::NotFound {
                        BuildError::MissingFile(script.source.display().to_string())
                    } else {
                        BuildError::WriteError(format!("{}: {}", dest.display(), e))
                    }
                })?;
                tracing::debug!("Copied runtime script {}", script.source.display());
                count += 1;
            }
        }

        Ok(count)
    }
}

/// Recursively copy `src` into `dest`, overwriting files with the same
/// relative path. Returns the number of files copied.
pub async fn copy_dir(src: &Path, dest: &Path) -> Result<usize, BuildError> {
    let mut count = 0;

    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.map_err(|e| BuildError::ReadError(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| BuildError::ReadError(e.to_string()))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            tokio::fs::create_dir_all(&target)
                .await
                .map_err(|e| BuildError::WriteError(format!("{}: {}", target.display(), e)))?;
        } else {
            tokio::fs::copy(entry.path(), &target)
                .await
                .map_err(|e| BuildError::WriteError(format!("{}: {}", target.display(), e)))?;
            tracing::debug!("Copied {}", relative.display());
            count += 1;
        }
    }

    Ok(count)
}

async fn write_asset(path: &Path, contents: &str) -> Result<(), BuildError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

const DEFAULT_CSS: &str = r#"/* docket API reference theme */

:root {
  --sidebar-width: 280px;
  --content-max-width: 900px;
  --background: #ffffff;
  --foreground: #1f2328;
  --muted: #f6f8fa;
  --muted-foreground: #59636e;
  --border: #d1d9e0;
  --primary: #0969da;
  --primary-foreground: #ffffff;
  --code-background: #f6f8fa;
  --radius: 0.375rem;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

/* Sidebar */
.sidebar {
  background: var(--muted);
  border-right: 1px solid var(--border);
  padding: 1.5rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
}

.nav-header {
  margin-bottom: 1.5rem;
}

.nav-logo {
  font-weight: 700;
  font-size: 1.25rem;
  color: var(--foreground);
  text-decoration: none;
}

.version-switcher {
  margin-top: 0.5rem;
  font-size: 0.875rem;
}

.version-list {
  list-style: none;
  margin-top: 0.25rem;
}

.version-list a {
  color: var(--muted-foreground);
}

.nav-list {
  list-style: none;
}

.nav-item a {
  display: block;
  padding: 0.25rem 0.75rem;
  color: var(--muted-foreground);
  text-decoration: none;
  border-radius: var(--radius);
}

.nav-item a:hover,
.nav-item.active > a {
  background: var(--primary);
  color: var(--primary-foreground);
}

.nav-note a {
  font-weight: 600;
  color: var(--foreground);
}

/* Sections */
.main {
  padding: 2rem;
  max-width: calc(var(--content-max-width) + 4rem);
}

.section {
  margin-bottom: 2.5rem;
}

.section.nested {
  margin: 1rem 0 1rem 1rem;
}

.section h2,
.section h3 {
  font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
  margin-bottom: 0.75rem;
}

.section h2 {
  padding-bottom: 0.5rem;
  border-bottom: 1px solid var(--border);
}

.section p {
  margin-bottom: 1rem;
}

.note h2 {
  font-size: 1.75rem;
  margin: 2rem 0 1rem;
}

.deprecated {
  color: #cf222e;
  font-weight: 600;
}

.since,
.extends {
  color: var(--muted-foreground);
  font-size: 0.875rem;
}

details.member {
  border-top: 1px solid var(--border);
  padding: 0.5rem 0;
}

details.member > summary {
  cursor: pointer;
}

/* Parameter and property tables */
table.params {
  width: 100%;
  border-collapse: collapse;
  margin-bottom: 1rem;
}

table.params th,
table.params td {
  text-align: left;
  padding: 0.5rem 0.75rem;
  border-bottom: 1px solid var(--border);
  vertical-align: top;
}

table.params tr.property td:first-child {
  padding-left: 1.5rem;
}

/* Code */
code {
  font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
  font-size: 0.875em;
  background: var(--code-background);
  padding: 0.125rem 0.25rem;
  border-radius: var(--radius);
}

pre.highlight {
  background: var(--code-background);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  overflow-x: auto;
  margin-bottom: 1rem;
}

pre.highlight code {
  background: none;
  padding: 0;
}

.highlight .comment { color: #59636e; font-style: italic; }
.highlight .keyword,
.highlight .storage { color: #cf222e; }
.highlight .string { color: #0a3069; }
.highlight .constant { color: #0550ae; }
.highlight .entity.name { color: #8250df; }
.highlight .variable.parameter { color: #953800; }
"#;

const DEFAULT_JS: &str = r#"// docket page script
(function() {
  // Version switcher, populated by rctf_versions.js
  var list = document.getElementById('versions');
  if (list && typeof window.versions === 'string' && window.versions.length > 0) {
    list.innerHTML = window.versions;
  }

  // Open the collapsed member a link points at
  function openTarget() {
    var id = decodeURIComponent(window.location.hash.slice(1));
    if (!id) return;
    var target = document.getElementById(id);
    var details = target && target.closest('details');
    if (details) details.open = true;
  }

  window.addEventListener('hashchange', openTarget);
  openTarget();

  // Highlight the nav entry for the section in view
  var links = document.querySelectorAll('.nav-item a');
  document.addEventListener('scroll', function() {
    var current = null;
    links.forEach(function(link) {
      var section = document.getElementById(link.getAttribute('href').slice(1));
      if (section && section.getBoundingClientRect().top < 120) current = link;
    });
    links.forEach(function(link) {
      link.parentElement.classList.toggle('active', link === current);
    });
  }, { passive: true });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::new(false).generate_css();
        assert!(css.contains(":root"));
        assert!(css.contains(".version-list"));
        assert!(css.contains("pre.highlight"));
    }

    #[test]
    fn generates_js() {
        let js = AssetPipeline::generate_js();
        assert!(js.contains("window.versions"));
        assert!(js.contains("getElementById('versions')"));
    }

    #[test]
    fn minifies_css() {
        let css = r#"
.button {
    background-color: blue;
    padding: 10px;
}
        "#;

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".button"));
    }

    #[tokio::test]
    async fn theme_assets_overwrite_without_deleting() {
        let temp = tempdir().unwrap();
        let theme = temp.path().join("theme");
        fs::create_dir_all(theme.join("assets").join("img")).unwrap();
        fs::write(theme.join("assets").join("style.css"), "body{}").unwrap();
        fs::write(theme.join("assets").join("img").join("logo.svg"), "<svg/>").unwrap();

        let assets = temp.path().join("dist").join("assets");
        fs::create_dir_all(&assets).unwrap();
        fs::write(assets.join("stale.js"), "old").unwrap();

        let count = AssetPipeline::new(true)
            .install(&assets, Some(&theme), None)
            .await
            .unwrap();

        assert_eq!(count, 4);
        assert_eq!(fs::read_to_string(assets.join("style.css")).unwrap(), "body{}");
        assert!(assets.join("img").join("logo.svg").exists());
        assert!(assets.join("site.js").exists());
        assert_eq!(fs::read_to_string(assets.join("stale.js")).unwrap(), "old");
    }

    #[tokio::test]
    async fn copies_package_runtime_scripts() {
        let temp = tempdir().unwrap();
        let package = temp.path().join("node_modules").join("rctf");
        let support = package.join("step_definitions").join("support");
        fs::create_dir_all(&support).unwrap();
        fs::write(support.join("mappings.js"), "var mappings = {}").unwrap();

        let provider = PackageScripts::new(
            &package,
            vec![PathBuf::from("step_definitions/support/mappings.js")],
        );
        let assets = temp.path().join("assets");

        AssetPipeline::default()
            .install(&assets, None, Some(&provider))
            .await
            .unwrap();

        assert_eq!(
            fs::read_to_string(assets.join("mappings.js")).unwrap(),
            "var mappings = {}"
        );
    }

    #[tokio::test]
    async fn missing_runtime_script_is_fatal() {
        let temp = tempdir().unwrap();
        let provider = PackageScripts::new(
            temp.path().join("node_modules").join("rctf"),
            vec![PathBuf::from("step_definitions/support/all_mappings.js")],
        );

        let err = AssetPipeline::default()
            .install(&temp.path().join("assets"), None, Some(&provider))
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::MissingFile(path) if path.ends_with("all_mappings.js")));
    }
}
