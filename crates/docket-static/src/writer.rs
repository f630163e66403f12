//! Final output write: version switcher script, snapshot, and index.

use std::path::{Path, PathBuf};

use crate::builder::BuildError;
use crate::manifest::{version_file_name, ASSETS_DIR, INDEX_FILE};

/// Name of the generated version switcher script inside `assets/`.
pub const VERSIONS_SCRIPT: &str = "rctf_versions.js";

/// Client-side boilerplate that turns the version array into list items.
const VERSIONS_BOILERPLATE: &str = "  window.versions = ''\n\
rctf_versions.forEach(function(v) {\n  \
window.versions += `<li><a href=\"${v}\">${v}</a></li>`\n\
})\n";

/// Build the version switcher script for `versions`.
pub fn versions_script(versions: &[String]) -> String {
    let mut script = String::from("const rctf_versions = [");
    for version in versions {
        script.push('\'');
        script.push_str(&version.replace('\\', "\\\\").replace('\'', "\\'"));
        script.push_str("',");
    }
    if script.ends_with(',') {
        script.pop();
    }
    script.push_str("]\n");
    script.push_str(VERSIONS_BOILERPLATE);
    script
}

/// Persists a rendered page under its version and as the index.
pub struct SiteWriter {
    output_dir: PathBuf,
}

impl SiteWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the switcher script, then `v<version>.html`, then `index.html`.
    ///
    /// The script goes first because pages load it. An interruption between
    /// writes leaves a mixed site that the next build overwrites.
    pub async fn write(
        &self,
        version: &str,
        versions: &[String],
        html: &str,
    ) -> Result<Vec<PathBuf>, BuildError> {
        let assets_dir = self.output_dir.join(ASSETS_DIR);
        tokio::fs::create_dir_all(&assets_dir)
            .await
            .map_err(|e| BuildError::WriteError(format!("{}: {}", assets_dir.display(), e)))?;

        let script_path = assets_dir.join(VERSIONS_SCRIPT);
        write_file(&script_path, versions_script(versions).as_bytes()).await?;

        let snapshot_path = self.output_dir.join(version_file_name(version));
        write_file(&snapshot_path, html.as_bytes()).await?;

        let index_path = self.output_dir.join(INDEX_FILE);
        write_file(&index_path, html.as_bytes()).await?;

        Ok(vec![script_path, snapshot_path, index_path])
    }
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), BuildError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
