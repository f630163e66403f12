//! Version manifest for multi-version output directories.
//!
//! Every build leaves a `v<version>.html` snapshot behind. The manifest is the
//! set of those snapshots, recomputed from the output directory on each build.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::builder::BuildError;

/// Output entries that are not version snapshots.
pub const ASSETS_DIR: &str = "assets";
pub const INDEX_FILE: &str = "index.html";

/// File name of the snapshot for `version`.
pub fn version_file_name(version: &str) -> String {
    format!("v{}.html", version)
}

/// List known versions in `output_dir` and merge in the current one.
///
/// Entries are visited in name order; duplicates keep their first position.
/// A missing directory is a first build and yields only the current version.
pub async fn reconcile(output_dir: &Path, current_version: &str) -> Result<Vec<String>, BuildError> {
    let mut names = Vec::new();

    match tokio::fs::read_dir(output_dir).await {
        Ok(mut entries) => {
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| BuildError::ReadError(format!("{}: {}", output_dir.display(), e)))?
            {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("{} does not exist yet, first build", output_dir.display());
        }
        Err(e) => {
            return Err(BuildError::ReadError(format!(
                "{}: {}",
                output_dir.display(),
                e
            )))
        }
    }

    names.sort();

    let mut versions: Vec<String> = names
        .into_iter()
        .filter(|name| name != ASSETS_DIR && name != INDEX_FILE)
        .collect();
    versions.push(version_file_name(current_version));

    let mut seen = HashSet::new();
    versions.retain(|v| seen.insert(v.clone()));

    Ok(versions)
}

/// Where the version being built comes from.
#[derive(Debug, Clone)]
pub enum VersionSource {
    /// A version string given directly
    Literal(String),
    /// The `version` field of a package.json file
    PackageJson(PathBuf),
}

impl VersionSource {
    /// Resolve to a bare version string such as `1.2.3`.
    pub async fn resolve(&self) -> Result<String, BuildError> {
        match self {
            Self::Literal(version) => Ok(version.clone()),
            Self::PackageJson(path) => {
                let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                    if e.kind() == ErrorKind::NotFound {
                        BuildError::MissingFile(path.display().to_string())
                    } else {
                        BuildError::ReadError(format!("{}: {}", path.display(), e))
                    }
                })?;

                let manifest: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
                    BuildError::VersionError(format!("{}: {}", path.display(), e))
                })?;

                manifest
                    .get("version")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        BuildError::VersionError(format!(
                            "{} has no \"version\" field",
                            path.display()
                        ))
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn existing_current_version_is_not_duplicated() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("v1.0.0.html"), "old").unwrap();
        fs::write(temp.path().join("index.html"), "old").unwrap();
        fs::create_dir(temp.path().join("assets")).unwrap();

        let versions = reconcile(temp.path(), "1.0.0").await.unwrap();

        assert_eq!(versions, vec!["v1.0.0.html".to_string()]);
    }

    #[tokio::test]
    async fn first_build_yields_current_version_only() {
        let temp = tempdir().unwrap();

        let versions = reconcile(temp.path(), "2.0.0").await.unwrap();
        assert_eq!(versions, vec!["v2.0.0.html".to_string()]);

        fs::write(temp.path().join("v2.0.0.html"), "built").unwrap();

        let again = reconcile(temp.path(), "2.0.0").await.unwrap();
        assert_eq!(again, vec!["v2.0.0.html".to_string()]);
    }

    #[tokio::test]
    async fn missing_output_directory_counts_as_empty() {
        let temp = tempdir().unwrap();
        let versions = reconcile(&temp.path().join("not-yet"), "0.1.0").await.unwrap();

        assert_eq!(versions, vec!["v0.1.0.html".to_string()]);
    }

    #[tokio::test]
    async fn keeps_previous_versions_in_name_order() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("v1.1.0.html"), "").unwrap();
        fs::write(temp.path().join("v1.0.0.html"), "").unwrap();
        fs::write(temp.path().join("index.html"), "").unwrap();

        let versions = reconcile(temp.path(), "1.2.0").await.unwrap();

        assert_eq!(
            versions,
            vec![
                "v1.0.0.html".to_string(),
                "v1.1.0.html".to_string(),
                "v1.2.0.html".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn resolves_version_from_package_json() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("package.json");
        fs::write(&path, r#"{ "name": "rctf", "version": "1.4.2" }"#).unwrap();

        let version = VersionSource::PackageJson(path).resolve().await.unwrap();
        assert_eq!(version, "1.4.2");

        let literal = VersionSource::Literal("3.0.0".to_string()).resolve().await.unwrap();
        assert_eq!(literal, "3.0.0");
    }

    #[tokio::test]
    async fn missing_version_file_is_fatal() {
        let temp = tempdir().unwrap();
        let source = VersionSource::PackageJson(temp.path().join("package.json"));

        assert!(matches!(
            source.resolve().await,
            Err(BuildError::MissingFile(_))
        ));
    }

    #[tokio::test]
    async fn package_json_without_version_is_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("package.json");
        fs::write(&path, r#"{ "name": "rctf" }"#).unwrap();

        assert!(matches!(
            VersionSource::PackageJson(path).resolve().await,
            Err(BuildError::VersionError(_))
        ));
    }
}
