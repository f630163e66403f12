//! Documentation build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docket_static::{
    BuildConfig, BuildOutput, HighlightConfig, PackageScripts, StaticBuilder, VersionSource,
};
use serde::Deserialize;

/// Configuration file structure (docket.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    docs: DocsConfig,
    #[serde(default)]
    version: VersionConfig,
    #[serde(default)]
    highlight: HighlightConfig,
    runtime_scripts: Option<RuntimeScriptsConfig>,
    #[serde(default)]
    build: BuildSettings,
}

#[derive(Debug, Deserialize)]
struct DocsConfig {
    #[serde(default = "default_input")]
    input: String,
    /// Omit to print the page to stdout
    output: Option<String>,
    #[serde(default = "default_title")]
    title: String,
    theme: Option<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: None,
            title: default_title(),
            theme: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct VersionConfig {
    value: Option<String>,
    package: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RuntimeScriptsConfig {
    package: String,
    #[serde(default)]
    files: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BuildSettings {
    #[serde(default = "default_minify")]
    minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

fn default_input() -> String {
    "docs.json".to_string()
}
fn default_title() -> String {
    "API Documentation".to_string()
}
fn default_package_json() -> String {
    "package.json".to_string()
}
fn default_minify() -> bool {
    true
}

/// Command-line overrides for the config file.
#[derive(Debug, Default)]
pub struct BuildArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub stdout: bool,
    pub version: Option<String>,
    pub minify: Option<bool>,
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

/// Merge the config file with command-line overrides.
fn resolve(file: ConfigFile, args: &BuildArgs) -> (PathBuf, BuildConfig, Option<PackageScripts>) {
    let input = args
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(&file.docs.input));

    let output_dir = if args.stdout {
        None
    } else {
        args.output
            .clone()
            .or_else(|| file.docs.output.map(PathBuf::from))
    };

    let version = match (&args.version, file.version.value, file.version.package) {
        (Some(version), _, _) => VersionSource::Literal(version.clone()),
        (None, Some(version), _) => VersionSource::Literal(version),
        (None, None, package) => {
            VersionSource::PackageJson(PathBuf::from(package.unwrap_or_else(default_package_json)))
        }
    };

    let scripts = file.runtime_scripts.map(|scripts| {
        PackageScripts::new(
            scripts.package,
            scripts.files.into_iter().map(PathBuf::from).collect(),
        )
    });

    let config = BuildConfig {
        output_dir,
        title: file.docs.title,
        theme_dir: file.docs.theme.map(PathBuf::from),
        version,
        highlight: file.highlight,
        minify: args.minify.unwrap_or(file.build.minify),
    };

    (input, config, scripts)
}

/// Run the build command.
pub async fn run(config_path: &Path, args: BuildArgs) -> Result<()> {
    let (input, config, scripts) = resolve(load_config(config_path)?, &args);

    let json = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let sections = docket_model::load_sections(&json)
        .with_context(|| format!("Failed to parse {}", input.display()))?;
    tracing::info!("Loaded {} sections from {}", sections.len(), input.display());

    let mut builder = StaticBuilder::new(config);
    if let Some(scripts) = scripts {
        builder = builder.with_runtime_scripts(Box::new(scripts));
    }

    match builder.build(&sections).await? {
        BuildOutput::Html(html) => {
            print!("{}", html);
        }
        BuildOutput::Written(result) => {
            tracing::info!(
                "Built {} sections, {} versions, {} assets in {}ms",
                result.sections,
                result.versions.len(),
                result.assets,
                result.duration_ms
            );
            tracing::info!("Output: {}", result.output_dir.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_config_uses_defaults() {
        let temp = tempdir().unwrap();
        let config = load_config(&temp.path().join("docket.toml")).unwrap();

        assert_eq!(config.docs.input, "docs.json");
        assert_eq!(config.docs.output, None);
        assert_eq!(config.docs.title, "API Documentation");
        assert!(config.build.minify);
        assert_eq!(config.highlight.language, "js");
    }

    #[test]
    fn parses_full_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docket.toml");
        std::fs::write(
            &path,
            r#"
[docs]
input = "api.json"
output = "site"
title = "rctf"
theme = "theme"

[version]
package = "node_modules/rctf/package.json"

[highlight]
auto = true

[runtime_scripts]
package = "node_modules/rctf"
files = ["step_definitions/support/mappings.js"]

[build]
minify = false
"#,
        )
        .unwrap();

        let (input, config, scripts) = resolve(load_config(&path).unwrap(), &BuildArgs::default());

        assert_eq!(input, PathBuf::from("api.json"));
        assert_eq!(config.output_dir, Some(PathBuf::from("site")));
        assert_eq!(config.title, "rctf");
        assert_eq!(config.theme_dir, Some(PathBuf::from("theme")));
        assert!(matches!(
            config.version,
            VersionSource::PackageJson(ref p) if p == Path::new("node_modules/rctf/package.json")
        ));
        assert!(config.highlight.auto);
        assert!(!config.minify);
        assert!(scripts.is_some());
    }

    #[test]
    fn command_line_overrides_config() {
        let file: ConfigFile = toml::from_str(
            r#"
[docs]
output = "site"

[version]
value = "1.0.0"
"#,
        )
        .unwrap();

        let args = BuildArgs {
            stdout: true,
            version: Some("2.0.0".to_string()),
            minify: Some(false),
            ..Default::default()
        };
        let (_, config, scripts) = resolve(file, &args);

        assert_eq!(config.output_dir, None);
        assert!(matches!(config.version, VersionSource::Literal(ref v) if v == "2.0.0"));
        assert!(!config.minify);
        assert!(scripts.is_none());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docket.toml");
        std::fs::write(&path, "[docs\ninput = ").unwrap();

        assert!(load_config(&path).is_err());
    }
}
