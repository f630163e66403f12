//! Static site builder.

use std::path::PathBuf;
use std::time::Instant;

use docket_model::DocumentationSection;

use crate::assets::{AssetPipeline, RuntimeScriptProvider};
use crate::highlight::HighlightConfig;
use crate::manifest::{self, version_file_name, VersionSource, ASSETS_DIR};
use crate::templates::{SiteContext, TemplateComposer};
use crate::writer::SiteWriter;

/// Configuration for building the documentation site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Output directory. When unset the build returns the HTML and writes
    /// nothing.
    pub output_dir: Option<PathBuf>,

    /// Site title
    pub title: String,

    /// Theme directory with optional `templates/` and `assets/` overrides
    pub theme_dir: Option<PathBuf>,

    /// Version being built
    pub version: VersionSource,

    /// Code highlighting
    pub highlight: HighlightConfig,

    /// Minify the built-in stylesheet
    pub minify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            title: "API Documentation".to_string(),
            theme_dir: None,
            version: VersionSource::Literal("0.0.0".to_string()),
            highlight: HighlightConfig::default(),
            minify: true,
        }
    }
}

/// Result of a build that wrote to disk.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of top-level sections rendered
    pub sections: usize,

    /// Every version now present in the output directory
    pub versions: Vec<String>,

    /// Number of asset files written or copied
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// What a build produced.
#[derive(Debug)]
pub enum BuildOutput {
    /// Rendered page, returned because no output directory was configured
    Html(String),
    /// Files written to the output directory
    Written(BuildResult),
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Invalid documentation section: {0}")]
    InvalidSection(String),

    #[error("Failed to determine version: {0}")]
    VersionError(String),

    #[error("Required file not found: {0}")]
    MissingFile(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    runtime_scripts: Option<Box<dyn RuntimeScriptProvider>>,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            runtime_scripts: None,
        }
    }

    /// Copy these runtime scripts into the output assets on every build.
    pub fn with_runtime_scripts(mut self, provider: Box<dyn RuntimeScriptProvider>) -> Self {
        self.runtime_scripts = Some(provider);
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the documentation site for `sections`.
    ///
    /// The page is rendered before anything touches the output directory, so
    /// template and section errors leave it unchanged.
    pub async fn build(&self, sections: &[DocumentationSection]) -> Result<BuildOutput, BuildError> {
        let start = Instant::now();

        let version = self.config.version.resolve().await?;
        tracing::info!("Building {} v{}", self.config.title, version);

        let mut composer = TemplateComposer::new().with_highlight(self.config.highlight.clone());
        if let Some(ref theme_dir) = self.config.theme_dir {
            composer = composer.with_theme(theme_dir).await?;
        }
        composer.check()?;

        let versions = match self.config.output_dir {
            Some(ref output_dir) => manifest::reconcile(output_dir, &version).await?,
            None => vec![version_file_name(&version)],
        };
        tracing::debug!("Known versions: {:?}", versions);

        let site = SiteContext {
            title: self.config.title.clone(),
            version: version.clone(),
            versions: versions.clone(),
        };
        let html = composer.render(sections, &site)?;

        let Some(ref output_dir) = self.config.output_dir else {
            tracing::info!("Rendered {} sections without writing", sections.len());
            return Ok(BuildOutput::Html(html));
        };

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| BuildError::WriteError(format!("{}: {}", output_dir.display(), e)))?;

        let assets = AssetPipeline::new(self.config.minify)
            .install(
                &output_dir.join(ASSETS_DIR),
                self.config.theme_dir.as_deref(),
                self.runtime_scripts.as_deref(),
            )
            .await?;

        SiteWriter::new(output_dir)
            .write(&version, &versions, &html)
            .await?;

        let duration = start.elapsed();
        tracing::info!(
            "Wrote {} to {}",
            version_file_name(&version),
            output_dir.display()
        );

        Ok(BuildOutput::Written(BuildResult {
            sections: sections.len(),
            versions,
            assets,
            duration_ms: duration.as_millis() as u64,
            output_dir: output_dir.clone(),
        }))
    }
}
