//! Static API reference generator for docket.
//!
//! Renders parsed documentation sections into a single versioned HTML page
//! with a version switcher, theme assets and runtime scripts.

pub mod assets;
pub mod builder;
pub mod context;
pub mod format;
pub mod highlight;
pub mod link;
pub mod manifest;
pub mod markdown;
pub mod signature;
pub mod slug;
pub mod templates;
pub mod writer;

pub use assets::{AssetPipeline, PackageScripts, RuntimeScript, RuntimeScriptProvider};
pub use builder::{BuildConfig, BuildError, BuildOutput, BuildResult, StaticBuilder};
pub use highlight::HighlightConfig;
pub use manifest::VersionSource;
pub use slug::SlugRegistry;
pub use templates::{SiteContext, TemplateComposer};
