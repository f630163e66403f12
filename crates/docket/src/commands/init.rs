//! Write a starter docket.toml.

use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    write_config(config_path).await?;

    tracing::info!("Created {}", config_path.display());
    tracing::info!("Run 'docket build' to generate the documentation.");

    Ok(())
}

async fn write_config(path: &Path) -> Result<()> {
    tokio::fs::write(path, DEFAULT_CONFIG)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

const DEFAULT_CONFIG: &str = r#"# Docket Configuration

[docs]
# Documentation records (JSON array of sections)
input = "docs.json"

# Output directory; remove to print the page to stdout
output = "dist"

# Site title
title = "API Documentation"

# Theme directory with templates/ and assets/ overrides
# theme = "theme"

[version]
# Version being built, or read it from a package.json
# value = "1.0.0"
package = "package.json"

[highlight]
# Detect the language of each example instead of using `language`
auto = false
language = "js"

# Scripts the pages load at runtime, copied from an installed package
# [runtime_scripts]
# package = "node_modules/rctf"
# files = [
#   "step_definitions/support/mappings.js",
#   "step_definitions/support/all_mappings.js",
# ]

[build]
# Minify the built-in stylesheet
minify = true
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_default_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docket.toml");

        run(&path, false).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, DEFAULT_CONFIG);
        assert!(toml::from_str::<toml::Value>(&written).is_ok());
    }

    #[tokio::test]
    async fn keeps_existing_config_without_yes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docket.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        run(&path, false).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        run(&path, true).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
