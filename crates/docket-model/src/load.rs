//! Loading and validating documentation records.

use crate::section::DocumentationSection;

/// Errors that can occur when loading documentation records.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid documentation JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Section without a name (inside {parent})")]
    MissingName { parent: String },
}

/// Parse a JSON array of documentation records and validate them.
pub fn load_sections(json: &str) -> Result<Vec<DocumentationSection>, ModelError> {
    let sections: Vec<DocumentationSection> = serde_json::from_str(json)?;
    validate(&sections)?;
    Ok(sections)
}

/// Check identity fields on every section and nested member.
///
/// Slugs and signatures are keyed by name, so an empty one cannot be rendered.
pub fn validate(sections: &[DocumentationSection]) -> Result<(), ModelError> {
    fn check(section: &DocumentationSection, parent: &str) -> Result<(), ModelError> {
        if section.name.is_empty() {
            return Err(ModelError::MissingName {
                parent: parent.to_string(),
            });
        }
        for member in section.members.iter() {
            check(member, section.namespace())?;
        }
        Ok(())
    }

    for section in sections {
        check(section, "<root>")?;
    }
    Ok(())
}
