//! Documentation record types for docket.
//!
//! This crate models already-parsed API documentation (the JSON shape emitted
//! by documentation.js): sections, parameters, type expressions and markdown
//! description trees.

pub mod load;
pub mod markdown;
pub mod section;
pub mod types;

pub use load::{load_sections, validate, ModelError};
pub use markdown::{parse_markdown, MdNode};
pub use section::{
    describe, Augment, DocumentationSection, Example, Members, Param, Returns, SectionKind,
};
pub use types::TypeExpr;
