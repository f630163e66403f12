//! Documentation records: one [`DocumentationSection`] per documented symbol.

use serde::{Deserialize, Serialize};

use crate::markdown::{deserialize_markdown, parse_markdown, MdNode};
use crate::types::TypeExpr;

/// What kind of symbol a section documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Class,
    Constant,
    Enum,
    Event,
    External,
    File,
    Function,
    Interface,
    Member,
    Mixin,
    Module,
    Namespace,
    Note,
    Typedef,
    #[serde(other)]
    Other,
}

/// A single documented entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationSection {
    /// Symbol kind
    pub kind: SectionKind,

    /// Display name
    pub name: String,

    /// Fully qualified path, e.g. `Widget#render`
    #[serde(default)]
    pub namespace: Option<String>,

    /// Long description
    #[serde(default, deserialize_with = "deserialize_markdown")]
    pub description: Option<MdNode>,

    /// Declared type (typedefs, members)
    #[serde(default, rename = "type")]
    pub ty: Option<TypeExpr>,

    /// Call parameters
    #[serde(default, alias = "parameters")]
    pub params: Vec<Param>,

    /// Documented properties
    #[serde(default)]
    pub properties: Vec<Param>,

    /// Return annotations; only the first one is used in signatures
    #[serde(default)]
    pub returns: Vec<Returns>,

    /// Thrown errors
    #[serde(default)]
    pub throws: Vec<Returns>,

    /// Code examples
    #[serde(default)]
    pub examples: Vec<Example>,

    /// Parent classes
    #[serde(default)]
    pub augments: Vec<Augment>,

    /// Deprecation notice
    #[serde(default, deserialize_with = "deserialize_markdown")]
    pub deprecated: Option<MdNode>,

    /// Version the symbol first appeared in
    #[serde(default)]
    pub since: Option<String>,

    /// Nested sections
    #[serde(default)]
    pub members: Members,
}

impl DocumentationSection {
    /// Create a section with only its identity fields set.
    pub fn new(kind: SectionKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace: None,
            description: None,
            ty: None,
            params: Vec::new(),
            properties: Vec::new(),
            returns: Vec::new(),
            throws: Vec::new(),
            examples: Vec::new(),
            augments: Vec::new(),
            deprecated: None,
            since: None,
            members: Members::default(),
        }
    }

    /// Fully qualified path, falling back to the display name.
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(&self.name)
    }

    /// Functions, and typedefs declared as the `Function` type.
    pub fn is_function(&self) -> bool {
        match self.kind {
            SectionKind::Function => true,
            SectionKind::Typedef => self.ty.as_ref().is_some_and(TypeExpr::is_function_name),
            _ => false,
        }
    }

    /// Return type of the first return annotation, if any.
    pub fn return_type(&self) -> Option<&TypeExpr> {
        self.returns.first().and_then(|r| r.ty.as_ref())
    }

    /// Walk this section and every nested member, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DocumentationSection)) {
        visit(self);
        for member in self.members.iter() {
            member.walk(visit);
        }
    }
}

/// A typed parameter or property descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,

    #[serde(default, rename = "type")]
    pub ty: Option<TypeExpr>,

    #[serde(default, deserialize_with = "deserialize_markdown")]
    pub description: Option<MdNode>,

    /// Default value as source text
    #[serde(default)]
    pub default: Option<String>,

    /// Nested properties (`options.timeout`)
    #[serde(default)]
    pub properties: Vec<Param>,
}

impl Param {
    /// Create a parameter with a name and optional type.
    pub fn new(name: impl Into<String>, ty: Option<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            default: None,
            properties: Vec::new(),
        }
    }
}

/// A return or throws annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Returns {
    #[serde(default, rename = "type")]
    pub ty: Option<TypeExpr>,

    #[serde(default, deserialize_with = "deserialize_markdown")]
    pub description: Option<MdNode>,
}

/// A code example with an optional caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ExampleRepr")]
pub struct Example {
    /// Example source code
    pub description: String,

    /// Caption rendered above the code
    pub caption: Option<MdNode>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExampleRepr {
    Code(String),
    Full {
        description: String,
        #[serde(default, deserialize_with = "deserialize_markdown")]
        caption: Option<MdNode>,
    },
}

impl From<ExampleRepr> for Example {
    fn from(repr: ExampleRepr) -> Self {
        match repr {
            ExampleRepr::Code(description) => Self {
                description,
                caption: None,
            },
            ExampleRepr::Full {
                description,
                caption,
            } => Self {
                description,
                caption,
            },
        }
    }
}

/// A parent class reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Augment {
    pub name: String,
}

/// Nested sections grouped the way documentation.js groups them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "MembersRepr")]
pub struct Members {
    pub global: Vec<DocumentationSection>,
    pub inner: Vec<DocumentationSection>,
    pub instance: Vec<DocumentationSection>,
    pub events: Vec<DocumentationSection>,
    #[serde(rename = "static")]
    pub statics: Vec<DocumentationSection>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MembersRepr {
    Flat(Vec<DocumentationSection>),
    Grouped {
        #[serde(default)]
        global: Vec<DocumentationSection>,
        #[serde(default)]
        inner: Vec<DocumentationSection>,
        #[serde(default)]
        instance: Vec<DocumentationSection>,
        #[serde(default)]
        events: Vec<DocumentationSection>,
        #[serde(default, rename = "static")]
        statics: Vec<DocumentationSection>,
    },
}

impl From<MembersRepr> for Members {
    fn from(repr: MembersRepr) -> Self {
        match repr {
            MembersRepr::Flat(statics) => Self {
                statics,
                ..Default::default()
            },
            MembersRepr::Grouped {
                global,
                inner,
                instance,
                events,
                statics,
            } => Self {
                global,
                inner,
                instance,
                events,
                statics,
            },
        }
    }
}

impl Members {
    /// All members in rendering order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentationSection> {
        self.global
            .iter()
            .chain(&self.inner)
            .chain(&self.instance)
            .chain(&self.events)
            .chain(&self.statics)
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Convenience for building markdown descriptions in code.
pub fn describe(text: &str) -> Option<MdNode> {
    Some(parse_markdown(text))
}
