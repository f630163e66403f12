//! Type expression trees attached to documented symbols.

use serde::{Deserialize, Serialize};

/// A doctrine-style type expression, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TypeExpr {
    /// A plain type name such as `string` or `Widget`.
    NameExpression { name: String },

    /// A generic application: `Array<string>`.
    TypeApplication {
        expression: Box<TypeExpr>,
        #[serde(default)]
        applications: Vec<TypeExpr>,
    },

    /// `(a | b)`
    UnionType {
        #[serde(default)]
        elements: Vec<TypeExpr>,
    },

    /// A tuple-like array: `[a, b]`
    ArrayType {
        #[serde(default)]
        elements: Vec<TypeExpr>,
    },

    /// An object literal type: `{key: value}`
    RecordType {
        #[serde(default)]
        fields: Vec<TypeExpr>,
    },

    /// A single field inside a record type.
    FieldType {
        key: String,
        #[serde(default)]
        value: Option<Box<TypeExpr>>,
    },

    /// `function (a, b): result`
    FunctionType {
        #[serde(default)]
        params: Vec<TypeExpr>,
        #[serde(default)]
        result: Option<Box<TypeExpr>>,
    },

    /// A named parameter inside a function type.
    ParameterType {
        #[serde(default)]
        name: Option<String>,
        expression: Box<TypeExpr>,
    },

    /// `...expr`
    RestType {
        #[serde(default)]
        expression: Option<Box<TypeExpr>>,
    },

    /// `expr?`
    OptionalType { expression: Box<TypeExpr> },

    /// `?expr`
    NullableType { expression: Box<TypeExpr> },

    /// `!expr`
    NonNullableType { expression: Box<TypeExpr> },

    /// `*`
    AllLiteral,
    NullLiteral,
    UndefinedLiteral,
    VoidLiteral,
    NullableLiteral,

    StringLiteralType { value: String },
    NumericLiteralType { value: f64 },
    BooleanLiteralType { value: bool },

    /// Type nodes outside the doctrine set; rendered as `any`.
    #[serde(other)]
    Unknown,
}

impl TypeExpr {
    /// Shorthand for a [`TypeExpr::NameExpression`].
    pub fn name(name: impl Into<String>) -> Self {
        Self::NameExpression { name: name.into() }
    }

    /// True for the bare `Function` name expression.
    pub fn is_function_name(&self) -> bool {
        matches!(self, Self::NameExpression { name } if name == "Function")
    }

    /// True when this expression marks an optional parameter.
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::OptionalType { .. })
    }
}
