//! HTML formatting of type expressions and parameter lists.

use docket_model::{DocumentationSection, Param, TypeExpr};

use crate::link::LinkResolver;
use crate::slug::SlugRegistry;

/// Type and parameter formatting used by signatures and templates.
pub trait TypeFormat {
    /// Render a type expression as HTML; a missing type renders as `any`.
    fn format_type(&self, ty: Option<&TypeExpr>) -> String;

    /// Render a parenthesized parameter list, optionally in compact form.
    fn parameters(&self, section: &DocumentationSection, short: bool) -> String;
}

/// Formatters that link documented type names to their anchors.
pub struct Formatters<'a> {
    links: &'a LinkResolver,
    slugs: &'a SlugRegistry,
}

impl<'a> Formatters<'a> {
    pub fn new(links: &'a LinkResolver, slugs: &'a SlugRegistry) -> Self {
        Self { links, slugs }
    }

    /// Link `text` to its anchor when it names a documented symbol.
    pub fn autolink(&self, text: &str) -> String {
        match self.links.resolve(text, self.slugs) {
            Some(href) => format!(
                "<a href=\"{}\">{}</a>",
                escape_html(&href),
                escape_html(text)
            ),
            None => escape_html(text),
        }
    }

    fn write_type(&self, ty: &TypeExpr, out: &mut String) {
        match ty {
            TypeExpr::NameExpression { name } => out.push_str(&self.autolink(name)),
            TypeExpr::TypeApplication {
                expression,
                applications,
            } => {
                self.write_type(expression, out);
                self.write_list(applications, "&lt;", "&gt;", ", ", out);
            }
            TypeExpr::UnionType { elements } => self.write_list(elements, "(", ")", " | ", out),
            TypeExpr::ArrayType { elements } => self.write_list(elements, "[", "]", ", ", out),
            TypeExpr::RecordType { fields } => self.write_list(fields, "{", "}", ", ", out),
            TypeExpr::FieldType { key, value } => {
                out.push_str(&escape_html(key));
                if let Some(value) = value {
                    out.push_str(": ");
                    self.write_type(value, out);
                }
            }
            TypeExpr::FunctionType { params, result } => {
                out.push_str("function ");
                self.write_list(params, "(", ")", ", ", out);
                if let Some(result) = result {
                    out.push_str(": ");
                    self.write_type(result, out);
                }
            }
            TypeExpr::ParameterType { name, expression } => {
                if let Some(name) = name {
                    out.push_str(&escape_html(name));
                    out.push_str(": ");
                }
                self.write_type(expression, out);
            }
            TypeExpr::RestType { expression } => {
                out.push_str("...");
                if let Some(expression) = expression {
                    self.write_type(expression, out);
                }
            }
            TypeExpr::OptionalType { expression } => {
                self.write_type(expression, out);
                out.push('?');
            }
            TypeExpr::NullableType { expression } => {
                out.push('?');
                self.write_type(expression, out);
            }
            TypeExpr::NonNullableType { expression } => {
                out.push('!');
                self.write_type(expression, out);
            }
            TypeExpr::AllLiteral | TypeExpr::Unknown => out.push_str("any"),
            TypeExpr::NullLiteral => out.push_str("null"),
            TypeExpr::UndefinedLiteral => out.push_str("undefined"),
            TypeExpr::VoidLiteral => out.push_str("void"),
            TypeExpr::NullableLiteral => out.push('?'),
            TypeExpr::StringLiteralType { value } => {
                let quoted = serde_json::to_string(value).unwrap_or_else(|_| value.clone());
                out.push_str(&format!("<code>{}</code>", escape_html(&quoted)));
            }
            TypeExpr::NumericLiteralType { value } => {
                out.push_str(&format!("<code>{}</code>", value));
            }
            TypeExpr::BooleanLiteralType { value } => {
                out.push_str(&format!("<code>{}</code>", value));
            }
        }
    }

    fn write_list(&self, items: &[TypeExpr], open: &str, close: &str, sep: &str, out: &mut String) {
        out.push_str(open);
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            self.write_type(item, out);
        }
        out.push_str(close);
    }

    fn format_param(&self, param: &Param, short: bool) -> String {
        let name = escape_html(&param.name);
        if !short {
            return format!("{}: {}", name, self.format_type(param.ty.as_ref()));
        }

        if param.ty.as_ref().is_some_and(TypeExpr::is_optional) {
            match &param.default {
                Some(default) => format!("{} = {}", name, escape_html(default)),
                None => format!("{}?", name),
            }
        } else {
            name
        }
    }
}

impl TypeFormat for Formatters<'_> {
    fn format_type(&self, ty: Option<&TypeExpr>) -> String {
        match ty {
            Some(ty) => {
                let mut out = String::new();
                self.write_type(ty, &mut out);
                out
            }
            None => "any".to_string(),
        }
    }

    fn parameters(&self, section: &DocumentationSection, short: bool) -> String {
        let params: Vec<String> = section
            .params
            .iter()
            .map(|p| self.format_param(p, short))
            .collect();
        format!("({})", params.join(", "))
    }
}

/// Escape text for inclusion in HTML.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
