//! Call signatures for documented symbols.

use docket_model::{DocumentationSection, SectionKind};

use crate::format::{escape_html, TypeFormat};

/// Builds short and full signatures on top of a [`TypeFormat`].
pub struct SignatureFormatter<'a, F: TypeFormat> {
    formatter: &'a F,
}

impl<'a, F: TypeFormat> SignatureFormatter<'a, F> {
    pub fn new(formatter: &'a F) -> Self {
        Self { formatter }
    }

    /// `name(a, b?)`, `new Class(a)`, or the bare name for non-callables.
    pub fn short_signature(&self, section: &DocumentationSection) -> String {
        match prefix(section) {
            Some(prefix) => format!(
                "{}{}{}",
                prefix,
                escape_html(&section.name),
                self.formatter.parameters(section, true)
            ),
            None => escape_html(&section.name),
        }
    }

    /// Full signature with parameter types and the first return type.
    pub fn signature(&self, section: &DocumentationSection) -> String {
        let Some(prefix) = prefix(section) else {
            return escape_html(&section.name);
        };

        let returns = section
            .return_type()
            .map(|ty| format!(": {}", self.formatter.format_type(Some(ty))))
            .unwrap_or_default();

        format!(
            "{}{}{}{}",
            prefix,
            escape_html(&section.name),
            self.formatter.parameters(section, false),
            returns
        )
    }
}

/// Constructor prefix for classes, empty for functions, `None` otherwise.
fn prefix(section: &DocumentationSection) -> Option<&'static str> {
    if section.kind == SectionKind::Class {
        Some("new ")
    } else if section.is_function() {
        Some("")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_model::{Param, Returns, TypeExpr};
    use pretty_assertions::assert_eq;

    /// Plain-text formatter without links or escaping.
    struct PlainFormat;

    impl TypeFormat for PlainFormat {
        fn format_type(&self, ty: Option<&TypeExpr>) -> String {
            match ty {
                Some(TypeExpr::NameExpression { name }) => name.clone(),
                Some(_) => "complex".to_string(),
                None => "any".to_string(),
            }
        }

        fn parameters(&self, section: &DocumentationSection, short: bool) -> String {
            let params: Vec<String> = section
                .params
                .iter()
                .map(|p| {
                    if short {
                        p.name.clone()
                    } else {
                        format!("{}: {}", p.name, self.format_type(p.ty.as_ref()))
                    }
                })
                .collect();
            format!("({})", params.join(", "))
        }
    }

    fn returns(name: &str) -> Returns {
        Returns {
            ty: Some(TypeExpr::name(name)),
            description: None,
        }
    }

    #[test]
    fn class_gets_constructor_prefix() {
        let format = PlainFormat;
        let signatures = SignatureFormatter::new(&format);
        let class = DocumentationSection::new(SectionKind::Class, "Widget");

        assert_eq!(signatures.short_signature(&class), "new Widget()");
        assert_eq!(signatures.signature(&class), "new Widget()");
    }

    #[test]
    fn non_callables_degrade_to_name() {
        let format = PlainFormat;
        let signatures = SignatureFormatter::new(&format);

        let mut member = DocumentationSection::new(SectionKind::Member, "count");
        member.params.push(Param::new("ignored", None));
        member.returns.push(returns("number"));

        assert_eq!(signatures.short_signature(&member), "count");
        assert_eq!(signatures.signature(&member), "count");

        let typedef = DocumentationSection::new(SectionKind::Typedef, "Options");
        assert_eq!(signatures.signature(&typedef), "Options");
    }

    #[test]
    fn function_signature_uses_first_return() {
        let format = PlainFormat;
        let signatures = SignatureFormatter::new(&format);

        let mut function = DocumentationSection::new(SectionKind::Function, "parse");
        function
            .params
            .push(Param::new("input", Some(TypeExpr::name("string"))));
        function.returns.push(returns("Tree"));
        function.returns.push(returns("Error"));

        assert_eq!(signatures.short_signature(&function), "parse(input)");
        assert_eq!(signatures.signature(&function), "parse(input: string): Tree");
    }

    #[test]
    fn missing_returns_means_no_annotation() {
        let format = PlainFormat;
        let signatures = SignatureFormatter::new(&format);

        let mut function = DocumentationSection::new(SectionKind::Function, "reset");
        assert_eq!(signatures.signature(&function), "reset()");

        function.returns.push(Returns {
            ty: None,
            description: None,
        });
        assert_eq!(signatures.signature(&function), "reset()");
    }

    #[test]
    fn function_typedef_is_callable() {
        let format = PlainFormat;
        let signatures = SignatureFormatter::new(&format);

        let mut callback = DocumentationSection::new(SectionKind::Typedef, "Callback");
        callback.ty = Some(TypeExpr::name("Function"));
        callback.params.push(Param::new("err", None));

        assert_eq!(signatures.short_signature(&callback), "Callback(err)");
        assert_eq!(signatures.signature(&callback), "Callback(err: any)");
    }
}
