//! Resolution of symbol references to in-page anchors.

use std::collections::HashSet;

use docket_model::DocumentationSection;

use crate::slug::SlugRegistry;

/// Maps documented namespaces to `#slug` anchors.
#[derive(Debug, Default)]
pub struct LinkResolver {
    namespaces: HashSet<String>,
}

impl LinkResolver {
    /// Collect every documented namespace in the section tree.
    pub fn new(sections: &[DocumentationSection]) -> Self {
        let mut namespaces = HashSet::new();
        for section in sections {
            section.walk(&mut |s| {
                namespaces.insert(s.namespace().to_string());
            });
        }
        Self { namespaces }
    }

    /// Whether `namespace` names a documented symbol.
    pub fn contains(&self, namespace: &str) -> bool {
        self.namespaces.contains(namespace)
    }

    /// Anchor for a documented symbol; `None` leaves the reference unlinked.
    pub fn resolve(&self, namespace: &str, slugs: &SlugRegistry) -> Option<String> {
        if self.contains(namespace) {
            Some(format!("#{}", slugs.slug(namespace)))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_model::SectionKind;

    fn widget() -> DocumentationSection {
        let mut class = DocumentationSection::new(SectionKind::Class, "Widget");
        let mut render = DocumentationSection::new(SectionKind::Function, "render");
        render.namespace = Some("Widget#render".to_string());
        class.members.instance.push(render);
        class
    }

    #[test]
    fn resolves_documented_symbols() {
        let resolver = LinkResolver::new(&[widget()]);
        let slugs = SlugRegistry::new();

        assert_eq!(resolver.resolve("Widget", &slugs).as_deref(), Some("#widget"));
        assert_eq!(
            resolver.resolve("Widget#render", &slugs).as_deref(),
            Some("#widgetrender")
        );
    }

    #[test]
    fn shares_slugs_with_registry() {
        let resolver = LinkResolver::new(&[widget()]);
        let slugs = SlugRegistry::new();

        let anchor = resolver.resolve("Widget", &slugs).unwrap();
        assert_eq!(anchor, format!("#{}", slugs.slug("Widget")));
    }

    #[test]
    fn leaves_unknown_symbols_unresolved() {
        let resolver = LinkResolver::new(&[widget()]);
        let slugs = SlugRegistry::new();

        assert_eq!(resolver.resolve("string", &slugs), None);
        assert!(slugs.is_empty());
    }

    #[test]
    fn bare_member_name_is_not_a_target() {
        let resolver = LinkResolver::new(&[widget()]);
        let slugs = SlugRegistry::new();

        // The member's anchor is slug("Widget#render"), never slug("render").
        assert!(!resolver.contains("render"));
        assert_eq!(resolver.resolve("render", &slugs), None);
    }
}
