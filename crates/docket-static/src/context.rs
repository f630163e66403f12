//! Shared helper state for one render.

use docket_model::{DocumentationSection, MdNode, TypeExpr};

use crate::format::{Formatters, TypeFormat};
use crate::highlight::Highlighter;
use crate::link::LinkResolver;
use crate::markdown::MarkdownRenderer;
use crate::signature::SignatureFormatter;
use crate::slug::SlugRegistry;

/// Everything template helpers need: slugs, links, formatters, highlighter.
///
/// Built once per render before any fragment runs, then only read. The slug
/// cache is the single piece of interior state.
#[derive(Debug)]
pub struct RenderContext {
    slugs: SlugRegistry,
    links: LinkResolver,
    highlighter: Highlighter,
}

impl RenderContext {
    pub fn new(sections: &[DocumentationSection], highlighter: Highlighter) -> Self {
        Self {
            slugs: SlugRegistry::new(),
            links: LinkResolver::new(sections),
            highlighter,
        }
    }

    pub fn slug(&self, name: &str) -> String {
        self.slugs.slug(name)
    }

    pub fn slugs(&self) -> &SlugRegistry {
        &self.slugs
    }

    pub fn formatters(&self) -> Formatters<'_> {
        Formatters::new(&self.links, &self.slugs)
    }

    pub fn short_signature(&self, section: &DocumentationSection) -> String {
        let formatters = self.formatters();
        SignatureFormatter::new(&formatters).short_signature(section)
    }

    pub fn signature(&self, section: &DocumentationSection) -> String {
        let formatters = self.formatters();
        SignatureFormatter::new(&formatters).signature(section)
    }

    pub fn format_type(&self, ty: Option<&TypeExpr>) -> String {
        self.formatters().format_type(ty)
    }

    pub fn autolink(&self, text: &str) -> String {
        self.formatters().autolink(text)
    }

    pub fn markdown(&self, node: &MdNode, inline: bool) -> String {
        MarkdownRenderer::new(&self.links, &self.slugs, &self.highlighter).render(node, inline)
    }

    pub fn highlight(&self, code: &str) -> String {
        self.highlighter.highlight(code)
    }
}
