//! Markdown tree to HTML rendering.

use std::borrow::Cow;

use docket_model::MdNode;
use pulldown_cmark::{html, Alignment, CowStr, Event, HeadingLevel, LinkType, Tag, TagEnd};

use crate::highlight::Highlighter;
use crate::link::LinkResolver;
use crate::slug::SlugRegistry;

/// Hoist a leading paragraph's children to the root.
///
/// Used for inline contexts (table cells, return descriptions) where a
/// wrapping `<p>` would break the layout: `[paragraph(A, B), C]` becomes
/// `[A, B, C]`.
pub fn inline_root(node: &MdNode) -> Cow<'_, MdNode> {
    match node.children().split_first() {
        Some((MdNode::Paragraph { children }, rest)) => {
            let mut spliced = children.clone();
            spliced.extend(rest.iter().cloned());
            Cow::Owned(MdNode::Root { children: spliced })
        }
        _ => Cow::Borrowed(node),
    }
}

/// Renders markdown trees through pulldown-cmark's HTML writer.
pub struct MarkdownRenderer<'a> {
    links: &'a LinkResolver,
    slugs: &'a SlugRegistry,
    highlighter: &'a Highlighter,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(links: &'a LinkResolver, slugs: &'a SlugRegistry, highlighter: &'a Highlighter) -> Self {
        Self {
            links,
            slugs,
            highlighter,
        }
    }

    /// Render `node` to HTML, flattening the leading paragraph when `inline`.
    pub fn render(&self, node: &MdNode, inline: bool) -> String {
        let root = if inline {
            inline_root(node)
        } else {
            Cow::Borrowed(node)
        };

        let mut events = Vec::new();
        self.push_events(&root, &mut events);

        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        out
    }

    fn push_children(&self, children: &[MdNode], events: &mut Vec<Event<'static>>) {
        for child in children {
            self.push_events(child, events);
        }
    }

    fn wrap(
        &self,
        open: Tag<'static>,
        close: TagEnd,
        children: &[MdNode],
        events: &mut Vec<Event<'static>>,
    ) {
        events.push(Event::Start(open));
        self.push_children(children, events);
        events.push(Event::End(close));
    }

    fn push_events(&self, node: &MdNode, events: &mut Vec<Event<'static>>) {
        match node {
            MdNode::Root { children } => self.push_children(children, events),
            MdNode::Paragraph { children } => {
                self.wrap(Tag::Paragraph, TagEnd::Paragraph, children, events)
            }
            MdNode::Heading { depth, children } => {
                let level = heading_level(*depth);
                self.wrap(
                    Tag::Heading {
                        level,
                        id: None,
                        classes: Vec::new(),
                        attrs: Vec::new(),
                    },
                    TagEnd::Heading(level),
                    children,
                    events,
                )
            }
            MdNode::Text { value } => events.push(Event::Text(owned(value))),
            MdNode::Emphasis { children } => {
                self.wrap(Tag::Emphasis, TagEnd::Emphasis, children, events)
            }
            MdNode::Strong { children } => self.wrap(Tag::Strong, TagEnd::Strong, children, events),
            MdNode::Delete { children } => {
                self.wrap(Tag::Strikethrough, TagEnd::Strikethrough, children, events)
            }
            MdNode::InlineCode { value } => events.push(Event::Code(owned(value))),
            MdNode::Code { lang, value } => {
                let highlighted = self.highlighter.highlight_with(value, lang.as_deref());
                events.push(Event::Html(CowStr::from(format!(
                    "<pre class=\"highlight\"><code>{}</code></pre>\n",
                    highlighted
                ))));
            }
            MdNode::Link {
                url,
                title,
                children,
                jsdoc,
            } => {
                let href = if *jsdoc {
                    self.links.resolve(url, self.slugs).unwrap_or_else(|| url.clone())
                } else {
                    url.clone()
                };
                let open = Tag::Link {
                    link_type: LinkType::Inline,
                    dest_url: CowStr::from(href),
                    title: owned(title.as_deref().unwrap_or_default()),
                    id: CowStr::from(""),
                };
                if children.is_empty() {
                    events.push(Event::Start(open));
                    events.push(Event::Text(owned(url)));
                    events.push(Event::End(TagEnd::Link));
                } else {
                    self.wrap(open, TagEnd::Link, children, events);
                }
            }
            MdNode::Image { url, title, alt } => {
                events.push(Event::Start(Tag::Image {
                    link_type: LinkType::Inline,
                    dest_url: owned(url),
                    title: owned(title.as_deref().unwrap_or_default()),
                    id: CowStr::from(""),
                }));
                if let Some(alt) = alt {
                    events.push(Event::Text(owned(alt)));
                }
                events.push(Event::End(TagEnd::Image));
            }
            MdNode::List {
                ordered,
                start,
                children,
            } => {
                let start = if *ordered { Some(start.unwrap_or(1)) } else { None };
                self.wrap(Tag::List(start), TagEnd::List(*ordered), children, events)
            }
            MdNode::ListItem { children } => self.wrap(Tag::Item, TagEnd::Item, children, events),
            MdNode::Blockquote { children } => {
                events.push(Event::Html(CowStr::from("<blockquote>\n")));
                self.push_children(children, events);
                events.push(Event::Html(CowStr::from("</blockquote>\n")));
            }
            MdNode::LinkReference { children } => self.push_children(children, events),
            MdNode::ImageReference { alt } => {
                if let Some(alt) = alt {
                    events.push(Event::Text(owned(alt)));
                }
            }
            MdNode::Table { align, children } => {
                let alignments = align.iter().map(|a| alignment(a.as_deref())).collect();
                events.push(Event::Start(Tag::Table(alignments)));
                let mut rows = children.iter();
                if let Some(head) = rows.next() {
                    self.wrap(Tag::TableHead, TagEnd::TableHead, head.children(), events);
                }
                for row in rows {
                    self.push_events(row, events);
                }
                events.push(Event::End(TagEnd::Table));
            }
            MdNode::TableRow { children } => {
                self.wrap(Tag::TableRow, TagEnd::TableRow, children, events)
            }
            MdNode::TableCell { children } => {
                self.wrap(Tag::TableCell, TagEnd::TableCell, children, events)
            }
            MdNode::ThematicBreak => events.push(Event::Rule),
            MdNode::Break => events.push(Event::HardBreak),
            MdNode::Html { value } => events.push(Event::Html(owned(value))),
            MdNode::Unknown => {}
        }
    }
}

fn owned(s: &str) -> CowStr<'static> {
    CowStr::from(s.to_string())
}

fn alignment(name: Option<&str>) -> Alignment {
    match name {
        Some("left") => Alignment::Left,
        Some("center") => Alignment::Center,
        Some("right") => Alignment::Right,
        _ => Alignment::None,
    }
}

fn heading_level(depth: u8) -> HeadingLevel {
    match depth {
        0 | 1 => HeadingLevel::H1,
        2 => HeadingLevel::H2,
        3 => HeadingLevel::H3,
        4 => HeadingLevel::H4,
        5 => HeadingLevel::H5,
        _ => HeadingLevel::H6,
    }
}
