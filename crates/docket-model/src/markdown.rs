//! Markdown trees carried by documentation records.
//!
//! Descriptions arrive either as an mdast-style tree or as plain markdown
//! text. Text is parsed with pulldown-cmark into the same [`MdNode`] shape so
//! the renderer only ever deals with trees.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag};
use serde::{Deserialize, Deserializer, Serialize};

/// A markdown syntax tree node, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MdNode {
    Root {
        #[serde(default)]
        children: Vec<MdNode>,
    },
    Paragraph {
        #[serde(default)]
        children: Vec<MdNode>,
    },
    Heading {
        #[serde(default = "default_depth")]
        depth: u8,
        #[serde(default)]
        children: Vec<MdNode>,
    },
    Text {
        value: String,
    },
    Emphasis {
        #[serde(default)]
        children: Vec<MdNode>,
    },
    Strong {
        #[serde(default)]
        children: Vec<MdNode>,
    },
    Delete {
        #[serde(default)]
        children: Vec<MdNode>,
    },
    InlineCode {
        value: String,
    },
    Code {
        #[serde(default)]
        lang: Option<String>,
        value: String,
    },
    Link {
        url: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        children: Vec<MdNode>,
        /// Set for links produced from `{@link Symbol}` references
        #[serde(default)]
        jsdoc: bool,
    },
    Image {
        url: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        alt: Option<String>,
    },
    List {
        #[serde(default)]
        ordered: bool,
        #[serde(default)]
        start: Option<u64>,
        #[serde(default)]
        children: Vec<MdNode>,
    },
    ListItem {
        #[serde(default)]
        children: Vec<MdNode>,
    },
    Blockquote {
        #[serde(default)]
        children: Vec<MdNode>,
    },
    /// `[text][ref]` whose definition was not resolved into a link
    LinkReference {
        #[serde(default)]
        children: Vec<MdNode>,
    },
    ImageReference {
        #[serde(default)]
        alt: Option<String>,
    },
    /// GFM table; the first row is the header
    Table {
        /// Per-column `left`, `center`, `right` or null
        #[serde(default)]
        align: Vec<Option<String>>,
        #[serde(default)]
        children: Vec<MdNode>,
    },
    TableRow {
        #[serde(default)]
        children: Vec<MdNode>,
    },
    TableCell {
        #[serde(default)]
        children: Vec<MdNode>,
    },
    ThematicBreak,
    Break,
    Html {
        value: String,
    },
    /// Node types the renderer does not know about.
    #[serde(other)]
    Unknown,
}

fn default_depth() -> u8 {
    1
}

impl MdNode {
    /// Create a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Child nodes, empty for leaves.
    pub fn children(&self) -> &[MdNode] {
        self.children_ref().map(Vec::as_slice).unwrap_or(&[])
    }

    fn children_ref(&self) -> Option<&Vec<MdNode>> {
        match self {
            Self::Root { children }
            | Self::Paragraph { children }
            | Self::Heading { children, .. }
            | Self::Emphasis { children }
            | Self::Strong { children }
            | Self::Delete { children }
            | Self::Link { children, .. }
            | Self::List { children, .. }
            | Self::ListItem { children }
            | Self::Blockquote { children }
            | Self::LinkReference { children }
            | Self::Table { children, .. }
            | Self::TableRow { children }
            | Self::TableCell { children } => Some(children),
            _ => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<MdNode>> {
        match self {
            Self::Root { children }
            | Self::Paragraph { children }
            | Self::Heading { children, .. }
            | Self::Emphasis { children }
            | Self::Strong { children }
            | Self::Delete { children }
            | Self::Link { children, .. }
            | Self::List { children, .. }
            | Self::ListItem { children }
            | Self::Blockquote { children }
            | Self::LinkReference { children }
            | Self::Table { children, .. }
            | Self::TableRow { children }
            | Self::TableCell { children } => Some(children),
            _ => None,
        }
    }

    /// Concatenated text content of this node and its descendants.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text { value } | Self::InlineCode { value } | Self::Code { value, .. } => {
                value.clone()
            }
            Self::Image { alt, .. } | Self::ImageReference { alt } => {
                alt.clone().unwrap_or_default()
            }
            _ => self.children().iter().map(MdNode::plain_text).collect(),
        }
    }
}

/// Accepts either a markdown tree or a markdown string.
#[derive(Deserialize)]
#[serde(untagged)]
enum MarkdownRepr {
    Text(String),
    Tree(MdNode),
}

/// Serde helper for optional markdown fields.
pub fn deserialize_markdown<'de, D>(deserializer: D) -> Result<Option<MdNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<MarkdownRepr>::deserialize(deserializer)?;
    Ok(repr.map(|r| match r {
        MarkdownRepr::Text(text) => parse_markdown(&text),
        MarkdownRepr::Tree(node) => node,
    }))
}

/// Parse markdown text into a [`MdNode::Root`] tree.
pub fn parse_markdown(source: &str) -> MdNode {
    let parser = Parser::new_ext(
        source,
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES,
    );

    let mut stack: Vec<MdNode> = vec![MdNode::Root {
        children: Vec::new(),
    }];

    for event in parser {
        match event {
            Event::Start(tag) => stack.push(open_node(tag)),

            Event::End(_) => {
                if stack.len() > 1 {
                    if let Some(node) = stack.pop() {
                        append(&mut stack, close_node(node));
                    }
                }
            }

            Event::Text(text) => match stack.last_mut() {
                Some(MdNode::Code { value, .. }) | Some(MdNode::Html { value }) => {
                    value.push_str(&text)
                }
                Some(MdNode::Image { alt, .. }) => {
                    alt.get_or_insert_with(String::new).push_str(&text)
                }
                _ => append(&mut stack, MdNode::text(text.to_string())),
            },

            Event::Code(code) => append(
                &mut stack,
                MdNode::InlineCode {
                    value: code.to_string(),
                },
            ),

            Event::Html(html) | Event::InlineHtml(html) => match stack.last_mut() {
                Some(MdNode::Html { value }) => value.push_str(&html),
                _ => append(
                    &mut stack,
                    MdNode::Html {
                        value: html.to_string(),
                    },
                ),
            },

            Event::SoftBreak => append(&mut stack, MdNode::text("\n")),
            Event::HardBreak => append(&mut stack, MdNode::Break),
            Event::Rule => append(&mut stack, MdNode::ThematicBreak),

            _ => {}
        }
    }

    // Unbalanced events cannot come out of pulldown-cmark; fold anything left.
    while stack.len() > 1 {
        if let Some(node) = stack.pop() {
            append(&mut stack, close_node(node));
        }
    }

    stack.pop().unwrap_or(MdNode::Root {
        children: Vec::new(),
    })
}

fn open_node(tag: Tag<'_>) -> MdNode {
    match tag {
        Tag::Paragraph => MdNode::Paragraph {
            children: Vec::new(),
        },
        Tag::Heading { level, .. } => MdNode::Heading {
            depth: level as u8,
            children: Vec::new(),
        },
        Tag::CodeBlock(kind) => {
            let lang = match kind {
                CodeBlockKind::Fenced(info) => info
                    .split_whitespace()
                    .next()
                    .map(|lang| lang.to_string()),
                CodeBlockKind::Indented => None,
            };
            MdNode::Code {
                lang,
                value: String::new(),
            }
        }
        Tag::HtmlBlock => MdNode::Html {
            value: String::new(),
        },
        Tag::List(start) => MdNode::List {
            ordered: start.is_some(),
            start,
            children: Vec::new(),
        },
        Tag::Item => MdNode::ListItem {
            children: Vec::new(),
        },
        Tag::Table(alignments) => MdNode::Table {
            align: alignments.iter().map(alignment_name).collect(),
            children: Vec::new(),
        },
        Tag::TableHead | Tag::TableRow => MdNode::TableRow {
            children: Vec::new(),
        },
        Tag::TableCell => MdNode::TableCell {
            children: Vec::new(),
        },
        Tag::Emphasis => MdNode::Emphasis {
            children: Vec::new(),
        },
        Tag::Strong => MdNode::Strong {
            children: Vec::new(),
        },
        Tag::Strikethrough => MdNode::Delete {
            children: Vec::new(),
        },
        Tag::Link {
            dest_url, title, ..
        } => MdNode::Link {
            url: dest_url.to_string(),
            title: non_empty(title.to_string()),
            children: Vec::new(),
            jsdoc: false,
        },
        Tag::Image {
            dest_url, title, ..
        } => MdNode::Image {
            url: dest_url.to_string(),
            title: non_empty(title.to_string()),
            alt: None,
        },
        // With only strikethrough and tables enabled, block quotes are all
        // that is left.
        _ => MdNode::Blockquote {
            children: Vec::new(),
        },
    }
}

fn close_node(node: MdNode) -> MdNode {
    match node {
        MdNode::Code { lang, mut value } => {
            if value.ends_with('\n') {
                value.pop();
            }
            MdNode::Code { lang, value }
        }
        other => other,
    }
}

fn append(stack: &mut [MdNode], node: MdNode) {
    if let Some(children) = stack.last_mut().and_then(MdNode::children_mut) {
        children.push(node);
    }
}

fn alignment_name(alignment: &Alignment) -> Option<String> {
    match alignment {
        Alignment::None => None,
        Alignment::Left => Some("left".to_string()),
        Alignment::Center => Some("center".to_string()),
        Alignment::Right => Some("right".to_string()),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
