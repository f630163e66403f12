//! Template composition for documentation pages.
//!
//! The page is assembled from five fragments that include each other by
//! name: the page renders a list of sections, each section renders nested
//! section lists for its members, and parameter-property rows recurse into
//! their own properties. All fragments share one [`RenderContext`] through the
//! helper functions registered on the environment.

use std::path::Path;
use std::sync::Arc;

use docket_model::{validate, DocumentationSection, MdNode, TypeExpr};
use minijinja::value::{Value, ViaDeserialize};
use minijinja::{context, Environment};

use crate::builder::BuildError;
use crate::context::RenderContext;
use crate::highlight::{HighlightConfig, Highlighter};

pub const PAGE: &str = "page.html";
pub const SECTION_LIST: &str = "section_list.html";
pub const SECTION: &str = "section.html";
pub const NOTE: &str = "note.html";
pub const PARAM_PROPERTY: &str = "param_property.html";

/// Site-wide values exposed to templates as `config`.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SiteContext {
    /// Site title
    pub title: String,
    /// Version being built, without the `v` prefix
    pub version: String,
    /// Every known version file, current one included
    pub versions: Vec<String>,
}

/// Loads the page fragments and renders documentation with them.
#[derive(Debug, Clone)]
pub struct TemplateComposer {
    fragments: Vec<(&'static str, String)>,
    highlight: HighlightConfig,
}

impl TemplateComposer {
    /// Composer with the built-in fragments.
    pub fn new() -> Self {
        Self {
            fragments: vec![
                (PAGE, PAGE_TEMPLATE.to_string()),
                (SECTION_LIST, SECTION_LIST_TEMPLATE.to_string()),
                (SECTION, SECTION_TEMPLATE.to_string()),
                (NOTE, NOTE_TEMPLATE.to_string()),
                (PARAM_PROPERTY, PARAM_PROPERTY_TEMPLATE.to_string()),
            ],
            highlight: HighlightConfig::default(),
        }
    }

    /// Set the highlighter configuration used for examples and code blocks.
    pub fn with_highlight(mut self, highlight: HighlightConfig) -> Self {
        self.highlight = highlight;
        self
    }

    /// Replace built-in fragments with any found in `<theme>/templates/`.
    pub async fn with_theme(mut self, theme_dir: &Path) -> Result<Self, BuildError> {
        let templates_dir = theme_dir.join("templates");

        for (name, source) in &mut self.fragments {
            let path = templates_dir.join(*name);
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                continue;
            }

            *source = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;
            tracing::debug!("Using theme template {}", path.display());
        }

        Ok(self)
    }

    /// Check that every fragment parses.
    pub fn check(&self) -> Result<(), BuildError> {
        let ctx = Arc::new(RenderContext::new(&[], Highlighter::default()));
        self.environment(ctx).map(|_| ())
    }

    /// Render the full page for `sections`.
    pub fn render(
        &self,
        sections: &[DocumentationSection],
        site: &SiteContext,
    ) -> Result<String, BuildError> {
        validate(sections).map_err(|e| BuildError::InvalidSection(e.to_string()))?;

        let ctx = Arc::new(RenderContext::new(
            sections,
            Highlighter::new(self.highlight.clone()),
        ));
        let env = self.environment(ctx)?;

        let tmpl = env.get_template(PAGE).map_err(template_error)?;

        tmpl.render(context! {
            docs => sections,
            config => site,
        })
        .map_err(template_error)
    }

    /// Build an environment whose helpers are all registered before any
    /// fragment is compiled or evaluated.
    fn environment(&self, ctx: Arc<RenderContext>) -> Result<Environment<'static>, BuildError> {
        let mut env = Environment::new();
        register_helpers(&mut env, ctx);

        for (name, source) in &self.fragments {
            env.add_template_owned(name.to_string(), source.clone())
                .map_err(template_error)?;
        }

        Ok(env)
    }
}

impl Default for TemplateComposer {
    fn default() -> Self {
        Self::new()
    }
}

fn template_error(e: minijinja::Error) -> BuildError {
    BuildError::TemplateError(e.to_string())
}

fn register_helpers(env: &mut Environment<'static>, ctx: Arc<RenderContext>) {
    let c = ctx.clone();
    env.add_function("slug", move |name: &str| c.slug(name));

    let c = ctx.clone();
    env.add_function(
        "short_signature",
        move |section: ViaDeserialize<DocumentationSection>| {
            Value::from_safe_string(c.short_signature(&section))
        },
    );

    let c = ctx.clone();
    env.add_function(
        "signature",
        move |section: ViaDeserialize<DocumentationSection>| {
            Value::from_safe_string(c.signature(&section))
        },
    );

    let c = ctx.clone();
    env.add_function(
        "md",
        move |node: Option<ViaDeserialize<MdNode>>, inline: Option<bool>| match node {
            Some(node) => Value::from_safe_string(c.markdown(&node, inline.unwrap_or(false))),
            None => Value::from_safe_string(String::new()),
        },
    );

    let c = ctx.clone();
    env.add_function(
        "format_type",
        move |ty: Option<ViaDeserialize<TypeExpr>>| {
            Value::from_safe_string(c.format_type(ty.as_deref()))
        },
    );

    let c = ctx.clone();
    env.add_function("autolink", move |text: &str| {
        Value::from_safe_string(c.autolink(text))
    });

    let c = ctx;
    env.add_function("highlight", move |code: &str| {
        Value::from_safe_string(c.highlight(code))
    });
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ config.title }} v{{ config.version }}</title>
  <link rel="stylesheet" href="assets/style.css">
</head>
<body>
  <div class="layout">
    <nav class="sidebar">
      <div class="nav-header">
        <a href="index.html" class="nav-logo">{{ config.title }}</a>
        <div class="version-switcher">
          <span class="current-version">v{{ config.version }}</span>
          <ul id="versions" class="version-list">
          {% for v in config.versions %}<li><a href="{{ v }}">{{ v }}</a></li>
          {% endfor %}</ul>
        </div>
      </div>
      <ul class="nav-list">
      {% for doc in docs %}
        <li class="nav-item{% if doc.kind == "note" %} nav-note{% endif %}">
          <a href="#{{ slug(doc.namespace or doc.name) }}">{{ doc.name }}</a>
        </li>
      {% endfor %}
      </ul>
    </nav>
    <main class="main">
    {% for doc in docs %}
      {% if doc.kind == "note" %}
        {% with section = doc %}{% include "note.html" %}{% endwith %}
      {% else %}
        {% with section = doc, nested = false %}{% include "section.html" %}{% endwith %}
      {% endif %}
    {% endfor %}
    </main>
  </div>
  <script src="assets/rctf_versions.js"></script>
  <script src="assets/site.js"></script>
</body>
</html>
"##;

const SECTION_LIST_TEMPLATE: &str = r##"<div class="section-list">
{% for member in members %}
  <details class="member" id="{{ slug(member.namespace or member.name) }}-details">
    <summary><code>{{ short_signature(member) }}</code></summary>
    {% with section = member, nested = true %}{% include "section.html" %}{% endwith %}
  </details>
{% endfor %}
</div>
"##;

const SECTION_TEMPLATE: &str = r##"<section class="section{% if nested %} nested{% endif %}" id="{{ slug(section.namespace or section.name) }}">
  <header class="section-header">
    <h3 class="section-title">{{ section.name }}</h3>
    {% if section.since %}<span class="since">since {{ section.since }}</span>{% endif %}
  </header>
  {% if section.deprecated %}<div class="deprecated"><strong>Deprecated:</strong> {{ md(section.deprecated, true) }}</div>{% endif %}
  {{ md(section.description) }}
  <div class="signature"><code>{{ signature(section) }}</code></div>
  {% if section.type %}<p class="type">Type: {{ format_type(section.type) }}</p>{% endif %}
  {% if section.augments %}<p class="augments">Extends {% for parent in section.augments %}{{ autolink(parent.name) }}{% if not loop.last %}, {% endif %}{% endfor %}</p>{% endif %}
  {% if section.params %}
  <h4>Parameters</h4>
  <table class="params">
  {% for param in section.params %}
    <tr>
      <td><code>{{ param.name }}</code></td>
      <td>{{ format_type(param.type) }}</td>
      <td>{% if param.default %}(default <code>{{ param.default }}</code>) {% endif %}{{ md(param.description, true) }}</td>
    </tr>
    {% for property in param.properties %}{% include "param_property.html" %}{% endfor %}
  {% endfor %}
  </table>
  {% endif %}
  {% if section.properties %}
  <h4>Properties</h4>
  <table class="params">
  {% for property in section.properties %}{% include "param_property.html" %}{% endfor %}
  </table>
  {% endif %}
  {% for ret in section.returns %}
  <p class="returns">Returns {{ format_type(ret.type) }}{% if ret.description %}: {{ md(ret.description, true) }}{% endif %}</p>
  {% endfor %}
  {% for err in section.throws %}
  <p class="throws">Throws {{ format_type(err.type) }}{% if err.description %}: {{ md(err.description, true) }}{% endif %}</p>
  {% endfor %}
  {% if section.examples %}
  <h4>Examples</h4>
  {% for example in section.examples %}
    {% if example.caption %}<p class="caption">{{ md(example.caption, true) }}</p>{% endif %}
    <pre class="highlight"><code>{{ highlight(example.description) }}</code></pre>
  {% endfor %}
  {% endif %}
  {% for group, label in [["static", "Static Members"], ["instance", "Instance Members"], ["events", "Events"], ["inner", "Inner Members"], ["global", "Global Members"]] %}
    {% if section.members[group] %}
    <div class="members">
      <h4>{{ label }}</h4>
      {% with members = section.members[group] %}{% include "section_list.html" %}{% endwith %}
    </div>
    {% endif %}
  {% endfor %}
</section>
"##;

const NOTE_TEMPLATE: &str = r##"<section class="note" id="{{ slug(section.namespace or section.name) }}">
  <h2>{{ section.name }}</h2>
  {{ md(section.description) }}
</section>
"##;

const PARAM_PROPERTY_TEMPLATE: &str = r##"<tr class="param-property">
  <td><code>{{ property.name }}</code></td>
  <td>{{ format_type(property.type) }}</td>
  <td>{% if property.default %}(default <code>{{ property.default }}</code>) {% endif %}{{ md(property.description, true) }}</td>
</tr>
{% for child in property.properties %}{% with property = child %}{% include "param_property.html" %}{% endwith %}{% endfor %}
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use docket_model::{describe, Param, Returns, SectionKind};
    use tempfile::tempdir;

    fn site() -> SiteContext {
        SiteContext {
            title: "Widgets".to_string(),
            version: "1.2.3".to_string(),
            versions: vec!["v1.0.0.html".to_string(), "v1.2.3.html".to_string()],
        }
    }

    fn widget_docs() -> Vec<DocumentationSection> {
        let mut class = DocumentationSection::new(SectionKind::Class, "Widget");
        class.description = describe("A **visual** widget.");
        class.params.push(Param::new("id", Some(TypeExpr::name("string"))));

        let mut render = DocumentationSection::new(SectionKind::Function, "render");
        render.namespace = Some("Widget#render".to_string());
        let mut options = Param::new(
            "options",
            Some(TypeExpr::OptionalType {
                expression: Box::new(TypeExpr::name("Object")),
            }),
        );
        let mut force = Param::new("options.force", Some(TypeExpr::name("boolean")));
        force.properties.push(Param::new("options.force.deep", None));
        options.properties.push(force);
        render.params.push(options);
        render.returns.push(Returns {
            ty: Some(TypeExpr::name("Widget")),
            description: describe("the same widget"),
        });
        class.members.instance.push(render);

        let mut note = DocumentationSection::new(SectionKind::Note, "Getting started");
        note.description = describe("Install the package first.");

        vec![note, class]
    }

    #[test]
    fn renders_full_page() {
        let html = TemplateComposer::new().render(&widget_docs(), &site()).unwrap();

        assert!(html.contains("<title>Widgets v1.2.3</title>"));
        assert!(html.contains("<section class=\"note\" id=\"getting-started\">"));
        assert!(html.contains("id=\"widget\""));
        assert!(html.contains("new Widget(id: string)"));
        assert!(html.contains("<strong>visual</strong>"));
        assert!(html.contains("<a href=\"v1.0.0.html\">v1.0.0.html</a>"));
        assert!(html.contains("assets/rctf_versions.js"));
    }

    #[test]
    fn renders_nested_members_and_properties() {
        let html = TemplateComposer::new().render(&widget_docs(), &site()).unwrap();

        // Member list with short signature, then the nested section itself.
        assert!(html.contains("<code>render(options?)</code>"));
        assert!(html.contains("id=\"widgetrender\""));
        assert!(html.contains("Instance Members"));
        // Return type links back to the class; inline markdown has no <p>.
        assert!(html.contains("Returns <a href=\"#widget\">Widget</a>: the same widget</p>"));
        // Property rows recurse.
        assert!(html.contains("<code>options.force</code>"));
        assert!(html.contains("<code>options.force.deep</code>"));
    }

    #[test]
    fn member_name_types_do_not_link_to_missing_anchors() {
        let mut docs = widget_docs();
        let mut mount = DocumentationSection::new(SectionKind::Function, "mount");
        mount
            .params
            .push(Param::new("hook", Some(TypeExpr::name("render"))));
        docs.push(mount);

        let html = TemplateComposer::new().render(&docs, &site()).unwrap();

        assert!(html.contains("id=\"widgetrender\""));
        assert!(!html.contains("href=\"#render\""));
        assert!(html.contains("mount(hook: render)"));
    }

    #[test]
    fn reference_text_survives_in_descriptions() {
        let mut docs = widget_docs();
        docs[0].description = Some(MdNode::Root {
            children: vec![MdNode::Paragraph {
                children: vec![
                    MdNode::text("See "),
                    MdNode::LinkReference {
                        children: vec![MdNode::text("FooGuide")],
                    },
                ],
            }],
        });

        let html = TemplateComposer::new().render(&docs, &site()).unwrap();

        assert!(html.contains("<p>See FooGuide</p>"));
    }

    #[test]
    fn nav_anchors_match_section_ids() {
        let html = TemplateComposer::new().render(&widget_docs(), &site()).unwrap();

        assert!(html.contains("href=\"#widget\""));
        assert!(!html.contains("widget-1"));
    }

    #[tokio::test]
    async fn rejects_malformed_theme_template() {
        let temp = tempdir().unwrap();
        let templates = temp.path().join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(templates.join(NOTE), "{% if section.name %}unclosed").unwrap();

        let composer = TemplateComposer::new().with_theme(temp.path()).await.unwrap();

        assert!(matches!(composer.check(), Err(BuildError::TemplateError(_))));
        assert!(matches!(
            composer.render(&widget_docs(), &site()),
            Err(BuildError::TemplateError(_))
        ));
    }

    #[tokio::test]
    async fn theme_templates_override_builtins() {
        let temp = tempdir().unwrap();
        let templates = temp.path().join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(
            templates.join(NOTE),
            "<aside class=\"custom-note\">{{ section.name }}</aside>",
        )
        .unwrap();

        let composer = TemplateComposer::new().with_theme(temp.path()).await.unwrap();
        let html = composer.render(&widget_docs(), &site()).unwrap();

        assert!(html.contains("<aside class=\"custom-note\">Getting started</aside>"));
    }

    #[test]
    fn unknown_helper_is_a_template_error() {
        let mut composer = TemplateComposer::new();
        composer.fragments[3].1 = "{{ no_such_helper(section) }}".to_string();

        let err = composer.render(&widget_docs(), &site()).unwrap_err();
        assert!(matches!(err, BuildError::TemplateError(_)));
    }

    #[test]
    fn rejects_sections_without_names() {
        let docs = vec![DocumentationSection::new(SectionKind::Function, "")];

        let err = TemplateComposer::new().render(&docs, &site()).unwrap_err();
        assert!(matches!(err, BuildError::InvalidSection(_)));
    }
}
