//! Syntax highlighting for code examples.

use once_cell::sync::Lazy;
use serde::Deserialize;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::format::escape_html;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// Highlighter settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HighlightConfig {
    /// Detect the language from the code itself
    #[serde(default)]
    pub auto: bool,

    /// Language used when detection is off
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "js".to_string()
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            auto: false,
            language: default_language(),
        }
    }
}

/// Class-based HTML highlighter backed by syntect's default syntaxes.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    config: HighlightConfig,
}

impl Highlighter {
    pub fn new(config: HighlightConfig) -> Self {
        Self { config }
    }

    /// Highlight `code` with the configured or detected language.
    pub fn highlight(&self, code: &str) -> String {
        self.highlight_with(code, None)
    }

    /// Highlight `code`, preferring an explicit language hint when known.
    pub fn highlight_with(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = lang
            .and_then(|l| SYNTAX_SET.find_syntax_by_token(l))
            .unwrap_or_else(|| self.syntax_for(code));

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);

        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::warn!("Highlighting failed, emitting plain text: {}", e);
                return escape_html(code);
            }
        }

        generator.finalize()
    }

    fn syntax_for(&self, code: &str) -> &'static SyntaxReference {
        let set: &'static SyntaxSet = &SYNTAX_SET;
        // Detection only recognizes shebangs and modelines; anything else
        // uses the configured language.
        let detected = if self.config.auto {
            set.find_syntax_by_first_line(code)
        } else {
            None
        };
        detected
            .or_else(|| set.find_syntax_by_token(&self.config.language))
            .unwrap_or_else(|| set.find_syntax_plain_text())
    }
}
