//! Markup rendering
//!
//! Turns post teasers and content into HTML. Markdown is parsed with
//! pulldown-cmark; fenced code blocks naming a language syntect knows are
//! highlighted, all other code blocks are emitted escaped.
//!
//! ```
//! use quire::models::Markup;
//! use quire::services::markup::MarkupRenderer;
//!
//! let renderer = MarkupRenderer::new();
//! let html = renderer.render(Markup::Markdown, "Only his **dog** knows");
//! assert!(html.contains("<strong>dog</strong>"));
//! ```

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use std::sync::Arc;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::models::Markup;

const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Thread-safe renderer. Loading syntect's definitions is costly, so build
/// one and share it.
#[derive(Clone)]
pub struct MarkupRenderer {
    syntax_set: Arc<SyntaxSet>,
    theme_set: Arc<ThemeSet>,
    theme_name: String,
}

impl Default for MarkupRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupRenderer {
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Unknown theme names fall back to `base16-ocean.dark`.
    pub fn with_theme(theme_name: &str) -> Self {
        let theme_set = ThemeSet::load_defaults();
        let theme_name = if theme_set.themes.contains_key(theme_name) {
            theme_name
        } else {
            DEFAULT_THEME
        };

        Self {
            syntax_set: Arc::new(SyntaxSet::load_defaults_newlines()),
            theme_set: Arc::new(theme_set),
            theme_name: theme_name.to_string(),
        }
    }

    pub fn render(&self, markup: Markup, text: &str) -> String {
        match markup {
            Markup::Markdown => self.render_markdown(text),
        }
    }

    fn render_markdown(&self, text: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let events = self.highlight_code_blocks(Parser::new_ext(text, options));

        let mut output = String::new();
        html::push_html(&mut output, events.into_iter());
        output
    }

    fn highlight_code_blocks<'a>(&self, parser: Parser<'a>) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        // Some(lang) while inside a code block; lang is empty when none was given.
        let mut code_block: Option<String> = None;
        let mut code = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code.clear();
                    code_block = Some(match kind {
                        CodeBlockKind::Fenced(lang) => lang.trim().to_string(),
                        CodeBlockKind::Indented => String::new(),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block.take().unwrap_or_default();
                    events.push(Event::Html(self.code_block(&code, &lang).into()));
                }
                Event::Text(text) if code_block.is_some() => code.push_str(&text),
                other => events.push(other),
            }
        }

        events
    }

    fn code_block(&self, code: &str, lang: &str) -> String {
        if lang.is_empty() {
            return format!("<pre><code>{}</code></pre>", html_escape(code));
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang));

        let highlighted = syntax.and_then(|syntax| {
            let theme = self.theme_set.themes.get(&self.theme_name)?;
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        highlighted.unwrap_or_else(|| {
            format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                html_escape(lang),
                html_escape(code)
            )
        })
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
