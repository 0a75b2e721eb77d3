//! Markdown rendering with GFM extensions and syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd,
};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;

lazy_static! {
    /// Bare URLs turned into links (GFM extended autolinks)
    static ref BARE_URL: Regex = Regex::new(r#"(?:https?://|www\.)[^\s<>"']+"#).unwrap();
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            highlight: config.enable,
            line_numbers: config.line_number,
        }
    }

    /// Render markdown to HTML.
    ///
    /// Raw HTML in the source is passed through untouched; callers that
    /// embed the output in a page must sanitize it.
    pub fn render(&self, markdown: &str) -> String {
        // Front-matter is stripped before rendering, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;
        // Inside a link or image, where bare URLs must stay text
        let mut link_depth = 0usize;
        // Adjacent text events are joined so URLs split by the parser link whole
        let mut pending_text = String::new();

        for event in parser {
            if code_block.is_some() {
                match event {
                    Event::Text(text) => {
                        if let Some((_, code)) = code_block.as_mut() {
                            code.push_str(&text);
                        }
                    }
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some((lang, code)) = code_block.take() {
                            let block = self.render_code_block(&code, lang.as_deref());
                            events.push(Event::Html(CowStr::from(block)));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            if let Event::Text(text) = &event {
                pending_text.push_str(text);
                continue;
            }
            flush_text(&mut pending_text, link_depth > 0, &mut events);

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|l| l.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => {
                    link_depth += 1;
                    events.push(event);
                }
                Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                    link_depth = link_depth.saturating_sub(1);
                    events.push(event);
                }
                _ => events.push(event),
            }
        }
        flush_text(&mut pending_text, link_depth > 0, &mut events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    fn render_code_block(&self, code: &str, lang: Option<&str>) -> String {
        if self.highlight {
            if let Some(html) = self.highlight_code(code, lang) {
                return html;
            }
        }
        let class = lang
            .map(|l| format!(r#" class="language-{}""#, html_escape(l)))
            .unwrap_or_default();
        format!("<pre><code{}>{}</code></pre>\n", class, html_escape(code))
    }

    /// Highlight a code block; `None` when highlighting is unavailable
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> Option<String> {
        let lang = lang.unwrap_or("text");

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())?;

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => {
                let lang = html_escape(lang);
                if self.line_numbers {
                    Some(add_line_numbers(&highlighted, &lang))
                } else {
                    Some(format!(
                        r#"<figure class="highlight {}">{}</figure>"#,
                        lang, highlighted
                    ))
                }
            }
            Err(e) => {
                tracing::debug!("Highlighting failed for {}: {}", lang, e);
                None
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Emit buffered text, linking bare URLs unless already inside a link
fn flush_text(pending: &mut String, in_link: bool, events: &mut Vec<Event<'_>>) {
    if pending.is_empty() {
        return;
    }
    let text = std::mem::take(pending);
    if in_link {
        events.push(Event::Text(CowStr::from(text)));
        return;
    }

    let mut last = 0;
    for m in BARE_URL.find_iter(&text) {
        let url = trim_url(m.as_str());
        if url.is_empty() || url == "www." {
            continue;
        }
        let start = m.start();
        let end = start + url.len();
        if start > last {
            events.push(Event::Text(CowStr::from(text[last..start].to_string())));
        }
        let dest = if url.starts_with("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(dest),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        events.push(Event::Text(CowStr::from(url.to_string())));
        events.push(Event::End(TagEnd::Link));
        last = end;
    }
    if last < text.len() {
        events.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// Drop trailing punctuation and unbalanced closing parentheses
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        let Some(last) = url.chars().last() else {
            return url;
        };
        let trimmed = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '*' | '_' | '~' => true,
            ')' => url.matches(')').count() > url.matches('(').count(),
            _ => false,
        };
        if !trimmed {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}

/// Add line numbers to highlighted code
fn add_line_numbers(code: &str, lang: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();

    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");
    let code_lines = lines.join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang, gutter, code_lines
    )
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
