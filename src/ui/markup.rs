//! Markdown conversion for bot replies: HTML for the document view, plain
//! text for terminals.

use std::fmt::Write as _;

use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};

/// Converts a lightweight markup string into HTML for the message list.
pub trait MarkupRenderer {
    fn to_html(&self, text: &str) -> String;
}

/// [`MarkupRenderer`] backed by `pulldown-cmark`.
///
/// Raw HTML in the source is escaped rather than passed through, and link
/// or image targets with a scheme other than http, https or mailto are
/// replaced by `#`.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        Self { options }
    }

    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupRenderer for MarkdownRenderer {
    fn to_html(&self, text: &str) -> String {
        let parser = Parser::new_ext(text, self.options).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Link {
                link_type,
                dest_url: neutralize_url(dest_url),
                title,
                id,
            }),
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Image {
                link_type,
                dest_url: neutralize_url(dest_url),
                title,
                id,
            }),
            other => other,
        });

        let mut output = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}

/// Relative targets and http(s)/mailto URLs pass; anything else becomes `#`.
fn neutralize_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) {
        url
    } else {
        CowStr::Borrowed("#")
    }
}

fn is_safe_url(url: &str) -> bool {
    let url = url.trim();
    let Some(colon) = url.find(':') else {
        return true;
    };
    let scheme = &url[..colon];
    if scheme.contains(['/', '?', '#']) {
        return true;
    }
    matches!(
        scheme.to_ascii_lowercase().as_str(),
        "http" | "https" | "mailto"
    )
}

/// Render Markdown as plain text for a terminal.
///
/// Emphasis markers are dropped, list items get bullets or numbers, links
/// are followed by their target, and table cells are joined with `|`.
pub fn markdown_to_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut links: Vec<(LinkType, String)> = Vec::new();

    for event in Parser::new_ext(text, MarkdownRenderer::new().options) {
        match event {
            Event::Start(Tag::Paragraph) if !lists.is_empty() => {}
            Event::Start(
                Tag::Paragraph
                | Tag::Heading { .. }
                | Tag::CodeBlock(_)
                | Tag::BlockQuote(_)
                | Tag::Table(_),
            ) => start_block(&mut out),
            Event::Start(Tag::List(first)) => {
                if lists.is_empty() {
                    start_block(&mut out);
                }
                lists.push(first);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
            }
            Event::Start(Tag::Item) => {
                start_line(&mut out);
                out.push_str(&"  ".repeat(lists.len().saturating_sub(1)));
                match lists.last_mut() {
                    Some(Some(number)) => {
                        let _ = write!(out, "{number}. ");
                        *number += 1;
                    }
                    _ => out.push_str("• "),
                }
            }
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                ..
            }) => links.push((link_type, dest_url.to_string())),
            Event::End(TagEnd::Link) => {
                if let Some((link_type, url)) = links.pop() {
                    let autolink = matches!(link_type, LinkType::Autolink | LinkType::Email);
                    if !autolink && !url.is_empty() {
                        let _ = write!(out, " ({url})");
                    }
                }
            }
            Event::Start(Tag::TableCell) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push_str(" | ");
                }
            }
            Event::End(TagEnd::TableHead | TagEnd::TableRow) => out.push('\n'),
            Event::Text(chunk)
            | Event::Code(chunk)
            | Event::Html(chunk)
            | Event::InlineHtml(chunk) => out.push_str(&chunk),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::Rule => {
                start_block(&mut out);
                out.push_str("───");
            }
            _ => {}
        }
    }

    out.trim_end().to_string()
}

fn start_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn start_block(out: &mut String) {
    start_line(out);
    if !out.is_empty() && !out.ends_with("\n\n") {
        out.push('\n');
    }
}

impl<F> MarkupRenderer for F
where
    F: Fn(&str) -> String,
{
    fn to_html(&self, text: &str) -> String {
        self(text)
    }
}

/// Escape text for use in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
