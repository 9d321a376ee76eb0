// src/checker/markdown.rs
// =============================================================================
// This module extracts links and headers from Markdown text.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Never reports links inside code blocks (they are plain text there)
//
// Because of that last point, "allow code blocks" means the opposite of
// stripping: when it is on we additionally scan code block text for
// markdown link syntax with a regex.
// =============================================================================

use pulldown_cmark::{Event, LinkType, Parser, Tag};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use super::link::Link;

// [text](target) or [text](<target>)
const MARKDOWN_LINK_PATTERN: &str = r"\[[^\]]*\]\(<?([^)<>\s]+)>?\)";

fn markdown_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The pattern is a constant, so a failure here is a programmer error
    RE.get_or_init(|| Regex::new(MARKDOWN_LINK_PATTERN).expect("valid link pattern"))
}

/// Extracts all checkable links from a document, in order of appearance.
///
/// Parameters:
///   markdown: the document text
///   dir: directory of the document, for resolving relative targets
///   base_path: root for targets starting with `/`
///   allow_code_blocks: also pick up links written inside code blocks
pub fn extract_links(
    markdown: &str,
    dir: &str,
    base_path: &Path,
    allow_code_blocks: bool,
) -> Vec<Link> {
    let mut links = Vec::new();
    let mut in_code_block = false;

    for event in Parser::new(markdown) {
        match event {
            // Email autolinks (<me@example.com>) carry no scheme in dest_url
            Event::Start(Tag::Link(LinkType::Email, ..)) => {}

            Event::Start(Tag::Link(_link_type, dest_url, _title))
            | Event::Start(Tag::Image(_link_type, dest_url, _title)) => {
                if let Some(link) = Link::classify(&dest_url, dir, base_path) {
                    links.push(link);
                }
            }

            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(Tag::CodeBlock(_)) => in_code_block = false,

            Event::Text(text) if in_code_block && allow_code_blocks => {
                for caps in markdown_link_regex().captures_iter(&text) {
                    if let Some(link) = caps
                        .get(1)
                        .and_then(|m| Link::classify(m.as_str(), dir, base_path))
                    {
                        links.push(link);
                    }
                }
            }

            _ => {}
        }
    }

    links
}

/// Extracts header texts in declaration order.
///
/// The text of a heading is its plain text plus inline code, with markup
/// removed: `## Header with [link](x)` gives "Header with link".
pub fn extract_headers(markdown: &str) -> Vec<String> {
    let mut headers = Vec::new();
    let mut current: Option<String> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading(..)) => current = Some(String::new()),
            Event::End(Tag::Heading(..)) => {
                if let Some(text) = current.take() {
                    headers.push(text.trim().to_string());
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(header) = current.as_mut() {
                    header.push_str(&text);
                }
            }
            _ => {}
        }
    }

    headers
}
