// src/checker/html.rs
// =============================================================================
// This module collects anchor identifiers from fetched HTML pages.
//
// An anchor is anything a URL fragment can point at:
// - any element with an `id` attribute
// - legacy `<a name="...">` targets
//
// GitHub renders markdown headers as `id="user-content-<slug>"` and rewrites
// the fragment client-side, so the prefix-stripped form is also collected.
//
// We use the `scraper` crate (html5ever underneath) for parsing.
// =============================================================================

use scraper::{Html, Selector};

const GITHUB_ANCHOR_PREFIX: &str = "user-content-";

/// Returns every anchor id on the page, in document order, deduplicated.
pub fn extract_anchors(html: &str) -> Vec<String> {
    let mut anchors: Vec<String> = Vec::new();

    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("[id], a[name]") else {
        return anchors;
    };

    let mut push = |anchor: &str| {
        if !anchor.is_empty() && !anchors.iter().any(|a| a == anchor) {
            anchors.push(anchor.to_string());
        }
    };

    for element in document.select(&selector) {
        let value = element.value();
        for anchor in [value.attr("id"), value.attr("name")].into_iter().flatten() {
            push(anchor);
            if let Some(stripped) = anchor.strip_prefix(GITHUB_ANCHOR_PREFIX) {
                push(stripped);
            }
        }
    }

    anchors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_and_names() {
        let html = r#"
            <h2 id="section-one">One</h2>
            <div><h2 id="section-two">Two</h2></div>
            <a name="legacy">old</a>
            <p>no anchor</p>
        "#;
        assert_eq!(
            extract_anchors(html),
            vec!["section-one", "section-two", "legacy"]
        );
    }

    #[test]
    fn test_github_user_content_alias() {
        let html = r##"<a id="user-content-install" href="#install"></a>"##;
        assert_eq!(extract_anchors(html), vec!["user-content-install", "install"]);
    }

    #[test]
    fn test_duplicates_and_empty_ids_are_dropped() {
        let html = r#"<p id="x"></p><p id="x"></p><p id=""></p>"#;
        assert_eq!(extract_anchors(html), vec!["x"]);
    }
}
