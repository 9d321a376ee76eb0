// src/checker/slug.rs
// Header text -> anchor id: lowercase, every space becomes a hyphen.
// Punctuation is left alone.

pub fn slugify(header: &str) -> String {
    header.to_lowercase().replace(' ', "-")
}

/// True when `fragment` (leading `#` optional) equals the slug of any header.
pub fn header_exists(fragment: &str, headers: &[String]) -> bool {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    headers.iter().any(|header| slugify(header) == fragment)
}
