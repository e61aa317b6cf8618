//! Text helpers for post slugs and tracing span fields.

/// Maximum characters of user text copied into a span attribute.
pub const SPAN_TEXT_LIMIT: usize = 48;

/// Builds a URL slug: lowercase ASCII alphanumerics joined by single dashes.
///
/// - `"Hello, World!"` → `"hello-world"`
/// - `"  Rust & SSE -- 2024 "` → `"rust-sse-2024"`
/// - `"Über Café"` → `"ber-caf"`
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Shortens free text for span fields, appending `…` when cut.
pub fn span_text(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= SPAN_TEXT_LIMIT {
        return trimmed.to_string();
    }
    let mut short: String = trimmed.chars().take(SPAN_TEXT_LIMIT).collect();
    short.push('…');
    short
}
