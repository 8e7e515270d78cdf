//! Slug generation

use unicode_normalization::UnicodeNormalization;

use crate::models::SLUG_MAX_LENGTH;

/// Turn a title into a URL slug.
///
/// Decomposes accented letters (NFKD) so `é` becomes `e`, lowercases,
/// drops what is still non-ASCII and punctuation other than `_`
/// and `-`, collapses runs of whitespace and hyphens into one hyphen and
/// trims hyphens and underscores from both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.nfkd().filter(char::is_ascii) {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else if c == '-' || c.is_ascii_whitespace() {
            pending_hyphen = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// [`slugify`] cut down to the slug column length.
pub fn slug_for_title(title: &str) -> String {
    let slug = slugify(title);
    // ASCII only, so byte and char lengths agree.
    let truncated = &slug[..slug.len().min(SLUG_MAX_LENGTH)];
    truncated.trim_end_matches('-').to_string()
}
