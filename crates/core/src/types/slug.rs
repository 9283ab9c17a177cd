//! URL slug generation for pages, products and categories.

/// Turn a human title into a URL slug.
///
/// Lowercases the input, collapses every run of characters outside
/// `[a-z0-9]` into a single `-`, and trims leading and trailing dashes.
///
/// ```
/// use elegance_core::slugify;
///
/// assert_eq!(slugify("Summer Sale 2026!"), "summer-sale-2026");
/// ```
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug
}
