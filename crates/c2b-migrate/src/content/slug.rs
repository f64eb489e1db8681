/// Convert a title into a BookStack-style slug.
///
/// ASCII letters and digits are kept (lowercased); every other run of
/// characters becomes a single `-`, with none at either end.
pub(crate) fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("  API: v2 / Overview!  "), "api-v2-overview");
        assert_eq!(slugify("Page A.1"), "page-a-1");
    }

    #[test]
    fn test_slugify_non_ascii_collapses() {
        assert_eq!(slugify("Café über"), "caf-ber");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify(""), "");
    }
}
