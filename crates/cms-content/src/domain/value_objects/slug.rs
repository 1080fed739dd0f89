//! Slug helpers

use std::sync::LazyLock;

use regex::Regex;

/// Longest slug accepted on commands
pub const MAX_SLUG_LEN: usize = 100;

// Applied after lowercasing; letters outside ASCII are dropped.
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_\s-]").unwrap());
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_-]+").unwrap());
static SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// Derive a URL-safe slug from free text.
///
/// Lowercases, drops anything that is not an ASCII letter, digit,
/// underscore, whitespace or hyphen, folds separator runs into a single `-` and strips `-` from both
/// ends. May return an empty string.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let cleaned = DISALLOWED.replace_all(lowered.trim(), "");
    let joined = SEPARATORS.replace_all(&cleaned, "-");
    joined.trim_matches('-').to_string()
}

/// `^[a-z0-9-]+$`, 1 to 100 characters
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.len() <= MAX_SLUG_LEN && SLUG_PATTERN.is_match(slug)
}

/// `base-n`
pub fn with_suffix(base: &str, n: u64) -> String {
    format!("{base}-{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Building Permit"), "building-permit");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("snake_case__title"), "snake-case-title");
        assert_eq!(slugify("--Leading and trailing--"), "leading-and-trailing");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_drops_non_ascii_letters() {
        let slug = slugify("Café Permit");
        assert_eq!(slug, "caf-permit");
        assert!(is_valid_slug(&slug));
        assert_eq!(slugify("Straße 42"), "strae-42");
        assert_eq!(slugify("Привет"), "");
        assert_eq!(slugify("naïve\u{a0}résumé"), "nave-rsum");
    }

    #[test]
    fn test_slug_validity() {
        assert!(is_valid_slug("permit-2024"));
        assert!(!is_valid_slug("Permit"));
        assert!(!is_valid_slug("has space"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug(&"a".repeat(101)));
        assert!(is_valid_slug(&"a".repeat(100)));
    }
}
