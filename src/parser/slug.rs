// file: src/parser/slug.rs
// description: URL/DOM-safe identifiers derived from heading text
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ASCII word characters only, matching the ids the rendered viewer emits
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_\s-]")
        .expect("NON_SLUG_CHARS regex is valid");

    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+")
        .expect("WHITESPACE_RUN regex is valid");
}

/// Lowercase, drop everything but word characters, whitespace and hyphens,
/// turn whitespace runs into single hyphens, then trim hyphens at both ends.
///
/// Identical titles produce identical slugs; callers that need unique ids
/// must disambiguate themselves.
pub fn generate_slug(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUN.replace_all(&stripped, "-");
    hyphenated.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_endpoint_title() {
        assert_eq!(generate_slug("GET /api/users/{id}"), "get-apiusersid");
    }

    #[test]
    fn test_plain_titles() {
        assert_eq!(generate_slug("Getting Started"), "getting-started");
        assert_eq!(generate_slug("  Rate   limits  "), "rate-limits");
        assert_eq!(generate_slug("snake_case_field"), "snake_case_field");
    }

    #[test]
    fn test_hyphens_are_kept_inside_but_trimmed_outside() {
        assert_eq!(generate_slug("-- Errors --"), "errors");
        assert_eq!(generate_slug("a - b"), "a---b");
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(generate_slug(""), "");
        assert_eq!(generate_slug("!!!"), "");
        assert_eq!(generate_slug("Über"), "ber");
    }

    proptest! {
        #[test]
        fn slug_uses_only_word_chars_and_hyphens(title in "\\PC{0,40}") {
            let slug = generate_slug(&title);
            prop_assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
        }

        #[test]
        fn slug_is_deterministic(title in "\\PC{0,40}") {
            prop_assert_eq!(generate_slug(&title), generate_slug(&title));
        }
    }
}
