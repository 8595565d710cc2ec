//! Slug derivation for blog keys

use regex::Regex;
use std::sync::OnceLock;

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9\s]+").expect("valid slug pattern"))
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Turn a blog title into its storage key.
///
/// Lowercases, drops everything but ASCII letters, digits and whitespace,
/// collapses whitespace runs and joins the words with `-`.
/// A title with no usable characters yields an empty slug.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = non_alphanumeric().replace_all(&lowered, "");
    let collapsed = whitespace_run().replace_all(&stripped, " ");
    collapsed.trim().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Rust   is\tGreat!  "), "rust-is-great");
        assert_eq!(slugify("What's new in 2024?"), "whats-new-in-2024");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Café au lait"), "caf-au-lait");
    }

    #[test]
    fn test_slugify_empty_when_nothing_usable() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
    }

    proptest! {
        #[test]
        fn prop_slug_charset(title in ".{0,64}") {
            let slug = slugify(&title);
            prop_assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn prop_slugify_idempotent(title in "[A-Za-z0-9 ]{0,40}") {
            let once = slugify(&title);
            prop_assert_eq!(slugify(&once.replace('-', " ")), once.clone());
        }
    }
}
