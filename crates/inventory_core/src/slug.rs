//! Slug normalization for human-entered names.
//!
//! # Responsibility
//! - Turn free text into lowercase, hyphen-separated identifiers.
//!
//! # Invariants
//! - Output only contains `[a-z0-9-]`.
//! - Output never starts or ends with `-` and never contains `--`.
//! - `slugify(slugify(x)) == slugify(x)`.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug separator regex"));

/// Normalizes a name into its slug form.
///
/// Returns an empty string when the input holds no ASCII letters or digits;
/// callers that need a key must reject that case.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let replaced = NON_SLUG_RE.replace_all(&lowered, "-");
    replaced.trim_matches('-').to_string()
}

/// Returns the slug of `name`, or `None` when it would be empty.
pub fn try_slugify(name: &str) -> Option<String> {
    let slug = slugify(name);
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::{slugify, try_slugify};

    #[test]
    fn slugify_lowercases_and_hyphenates_words() {
        assert_eq!(slugify("New Domain"), "new-domain");
        assert_eq!(slugify("Updated tag name"), "updated-tag-name");
        assert_eq!(slugify("Building Number"), "building-number");
    }

    #[test]
    fn slugify_collapses_separator_runs_and_trims_edges() {
        assert_eq!(slugify("  Building  Number "), "building-number");
        assert_eq!(slugify("--Server__Room #1--"), "server-room-1");
    }

    #[test]
    fn slugify_is_idempotent() {
        let once = slugify("Experimental Facility (B-34)");
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn try_slugify_rejects_names_without_alphanumerics() {
        assert_eq!(try_slugify("   "), None);
        assert_eq!(try_slugify("!!!"), None);
        assert_eq!(try_slugify("tag a").as_deref(), Some("tag-a"));
    }
}
