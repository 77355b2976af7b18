//! Flat-key naming for schema leaves.
//!
//! A leaf's store key (its *tag*) is the root key joined with the chain
//! of field names from the structure root to the leaf, separated by `.`.
//! A nullable leaf additionally owns a boolean marker key at `<tag>?`.
//! Both functions are pure; two distinct leaf positions in a schema never
//! produce the same tag under the same root because field names are
//! validated at schema-build time (see [`Schema::builder`]).
//!
//! [`Schema::builder`]: crate::Schema::builder

/// Separator joining path segments in a flat key.
pub const SEPARATOR: char = '.';

/// Suffix distinguishing a null-marker key from its value key.
pub const MARKER_SUFFIX: char = '?';

/// Compose a child segment onto a parent path.
///
/// An empty parent yields the child alone, so the root of a traversal
/// composes cleanly.
pub fn compose(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        let mut tag = String::with_capacity(parent.len() + 1 + child.len());
        tag.push_str(parent);
        tag.push(SEPARATOR);
        tag.push_str(child);
        tag
    }
}

/// The null-marker companion key for a value key.
pub fn marker(tag: &str) -> String {
    let mut key = String::with_capacity(tag.len() + 1);
    key.push_str(tag);
    key.push(MARKER_SUFFIX);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_joins_with_separator() {
        assert_eq!(compose("cfg", "a"), "cfg.a");
    }

    #[test]
    fn compose_with_empty_parent() {
        assert_eq!(compose("", "a"), "a");
    }

    #[test]
    fn compose_chains_deterministically() {
        let inner = compose("root", "child");
        assert_eq!(compose(&inner, "leaf"), "root.child.leaf");
        // Same inputs, same output.
        assert_eq!(compose(&compose("root", "child"), "leaf"), "root.child.leaf");
    }

    #[test]
    fn distinct_positions_produce_distinct_tags() {
        assert_ne!(compose("cfg", "a"), compose("cfg", "b"));
        assert_ne!(compose("cfg", "a"), compose("other", "a"));
    }

    #[test]
    fn marker_appends_suffix() {
        assert_eq!(marker("cfg.b"), "cfg.b?");
    }
}
