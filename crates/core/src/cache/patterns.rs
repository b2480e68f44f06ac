//! Glob matching for cache keys.
//!
//! `*` matches any run of characters, including none. There are no other
//! metacharacters.

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use gigdash_core::cache::pattern_matches;
///
/// assert!(pattern_matches("dashboard:user:7", "dashboard:user:7"));
/// assert!(pattern_matches("dashboard:user:*", "dashboard:user:7"));
/// assert!(pattern_matches("*:7", "pipeline:automation:7"));
/// assert!(!pattern_matches("*:7", "pipeline:automation:17"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let mut segments = pattern.split('*');

    // `split` always yields at least one segment.
    let head = segments.next().unwrap_or_default();
    let Some(mut rest) = key.strip_prefix(head) else {
        return false;
    };

    let tail: Vec<&str> = segments.collect();
    let Some((last, middle)) = tail.split_last() else {
        return rest.is_empty();
    };

    for segment in middle {
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern_needs_exact_key() {
        assert!(pattern_matches("dashboard:user:1", "dashboard:user:1"));
        assert!(!pattern_matches("dashboard:user:1", "dashboard:user:10"));
        assert!(!pattern_matches("dashboard:user:10", "dashboard:user:1"));
    }

    #[test]
    fn test_trailing_wildcard() {
        assert!(pattern_matches("dashboard:user:*", "dashboard:user:42"));
        assert!(pattern_matches("dashboard:user:*", "dashboard:user:"));
        assert!(!pattern_matches("dashboard:user:*", "pipeline:automation:42"));
    }

    #[test]
    fn test_leading_wildcard() {
        assert!(pattern_matches("*:42", "dashboard:user:42"));
        assert!(!pattern_matches("*:42", "dashboard:user:142"));
        assert!(!pattern_matches("*:42", "dashboard:user:421"));
    }

    #[test]
    fn test_inner_wildcards() {
        assert!(pattern_matches("pipeline:*:3", "pipeline:automation:3"));
        assert!(pattern_matches("*:user:*", "dashboard:user:3"));
        assert!(!pattern_matches("*:user:*", "pipeline:automation:3"));
        assert!(pattern_matches("a**b", "a-anything-b"));
    }

    #[test]
    fn test_prefix_and_suffix_cannot_overlap() {
        assert!(!pattern_matches("ab*ba", "aba"));
        assert!(pattern_matches("ab*ba", "abba"));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(pattern_matches("", ""));
        assert!(!pattern_matches("", "dashboard:user:1"));
        assert!(pattern_matches("*", ""));
        assert!(pattern_matches("*", "anything"));
        assert!(!pattern_matches("dashboard:*", ""));
    }
}
