//! Action-pattern normalization and prefix-wildcard overlap tests.
//!
//! Overlap between two patterns is decided by prefix containment, never
//! by enumerating concrete actions: a pattern is reduced to its literal
//! prefix up to the first `*`, and two patterns overlap when one prefix
//! contains the other. An interior `*` therefore over-approximates
//! (may flag a pair that shares no concrete action, never misses one).

/// Normalize an IAM action for comparison: lowercase the service prefix
/// (`S3:GetObject` becomes `s3:GetObject`), leave the operation as-is.
pub fn normalize_action(action: &str) -> String {
    match action.split_once(':') {
        Some((service, operation)) => format!("{}:{}", service.to_ascii_lowercase(), operation),
        None => action.to_ascii_lowercase(),
    }
}

/// Literal prefix of a pattern up to the first `*`, plus whether one was present.
fn split_wildcard(pattern: &str) -> (&str, bool) {
    match pattern.find('*') {
        Some(index) => (&pattern[..index], true),
        None => (pattern, false),
    }
}

/// Whether two raw patterns can match a common concrete string.
///
/// `s3:Get*` overlaps `s3:GetObject` because `s3:Get` is a prefix of the
/// other pattern; `s3:Get*` and `ec2:Describe*` share no prefix and do not.
pub fn patterns_overlap(a: &str, b: &str) -> bool {
    let (prefix_a, wildcard_a) = split_wildcard(a);
    let (prefix_b, wildcard_b) = split_wildcard(b);
    match (wildcard_a, wildcard_b) {
        (false, false) => prefix_a == prefix_b,
        (true, false) => prefix_b.starts_with(prefix_a),
        (false, true) => prefix_a.starts_with(prefix_b),
        (true, true) => prefix_a.starts_with(prefix_b) || prefix_b.starts_with(prefix_a),
    }
}

/// Pattern overlap for IAM actions, normalization-insensitive.
pub fn action_patterns_overlap(a: &str, b: &str) -> bool {
    patterns_overlap(&normalize_action(a), &normalize_action(b))
}

/// Whether any pattern in `first` overlaps any pattern in `second`.
pub fn pattern_sets_overlap(first: &[String], second: &[String]) -> bool {
    first
        .iter()
        .any(|a| second.iter().any(|b| patterns_overlap(a, b)))
}
