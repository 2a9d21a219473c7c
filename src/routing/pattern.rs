//! Source pattern matching.
//!
//! # Responsibilities
//! - Normalize patterns and request paths (query suffix, trailing slashes)
//! - Reject early when the literal prefix before the first `*` differs
//! - Match `*` positionally against path segments and capture their values
//! - Compare percent-decoded text so config and request spellings agree
//!
//! # Design Decisions
//! - A `*` never crosses a `/`: one wildcard, one segment
//! - Patterns without `*` require an exact match after normalization
//! - No regex; matching is a single left-to-right walk

use std::borrow::Cow;

/// The wildcard token in source and destination templates.
pub const WILDCARD: char = '*';

/// Drop a `?query` or `#fragment` suffix from a pattern.
pub fn strip_query(pattern: &str) -> &str {
    match pattern.find(['?', '#']) {
        Some(idx) => &pattern[..idx],
        None => pattern,
    }
}

/// Strip trailing slashes; the root path stays `/`.
pub fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Percent-decode one path segment. Invalid UTF-8 is compared as written.
pub fn decode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}

/// Percent-decode every segment of `path`.
pub fn decode_path(path: &str) -> String {
    path.split('/')
        .map(decode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Match `path` against `pattern`.
///
/// Both sides are compared segment by segment after percent-decoding, so a
/// source written as `/über` matches a request for `/%C3%BCber`. Returns the
/// captured wildcard values in left-to-right order (empty when the pattern has
/// no wildcard), or `None` when the path does not match.
pub fn match_path(pattern: &str, path: &str) -> Option<Vec<String>> {
    let pattern = normalize_path(strip_query(pattern));
    let path = normalize_path(path);

    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<Cow<'_, str>> = path.split('/').map(decode_segment).collect();

    // Skip the rule as soon as the literal prefix disagrees.
    let literal = pattern_segments
        .iter()
        .take_while(|segment| !segment.contains(WILDCARD))
        .count();
    for (expected, actual) in pattern_segments[..literal].iter().zip(&path_segments) {
        if decode_segment(expected) != *actual {
            return None;
        }
    }

    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut captures = Vec::new();
    for (expected, actual) in pattern_segments.iter().zip(&path_segments).skip(literal) {
        if expected.contains(WILDCARD) {
            match_segment(expected, actual, &mut captures)?;
        } else if decode_segment(expected) != *actual {
            return None;
        }
    }

    Some(captures)
}

/// Match one segment that contains at least one wildcard.
///
/// Literal pieces around the wildcards must appear in order; each wildcard
/// captures the shortest non-empty text up to the next literal piece.
fn match_segment(expected: &str, actual: &str, captures: &mut Vec<String>) -> Option<()> {
    let pieces: Vec<Cow<'_, str>> = expected.split(WILDCARD).map(decode_segment).collect();
    let (first, rest) = pieces.split_first()?;
    let (last, middle) = rest.split_last()?;

    let mut remaining = actual.strip_prefix(&**first)?.strip_suffix(&**last)?;

    for piece in middle {
        // Captures are non-empty, so search past the first character.
        let offset = remaining.char_indices().nth(1).map(|(i, _)| i)?;
        let found = if piece.is_empty() {
            offset
        } else {
            remaining[offset..].find(&**piece)? + offset
        };
        captures.push(remaining[..found].to_string());
        remaining = &remaining[found + piece.len()..];
    }

    if remaining.is_empty() {
        return None;
    }
    captures.push(remaining.to_string());
    Some(())
}
