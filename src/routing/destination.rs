//! Destination construction.
//!
//! # Responsibilities
//! - Substitute captured wildcard values into the destination template
//! - Resolve relative templates against the request's scheme, host and port
//! - Merge the template query with the request query
//! - Force the scheme of a finished target (scheme enforcement)
//!
//! # Design Decisions
//! - Destination keys win on collision; remaining request keys follow in
//!   their original order
//! - Excess `*` tokens stay literal rather than failing the rule
//! - Pure function over its inputs, no I/O

use url::Url;

use crate::routing::pattern::WILDCARD;

/// Replace `*` tokens left to right with successive captures.
pub fn expand_wildcards(template: &str, captures: &[String]) -> String {
    let mut expanded = String::with_capacity(template.len());
    let mut captures = captures.iter();
    for ch in template.chars() {
        if ch == WILDCARD {
            if let Some(value) = captures.next() {
                expanded.push_str(value);
                continue;
            }
        }
        expanded.push(ch);
    }
    expanded
}

/// Merge two query pair lists.
///
/// All `destination` pairs come first, then every `request` pair whose key
/// the destination does not already carry.
pub fn merge_query(
    destination: Vec<(String, String)>,
    request: Vec<(String, String)>,
) -> Vec<(String, String)> {
    let mut merged = destination;
    let carried = merged.len();
    for (key, value) in request {
        if !merged[..carried].iter().any(|(k, _)| *k == key) {
            merged.push((key, value));
        }
    }
    merged
}

/// Build the absolute redirect target.
pub fn build(template: &str, request: &Url, captures: &[String]) -> Result<Url, url::ParseError> {
    let expanded = expand_wildcards(template, captures);

    let mut target = match Url::parse(&expanded) {
        Ok(absolute) if absolute.has_host() => absolute,
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => origin_of(request).join(&expanded)?,
        Err(e) => return Err(e),
    };

    let destination_query: Vec<(String, String)> = target.query_pairs().into_owned().collect();
    let request_query: Vec<(String, String)> = request.query_pairs().into_owned().collect();
    set_query(&mut target, merge_query(destination_query, request_query));

    Ok(target)
}

/// The request URL reduced to scheme, host and port.
fn origin_of(request: &Url) -> Url {
    let mut origin = request.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    origin
}

fn set_query(target: &mut Url, pairs: Vec<(String, String)>) {
    if pairs.is_empty() {
        target.set_query(None);
        return;
    }
    target.query_pairs_mut().clear().extend_pairs(pairs);
}

/// Overwrite the scheme of `target`.
///
/// A port equal to the new scheme's default is dropped by `url` itself.
pub fn force_scheme_on(target: &mut Url, scheme: &str) {
    if target.scheme() == scheme {
        return;
    }
    if target.set_scheme(scheme).is_err() {
        tracing::warn!(url = %target, scheme, "Unable to force redirect scheme");
    }
}
