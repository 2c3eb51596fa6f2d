/// URL parsing and routing-state resolution
///
/// [`parse_url`] turns a URL string into structured [`Location`] fields
/// independent of routing; [`resolve`] combines it with a [`RouteTable`] to
/// produce the complete [`RoutingState`]. Both are pure given their inputs:
/// identical URL and table always produce a structurally identical state.
use std::borrow::Cow;
use std::collections::HashMap;

use crate::path::normalize_path;
use crate::route::RouteTable;
use crate::state::{Location, RoutingState};

/// Parses a URL string into location fields
///
/// - `href` is the input verbatim
/// - `hash` is everything after the first `#`, without the `#`
/// - `query` is the `?`-delimited section, split on `&` into `key=value`
///   pairs, both sides percent-decoded, last-one-wins on duplicate keys
/// - `pathname` is the path portion after scheme and authority (or the
///   input itself when it already starts with `/`), normalized; an absent
///   path is `/`
///
/// # Examples
///
/// ```
/// use signpost::location::parse_url;
///
/// let location = parse_url("http://foo.com/foo?tab=info#top");
/// assert_eq!(location.pathname, "/foo");
/// assert_eq!(location.query.get("tab"), Some(&"info".to_string()));
/// assert_eq!(location.hash, "top");
///
/// let location = parse_url("/bar");
/// assert_eq!(location.pathname, "/bar");
/// assert!(location.query.is_empty());
/// ```
pub fn parse_url(url: &str) -> Location {
    let (without_hash, hash) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, fragment.to_string()),
        None => (url, String::new()),
    };

    let (before_query, query) = match without_hash.split_once('?') {
        Some((rest, raw)) => (rest, parse_query(raw)),
        None => (without_hash, HashMap::new()),
    };

    let raw_path = if before_query.starts_with('/') {
        before_query
    } else if let Some(scheme_end) = before_query.find("://") {
        let after_authority = &before_query[scheme_end + 3..];
        match after_authority.find('/') {
            Some(slash) => &after_authority[slash..],
            None => "/",
        }
    } else {
        // Scheme-less authority form, e.g. `foo.com/foo`
        match before_query.find('/') {
            Some(slash) => &before_query[slash..],
            None => "/",
        }
    };

    Location {
        href: url.to_string(),
        pathname: normalize_path(raw_path).into_owned(),
        query,
        hash,
    }
}

/// Parses a raw query string into a decoded mapping (last-one-wins)
fn parse_query(raw: &str) -> HashMap<String, String> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .fold(HashMap::new(), |mut acc, pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if !key.is_empty() {
                acc.insert(decode(key), decode(value));
            }
            acc
        })
}

/// Percent-decodes a query component, falling back to the raw text when the
/// encoding is invalid
fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Resolves a URL against a route table into a routing state
///
/// Pure given its two inputs; re-resolving the same URL against the same
/// table yields a structurally identical state (the engine relies on this
/// for idempotent recomputation).
pub fn resolve<V>(url: &str, table: &RouteTable<V>) -> RoutingState {
    let location = parse_url(url);
    let matched = table.match_route(&location.pathname, &location.hash);

    tracing::debug!(
        pathname = %location.pathname,
        route = ?matched.index,
        fell_back = matched.fell_back,
        "resolved routing state"
    );

    RoutingState {
        location,
        params: matched.params,
        route: matched.index,
    }
}
