/// Resolved routing-state snapshot
///
/// A [`RoutingState`] is created fresh on every resolution, never mutated in
/// place, and superseded atomically by the next resolution. Consumers share
/// it by reference (`Rc`) until it is superseded.
use std::collections::HashMap;

use serde::Serialize;

/// Structured fields of a parsed URL, independent of routing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// The full URL string, verbatim
    pub href: String,
    /// Normalized path portion, always starting with `/`
    pub pathname: String,
    /// Decoded query mapping; duplicate keys resolve last-one-wins
    pub query: HashMap<String, String>,
    /// Fragment without its leading `#`, empty when absent
    pub hash: String,
}

/// The immutable-per-resolution routing snapshot
///
/// `params` is populated only from the matched pattern's named segments;
/// parameters of an absent optional group are omitted, not null. `route` is
/// the registration index of the matched route, `None` when nothing matched
/// (including a missing fallback).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingState {
    pub location: Location,
    pub params: HashMap<String, String>,
    #[serde(skip)]
    pub route: Option<usize>,
}

impl RoutingState {
    /// Whether any route (concrete or fallback) matched this resolution
    pub fn has_route(&self) -> bool {
        self.route.is_some()
    }
}
