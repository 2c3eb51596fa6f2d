//! Routes and the ordered route table
//!
//! A [`Route`] pairs a compiled [`Pattern`] with a [`Render`] handler. The
//! [`RouteTable`] owns the registered routes in order and resolves a
//! pathname/fragment to the first matching entry, falling back to the first
//! registered wildcard when no concrete entry matches.

pub mod pattern;

use std::collections::HashMap;
use std::fmt;

use crate::error::RouterError;
use crate::state::RoutingState;

pub use pattern::{Pattern, PatternKind};

/// A route's handler: a static renderable value or a factory invoked with
/// the current routing state
///
/// The engine never introspects which kind it is; the rendering collaborator
/// resolves it uniformly via [`Render::render`] at consumption time.
pub enum Render<V> {
    /// A fixed value, cloned out on every render
    Static(V),
    /// A factory producing a value from the current routing state
    Factory(Box<dyn Fn(&RoutingState) -> V>),
}

impl<V> Render<V> {
    /// A handler that always yields `value`
    pub fn value(value: V) -> Self {
        Render::Static(value)
    }

    /// A handler computed from the current routing state
    pub fn with<F>(factory: F) -> Self
    where
        F: Fn(&RoutingState) -> V + 'static,
    {
        Render::Factory(Box::new(factory))
    }
}

impl<V: Clone> Render<V> {
    /// Resolves the handler against a routing state
    pub fn render(&self, state: &RoutingState) -> V {
        match self {
            Render::Static(value) => value.clone(),
            Render::Factory(factory) => factory(state),
        }
    }
}

impl<V> fmt::Debug for Render<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Render::Static(_) => f.write_str("Render::Static(..)"),
            Render::Factory(_) => f.write_str("Render::Factory(..)"),
        }
    }
}

/// A registered route: compiled pattern plus handler
///
/// Immutable once registered; the ordered set of routes forms the
/// [`RouteTable`], owned by the router for its lifetime.
#[derive(Debug)]
pub struct Route<V> {
    pattern: Pattern,
    render: Render<V>,
}

impl<V> Route<V> {
    /// Compiles `pattern` and pairs it with a handler
    ///
    /// Fails fast at registration time on a malformed pattern; match time
    /// never errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use signpost::route::{Render, Route};
    ///
    /// let route = Route::new("/users/:id", Render::value("profile")).unwrap();
    /// assert_eq!(route.pattern().as_str(), "/users/:id");
    ///
    /// assert!(Route::<&str>::new("/users(/:id", Render::value("x")).is_err());
    /// ```
    pub fn new(pattern: &str, render: Render<V>) -> Result<Self, RouterError> {
        Ok(Route {
            pattern: Pattern::compile(pattern)?,
            render,
        })
    }

    /// The compiled pattern
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The handler registered for this route
    pub fn render(&self) -> &Render<V> {
        &self.render
    }
}

/// Result of resolving a pathname/fragment against the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Registration index of the matched route, `None` when nothing matched
    pub index: Option<usize>,
    /// Parameters extracted by the matched pattern
    pub params: HashMap<String, String>,
    /// Whether the match came from the wildcard fallback
    pub fell_back: bool,
}

impl RouteMatch {
    fn none() -> Self {
        RouteMatch {
            index: None,
            params: HashMap::new(),
            fell_back: false,
        }
    }
}

/// Ordered list of registered routes with fallback resolution
#[derive(Debug, Default)]
pub struct RouteTable<V> {
    routes: Vec<Route<V>>,
}

impl<V> RouteTable<V> {
    /// Creates an empty table
    pub fn new() -> Self {
        RouteTable { routes: Vec::new() }
    }

    /// Appends a route; registration order is matching precedence
    pub fn register(&mut self, route: Route<V>) {
        self.routes.push(route);
    }

    /// Compiles and appends a route in one step
    pub fn register_pattern(&mut self, pattern: &str, render: Render<V>) -> Result<(), RouterError> {
        self.register(Route::new(pattern, render)?);
        Ok(())
    }

    /// Route at a registration index
    pub fn get(&self, index: usize) -> Option<&Route<V>> {
        self.routes.get(index)
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Whether a wildcard fallback route is registered
    pub fn has_fallback(&self) -> bool {
        self.routes.iter().any(|r| r.pattern.is_wildcard())
    }

    /// Resolves a pathname and fragment to a route
    ///
    /// Iterates routes in registration order and returns the first concrete
    /// match. A wildcard route is only ever returned when no concrete route
    /// matched, regardless of where it sits in the list; if several
    /// wildcards exist the first registered one wins. When nothing matches
    /// and no wildcard exists, emits a single diagnostic on the warning
    /// channel and yields an empty match — the absence of a route is a
    /// value, not an error.
    pub fn match_route(&self, pathname: &str, hash: &str) -> RouteMatch {
        let mut fallback = None;

        for (index, route) in self.routes.iter().enumerate() {
            if route.pattern.is_wildcard() {
                if fallback.is_none() {
                    fallback = Some(index);
                }
                continue;
            }

            if let Some(params) = route.pattern.matches(pathname, hash) {
                return RouteMatch {
                    index: Some(index),
                    params,
                    fell_back: false,
                };
            }
        }

        match fallback {
            Some(index) => RouteMatch {
                index: Some(index),
                params: HashMap::new(),
                fell_back: true,
            },
            None => {
                tracing::warn!(pathname, "no fallback route was provided");
                RouteMatch::none()
            }
        }
    }
}
