//! # Signpost
//!
//! A client-side routing-state engine: given a registered set of path
//! patterns and the current URL, it determines which pattern matches,
//! extracts path parameters and query values, and keeps every subscribed
//! consumer synchronized with the latest routing state.
//!
//! The engine is rendering-framework agnostic. Route handlers are opaque
//! values (or factories invoked with the current state) behind the
//! [`Render`] union, and the browser is abstracted behind the [`Platform`]
//! trait: read the current URL, push onto history, open a new context.
//!
//! ## Pattern grammar
//!
//! - Literal segments: `/users/settings`
//! - Named parameters: `/users/:id` binds `id` to one path segment
//! - Optional groups: `/foo(/:id)` matches both `/foo` and `/foo/bar`
//! - Wildcard fallback: `*` matches anything, used only when no concrete
//!   route matched
//! - Hash patterns: `#section` is tested against the URL fragment
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use signpost::{MemoryPlatform, Render, Router, RouterConfig};
//!
//! let platform = Rc::new(MemoryPlatform::new("http://example.com/users/42"));
//!
//! let config = RouterConfig::new()
//!     .route("/users/:id", Render::with(|state| format!("user {}", state.params["id"])))
//!     .route("*", Render::value("not found".to_string()));
//!
//! let router = Router::new(config, platform).unwrap();
//! assert_eq!(router.render(), Some("user 42".to_string()));
//! ```
//!
//! All resolution and notification is synchronous on the calling thread:
//! a navigation trigger fully resolves the new state and notifies every
//! subscriber before returning.

pub mod error;
pub mod location;
pub mod nav;
pub mod path;
pub mod route;
pub mod state;
pub mod store;

use std::rc::Rc;

pub use error::RouterError;
pub use nav::{Key, Link, LinkEvent, MemoryPlatform, NavOutcome, NavigationController, Platform};
pub use route::{Pattern, PatternKind, Render, Route, RouteMatch, RouteTable};
pub use state::{Location, RoutingState};
pub use store::{RoutingStateStore, Subscription};

/// Router construction input: ordered routes plus the startup URL
///
/// `url` defaults to the platform's current URL when omitted.
///
/// # Examples
///
/// ```
/// use signpost::{Render, RouterConfig};
///
/// let config = RouterConfig::new()
///     .route("/foo", Render::value("foo"))
///     .route("*", Render::value("fallback"))
///     .with_url("http://example.com/foo");
/// ```
pub struct RouterConfig<V> {
    routes: Vec<(String, Render<V>)>,
    url: Option<String>,
}

impl<V> RouterConfig<V> {
    pub fn new() -> Self {
        RouterConfig {
            routes: Vec::new(),
            url: None,
        }
    }

    /// Registers a route; registration order is matching precedence
    pub fn route(mut self, pattern: impl Into<String>, render: Render<V>) -> Self {
        self.routes.push((pattern.into(), render));
        self
    }

    /// Sets the initial URL instead of reading it from the platform
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl<V> Default for RouterConfig<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// The router: owns the route table, the state store and the navigation
/// controller for its lifetime
///
/// Construction compiles every registered pattern (failing fast on a
/// malformed one) and resolves the initial routing state. The host wires
/// its browser events to [`on_history_popped`](Self::on_history_popped),
/// [`on_fragment_changed`](Self::on_fragment_changed) and
/// [`activate_link`](Self::activate_link), and detaches them again around
/// [`close`](Self::close).
pub struct Router<V> {
    store: Rc<RoutingStateStore<V>>,
    nav: NavigationController<V>,
}

impl<V> std::fmt::Debug for Router<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").finish_non_exhaustive()
    }
}

impl<V> Router<V> {
    /// Builds the router from configuration and a platform binding
    ///
    /// # Errors
    ///
    /// [`RouterError::MalformedPattern`] when any registered pattern cannot
    /// be compiled. Registration is the only fallible step; matching never
    /// errors.
    pub fn new(config: RouterConfig<V>, platform: Rc<dyn Platform>) -> Result<Self, RouterError> {
        let mut table = RouteTable::new();
        for (pattern, render) in config.routes {
            table.register_pattern(&pattern, render)?;
        }

        let url = config.url.unwrap_or_else(|| platform.current_url());
        let store = Rc::new(RoutingStateStore::new(table, &url));
        let nav = NavigationController::new(Rc::clone(&store), platform);

        Ok(Router { store, nav })
    }

    /// The current routing-state snapshot
    pub fn state(&self) -> Rc<RoutingState> {
        self.store.state()
    }

    /// Registers a consumer notified on every routing-state change
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Rc<RoutingState>) + 'static,
    {
        self.store.subscribe(callback)
    }

    /// Removes a consumer's registration
    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.store.unsubscribe(subscription)
    }

    /// Handles the browser's "history popped" signal (back/forward)
    pub fn on_history_popped(&self) {
        self.nav.on_history_popped()
    }

    /// Handles the browser's "fragment changed" signal
    pub fn on_fragment_changed(&self) {
        self.nav.on_fragment_changed()
    }

    /// Handles an activation event on an internal link
    pub fn activate_link(&self, link: &Link, event: &LinkEvent) -> NavOutcome {
        self.nav.activate(link, event)
    }

    /// Attributes for rendering `link`, including the `data-active` marker
    /// when its href matches the currently resolved pathname
    pub fn link_attributes(&self, link: &Link) -> Vec<(String, String)> {
        link.attributes(&self.state())
    }

    /// Teardown: clears all subscriptions; later recomputes are no-ops
    pub fn close(&self) {
        self.store.close()
    }
}

impl<V: Clone> Router<V> {
    /// Invokes the matched route's handler with the current state
    ///
    /// `None` when no route matched and no fallback exists — the consumer
    /// renders nothing or a default.
    pub fn render(&self) -> Option<V> {
        self.store.render()
    }
}
