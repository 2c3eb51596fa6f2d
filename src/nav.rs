//! Navigation control: link activation and passive history listeners
//!
//! The controller owns no state of its own — it triggers store recomputation
//! and mutates browser history as a side effect, through the [`Platform`]
//! capability the host supplies. Passive listeners cover externally
//! triggered changes (back/forward, fragment edits); [`activate`] covers
//! user-initiated activation of an internal link.
//!
//! [`activate`]: NavigationController::activate

use std::rc::Rc;

use crate::state::RoutingState;
use crate::store::RoutingStateStore;

/// Browser capabilities the router consumes
///
/// The host binds this to the real History/URL objects (or a test double):
/// read the current URL, push a URL onto history without a reload, and open
/// a URL in a new browsing context.
pub trait Platform {
    /// The browser's current URL
    fn current_url(&self) -> String;
    /// Pushes `url` onto history (URL changes, no reload)
    fn push(&self, url: &str);
    /// Opens `url` in a new browsing context (tab/window)
    fn open_external(&self, url: &str);
}

/// In-memory [`Platform`] implementation
///
/// Tracks the current URL and records every push and external open. Useful
/// for tests and for driving the router outside a real browser.
#[derive(Debug, Default)]
pub struct MemoryPlatform {
    url: std::cell::RefCell<String>,
    pushed: std::cell::RefCell<Vec<String>>,
    opened: std::cell::RefCell<Vec<String>>,
}

impl MemoryPlatform {
    pub fn new(url: impl Into<String>) -> Self {
        MemoryPlatform {
            url: std::cell::RefCell::new(url.into()),
            ..Default::default()
        }
    }

    /// Replaces the current URL without recording a push, simulating an
    /// externally triggered history change (back/forward, fragment edit)
    pub fn set_url(&self, url: impl Into<String>) {
        *self.url.borrow_mut() = url.into();
    }

    /// Every URL pushed onto history so far, in order
    pub fn pushed(&self) -> Vec<String> {
        self.pushed.borrow().clone()
    }

    /// Every URL opened in a new context so far, in order
    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl Platform for MemoryPlatform {
    fn current_url(&self) -> String {
        self.url.borrow().clone()
    }

    fn push(&self, url: &str) {
        self.pushed.borrow_mut().push(url.to_string());
        *self.url.borrow_mut() = url.to_string();
    }

    fn open_external(&self, url: &str) {
        self.opened.borrow_mut().push(url.to_string());
    }
}

/// An internal navigational element
///
/// Rendered as a clickable anchor semantic by default; `element` overrides
/// the rendered kind and unrecognized configuration is forwarded to the
/// rendered element as passthrough attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    href: String,
    target: Option<String>,
    element: String,
    attrs: Vec<(String, String)>,
}

impl Link {
    /// A link to `href`, rendered as an anchor
    pub fn new(href: impl Into<String>) -> Self {
        Link {
            href: href.into(),
            target: None,
            element: "a".to_string(),
            attrs: Vec::new(),
        }
    }

    /// Sets the element's `target` (e.g. `_blank` to request a new context)
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Overrides the rendered element kind
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = element.into();
        self
    }

    /// Forwards an unrecognized attribute to the rendered element
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// The link's target href
    pub fn href(&self) -> &str {
        &self.href
    }

    /// The rendered element kind (`a` unless overridden)
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Whether this link's href requests a new browsing context
    fn wants_new_context(&self) -> bool {
        self.target.as_deref() == Some("_blank")
    }

    /// Whether this link points at the currently resolved pathname
    pub fn is_active(&self, state: &RoutingState) -> bool {
        crate::path::normalize_path(&self.href) == state.location.pathname
    }

    /// Attribute list for the rendered element
    ///
    /// Always carries `href`; `target` and passthrough attributes follow;
    /// the `data-active` marker is present exactly when the href equals the
    /// currently resolved pathname, so style layers can highlight the
    /// active link.
    pub fn attributes(&self, state: &RoutingState) -> Vec<(String, String)> {
        let mut attrs = vec![("href".to_string(), self.href.clone())];

        if let Some(target) = &self.target {
            attrs.push(("target".to_string(), target.clone()));
        }

        attrs.extend(self.attrs.iter().cloned());

        if self.is_active(state) {
            attrs.push(("data-active".to_string(), "true".to_string()));
        }

        attrs
    }
}

/// Key pressed during a keyboard activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    /// Any other key; never activates the link
    Other,
}

/// An activation event on a navigational element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Pointer click; modifier flags request a new browsing context
    Click { meta: bool, ctrl: bool },
    /// Touch end
    TouchEnd,
    /// Key press; only `Enter` and `Space` activate
    KeyPress(Key),
}

impl LinkEvent {
    /// A plain click with no modifiers
    pub fn click() -> Self {
        LinkEvent::Click {
            meta: false,
            ctrl: false,
        }
    }

    fn wants_new_context(&self) -> bool {
        matches!(self, LinkEvent::Click { meta: true, .. } | LinkEvent::Click { ctrl: true, .. })
    }

    fn activates(&self) -> bool {
        !matches!(self, LinkEvent::KeyPress(Key::Other))
    }
}

/// What an activation ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// History was pushed and the state recomputed
    Pushed,
    /// The platform opened the href in a new context; history untouched
    OpenedExternal,
    /// The event does not activate the link (e.g. an unrelated key)
    Ignored,
}

/// Triggers store recomputation in response to navigation
pub struct NavigationController<V> {
    store: Rc<RoutingStateStore<V>>,
    platform: Rc<dyn Platform>,
}

impl<V> NavigationController<V> {
    pub fn new(store: Rc<RoutingStateStore<V>>, platform: Rc<dyn Platform>) -> Self {
        NavigationController { store, platform }
    }

    /// Passive listener for the browser's "history popped" signal
    ///
    /// Re-reads the current URL from the platform and recomputes; the state
    /// every subscriber observes is updated before this returns.
    pub fn on_history_popped(&self) {
        let url = self.platform.current_url();
        tracing::debug!(%url, "history popped");
        self.store.recompute(&url);
    }

    /// Passive listener for the browser's "fragment changed" signal
    pub fn on_fragment_changed(&self) {
        let url = self.platform.current_url();
        tracing::debug!(%url, "fragment changed");
        self.store.recompute(&url);
    }

    /// Handles an activation event on an internal link
    ///
    /// A new-context request (modifier key, or the link's own `target`)
    /// never touches history: the platform opens the href elsewhere and
    /// handling stops. Otherwise the href is pushed onto history and the
    /// routing state recomputed synchronously.
    pub fn activate(&self, link: &Link, event: &LinkEvent) -> NavOutcome {
        if !event.activates() {
            return NavOutcome::Ignored;
        }

        if event.wants_new_context() || link.wants_new_context() {
            tracing::debug!(href = link.href(), "opening in new context");
            self.platform.open_external(link.href());
            return NavOutcome::OpenedExternal;
        }

        tracing::debug!(href = link.href(), "pushing history entry");
        self.platform.push(link.href());
        self.store.recompute(link.href());
        NavOutcome::Pushed
    }
}
