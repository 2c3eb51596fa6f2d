//! Routing-state store: the propagation layer
//!
//! Holds the current [`RoutingState`], recomputes it on demand, and notifies
//! every active subscription when the state actually changes. All work is
//! synchronous on the calling thread: `recompute` fully resolves the new
//! state and notifies all subscribers before returning, so a consumer
//! reading the state right after a navigation trigger always sees the
//! post-navigation value.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::location::resolve;
use crate::route::RouteTable;
use crate::state::RoutingState;

/// Handle returned by [`RoutingStateStore::subscribe`]; pass it back to
/// [`RoutingStateStore::unsubscribe`] when the consumer detaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription(u64);

type Callback = Rc<dyn Fn(Rc<RoutingState>)>;

/// Owner of the current routing state and the subscriber list
///
/// Two states: idle (holding the last resolved snapshot) and a transient,
/// synchronous resolving step inside [`recompute`](Self::recompute). The
/// store is single-threaded; all mutation goes through `recompute`,
/// `subscribe` and `unsubscribe`.
pub struct RoutingStateStore<V> {
    table: RouteTable<V>,
    current: RefCell<Rc<RoutingState>>,
    subscriptions: RefCell<Vec<(u64, Callback)>>,
    next_id: Cell<u64>,
    closed: Cell<bool>,
}

impl<V> RoutingStateStore<V> {
    /// Builds the store and resolves the initial state from `initial_url`
    pub fn new(table: RouteTable<V>, initial_url: &str) -> Self {
        let current = Rc::new(resolve(initial_url, &table));
        RoutingStateStore {
            table,
            current: RefCell::new(current),
            subscriptions: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            closed: Cell::new(false),
        }
    }

    /// The route table this store resolves against
    pub fn table(&self) -> &RouteTable<V> {
        &self.table
    }

    /// The current snapshot
    pub fn state(&self) -> Rc<RoutingState> {
        self.current.borrow().clone()
    }

    /// Synchronously resolves `url` and propagates the result
    ///
    /// If the newly resolved state is structurally identical to the current
    /// one, nothing is replaced and nobody is notified (avoids redundant
    /// re-renders). Otherwise the snapshot is swapped atomically and every
    /// active subscriber observes the new state before this call returns.
    /// No-op after [`close`](Self::close).
    pub fn recompute(&self, url: &str) {
        if self.closed.get() {
            return;
        }

        let next = resolve(url, &self.table);
        if next == **self.current.borrow() {
            return;
        }

        let next = Rc::new(next);
        *self.current.borrow_mut() = Rc::clone(&next);

        // Snapshot the callbacks so a subscriber may subscribe/unsubscribe
        // re-entrantly without tripping the borrow.
        let callbacks: Vec<Callback> = self
            .subscriptions
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(Rc::clone(&next));
        }
    }

    /// Registers a consumer to be notified on every state change
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Rc<RoutingState>) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscriptions.borrow_mut().push((id, Rc::new(callback)));
        Subscription(id)
    }

    /// Removes a consumer's registration
    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.subscriptions
            .borrow_mut()
            .retain(|(id, _)| *id != subscription.0);
    }

    /// Number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Teardown: clears all subscriptions and rejects further recomputes
    pub fn close(&self) {
        self.closed.set(true);
        self.subscriptions.borrow_mut().clear();
    }
}

impl<V: Clone> RoutingStateStore<V> {
    /// Invokes the matched route's handler with the current state
    ///
    /// `None` when the current state carries no route (unmatched URL with no
    /// fallback) — consumers render nothing rather than crashing.
    pub fn render(&self) -> Option<V> {
        let state = self.state();
        let route = self.table.get(state.route?)?;
        Some(route.render().render(&state))
    }
}
