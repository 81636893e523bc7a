//! Dispatch gateway: the single entry point for state changes
//!
//! [`Store`] owns the current state as an `Arc` snapshot together with the
//! category registry, the stamp source and the toast queue. Every dispatch
//! runs to completion before the next one starts (`&mut self`), and a
//! snapshot taken with [`Store::snapshot`] never observes later changes.

use std::fmt;
use std::sync::Arc;

use crate::action::{Action, PackingAction};
use crate::activity::{StampSource, SystemStamps};
use crate::category::{CategoryError, CategoryRegistry, CategoryStyle};
use crate::model::{Category, Item};
use crate::notify::{notifications_for, Notification, ToastQueue};
use crate::reducer::{reduce, ReduceContext};
use crate::state::PackingState;

/// Centralized packing-list store
///
/// # Example
/// ```
/// use packlist::{Category, Item, PackingAction, Store};
///
/// let mut store = Store::new(Vec::new());
/// let socks = Item::with_id("socks", "Socks", Category::Clothing);
///
/// assert!(store.dispatch(PackingAction::ItemAdd(socks)));
/// assert!(store.dispatch(PackingAction::ItemTogglePack("socks".into())));
/// assert!(store.state().items[0].is_packed);
///
/// let toasts = store.drain_notifications();
/// assert_eq!(toasts[1].message, "Socks packed successfully!");
/// ```
pub struct Store<M = NoopMiddleware> {
    state: Arc<PackingState>,
    registry: CategoryRegistry,
    stamps: Box<dyn StampSource>,
    toasts: ToastQueue,
    middleware: M,
}

impl Store<NoopMiddleware> {
    /// Store over `items` with the built-in categories and system stamps
    pub fn new(items: Vec<Item>) -> Self {
        StoreBuilder::new().items(items).build()
    }

    pub fn builder() -> StoreBuilder<NoopMiddleware> {
        StoreBuilder::new()
    }
}

impl<M: Middleware> Store<M> {
    /// Dispatch an action through middleware, notification hook and reducer
    ///
    /// Notifications are computed against the state *before* the transition
    /// and queued only if the state changed. Returns `true` if it did.
    pub fn dispatch(&mut self, action: PackingAction) -> bool {
        self.middleware.before(&action, &*self.state);

        let notifications = notifications_for(&self.state, &action);

        let stamp = self.stamps.next_stamp();
        let ctx = ReduceContext::new(&stamp, &self.registry);
        let mut next = PackingState::clone(&self.state);
        let changed = reduce(&mut next, action.clone(), &ctx);
        if changed {
            self.state = Arc::new(next);
            for notification in notifications {
                self.toasts.push(notification);
            }
        }

        self.middleware.after(&action, changed, &*self.state);
        changed
    }
}

impl<M> Store<M> {
    /// Get a reference to the current state
    pub fn state(&self) -> &PackingState {
        &self.state
    }

    /// Cheap handle to the current state that later dispatches won't touch
    pub fn snapshot(&self) -> Arc<PackingState> {
        Arc::clone(&self.state)
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Register a new category. This goes around the reducer and does not
    /// log an activity.
    pub fn add_category(
        &mut self,
        key: &str,
        style: CategoryStyle,
    ) -> Result<Category, CategoryError> {
        self.registry.add_category(key, style)
    }

    /// Take all pending notifications, oldest first
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.toasts.drain()
    }

    pub fn pending_notifications(&self) -> impl Iterator<Item = &Notification> {
        self.toasts.pending()
    }

    /// Get a reference to the middleware
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Get a mutable reference to the middleware
    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }
}

impl<M: fmt::Debug> fmt::Debug for Store<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("registry", &self.registry)
            .field("toasts", &self.toasts)
            .field("middleware", &self.middleware)
            .finish_non_exhaustive()
    }
}

/// Assembles a [`Store`]
pub struct StoreBuilder<M = NoopMiddleware> {
    state: PackingState,
    registry: CategoryRegistry,
    stamps: Box<dyn StampSource>,
    toast_capacity: usize,
    middleware: M,
}

impl Default for StoreBuilder<NoopMiddleware> {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBuilder<NoopMiddleware> {
    pub fn new() -> Self {
        Self {
            state: PackingState::default(),
            registry: CategoryRegistry::default(),
            stamps: Box::new(SystemStamps),
            toast_capacity: ToastQueue::DEFAULT_CAPACITY,
            middleware: NoopMiddleware,
        }
    }
}

impl<M> StoreBuilder<M> {
    /// Start from a full state, activity log included
    pub fn state(mut self, state: PackingState) -> Self {
        self.state = state;
        self
    }

    /// Start from a fresh state holding `items`
    pub fn items(mut self, items: Vec<Item>) -> Self {
        self.state = PackingState::new(items);
        self
    }

    pub fn registry(mut self, registry: CategoryRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn stamps(mut self, stamps: impl StampSource + 'static) -> Self {
        self.stamps = Box::new(stamps);
        self
    }

    pub fn toast_capacity(mut self, capacity: usize) -> Self {
        self.toast_capacity = capacity;
        self
    }

    pub fn middleware<N: Middleware>(self, middleware: N) -> StoreBuilder<N> {
        StoreBuilder {
            state: self.state,
            registry: self.registry,
            stamps: self.stamps,
            toast_capacity: self.toast_capacity,
            middleware,
        }
    }

    pub fn build(self) -> Store<M> {
        Store {
            state: Arc::new(self.state),
            registry: self.registry,
            stamps: self.stamps,
            toasts: ToastQueue::with_capacity(self.toast_capacity),
            middleware: self.middleware,
        }
    }
}

/// Middleware trait for intercepting actions
///
/// Implement this trait to add logging, persistence, or other
/// cross-cutting concerns to the store. Both hooks see the state:
/// `before` the one the action is applied to, `after` the resulting one.
pub trait Middleware<A: Action = PackingAction, S = PackingState> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A, state: &S);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool, state: &S);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action, S> Middleware<A, S> for NoopMiddleware {
    fn before(&mut self, _action: &A, _state: &S) {}
    fn after(&mut self, _action: &A, _state_changed: bool, _state: &S) {}
}

/// Middleware that logs actions through `tracing`
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    /// Whether to log before dispatch
    pub log_before: bool,
    /// Whether to log after dispatch
    pub log_after: bool,
}

impl LoggingMiddleware {
    /// Create a new logging middleware with default settings (log after only)
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
        }
    }

    /// Create a logging middleware that logs both before and after
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            log_after: true,
        }
    }
}

impl<A: Action> Middleware<A, PackingState> for LoggingMiddleware {
    fn before(&mut self, action: &A, _state: &PackingState) {
        if self.log_before {
            tracing::debug!(action = %action.name(), "Dispatching action");
        }
    }

    fn after(&mut self, action: &A, state_changed: bool, state: &PackingState) {
        if self.log_after {
            tracing::debug!(
                action = %action.name(),
                state_changed = state_changed,
                items = state.items.len(),
                activities = state.activity_log.len(),
                "Action processed"
            );
        }
    }
}

/// Compose multiple middleware into a single middleware
pub struct ComposedMiddleware<A: Action = PackingAction, S = PackingState> {
    middlewares: Vec<Box<dyn Middleware<A, S>>>,
}

impl<A: Action, S> fmt::Debug for ComposedMiddleware<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedMiddleware")
            .field("middlewares_count", &self.middlewares.len())
            .finish()
    }
}

impl<A: Action, S> Default for ComposedMiddleware<A, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action, S> ComposedMiddleware<A, S> {
    /// Create a new composed middleware
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Add a middleware to the composition
    pub fn add<M: Middleware<A, S> + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Box::new(middleware));
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

impl<A: Action, S> Middleware<A, S> for ComposedMiddleware<A, S> {
    fn before(&mut self, action: &A, state: &S) {
        for middleware in &mut self.middlewares {
            middleware.before(action, state);
        }
    }

    fn after(&mut self, action: &A, state_changed: bool, state: &S) {
        // Call in reverse order for proper nesting
        for middleware in self.middlewares.iter_mut().rev() {
            middleware.after(action, state_changed, state);
        }
    }
}
