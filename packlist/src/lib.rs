//! packlist: state management for a packing-list manager
//!
//! Every change to the list goes through one path: a typed [`PackingAction`]
//! is dispatched to the [`Store`], which runs the notification hook, then the
//! pure reducer, and swaps in the new state. The activity log records each
//! effective change, newest first. The [`view`] module projects the state
//! into what a UI shows: searchable panes, category groups, suggestions,
//! sort orders and recent activity.
//!
//! # Core Concepts
//!
//! - **Action**: a request to change state ([`PackingAction`])
//! - **Reducer**: `(state, action) -> state`, with ids and timestamps
//!   injected through a [`Stamp`] so the transition stays pure
//! - **Store**: owns the state snapshot, category registry and toast queue
//! - **Middleware**: logging and other cross-cutting hooks around dispatch
//!
//! # Example
//!
//! ```
//! use packlist::prelude::*;
//! use packlist::view;
//!
//! let mut store = Store::new(packlist::sample_items());
//! store.dispatch(PackingAction::ItemTogglePack("sample-socks".into()));
//! store.dispatch(PackingAction::SearchSetPacked("so".into()));
//!
//! let packed = view::packed_search_results(store.state());
//! assert_eq!(packed.len(), 1);
//! assert_eq!(packed[0].name, "Socks");
//! ```

// Lets `#[derive(Action)]` expand to `packlist::...` paths inside this crate.
extern crate self as packlist;

pub mod action;
pub mod activity;
pub mod category;
pub mod logger;
pub mod model;
pub mod notify;
pub mod reducer;
pub mod state;
pub mod store;
pub mod testing;
pub mod view;

// Core trait exports
pub use action::{Action, ActionCategory, ActionSummary, PackingAction, PackingActionCategory};

// Derive macro (macro namespace, alongside the trait of the same name)
pub use packlist_macros::Action;

pub use activity::{
    Activity, ActivityDetails, ActivityId, ActivityKind, Stamp, StampSource, SystemStamps,
};
pub use category::{CategoryError, CategoryRegistry, CategoryStyle};
pub use model::{sample_items, Category, Item, ItemId};
pub use notify::{notifications_for, Notification, Severity, ToastQueue};
pub use reducer::{reduce, transition, ReduceContext};
pub use state::{CategoryFilter, PackingState};
pub use store::{
    ComposedMiddleware, LoggingMiddleware, Middleware, NoopMiddleware, Store, StoreBuilder,
};
pub use view::{CategoryGroups, PackingSummary, SortOrder};

/// Prelude for convenient imports
pub mod prelude {
    // Traits
    pub use crate::{Action, ActionCategory, ActionSummary, Middleware, StampSource};

    // Model
    pub use crate::{Category, CategoryFilter, Item, ItemId, PackingAction, PackingState};

    // Store
    pub use crate::{
        ComposedMiddleware, LoggingMiddleware, NoopMiddleware, Store, StoreBuilder,
    };

    // Logging
    pub use crate::logger::{ActionLogConfig, ActionLoggerConfig, ActionLoggerMiddleware};

    // Views
    pub use crate::view::SortOrder;
}
