//! Dispatch logging with pattern-based filtering and an in-memory ring buffer
//!
//! Action names are matched against comma-separated glob patterns, so a
//! session can be narrowed to, say, `Item*` while leaving out `Search*`
//! keystrokes.
//!
//! # Example
//!
//! ```
//! use packlist::logger::{ActionLogConfig, ActionLoggerConfig, ActionLoggerMiddleware};
//! use packlist::{PackingAction, Store};
//!
//! let filter = ActionLoggerConfig::new(None, Some("Search*"));
//! let logger = ActionLoggerMiddleware::with_log(ActionLogConfig::new(50, filter));
//! let mut store = Store::builder().middleware(logger).build();
//!
//! store.dispatch(PackingAction::SearchSetPacked("sock".into()));
//! store.dispatch(PackingAction::ListUnpackAll);
//!
//! let log = store.middleware().log().unwrap();
//! assert_eq!(log.len(), 1);
//! assert_eq!(log.entries().next().unwrap().name, "ListUnpackAll");
//! ```

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::action::ActionSummary;
use crate::store::Middleware;

/// Include/exclude filter over action names.
///
/// Patterns support:
/// - `*` matches any sequence of characters
/// - `?` matches any single character
/// - Literal text matches exactly
///
/// `Item*` matches ItemAdd, ItemMove and ItemRename; `*Pack` matches
/// ItemTogglePack only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionLoggerConfig {
    /// If non-empty, only log actions matching these patterns
    pub include_patterns: Vec<String>,
    /// Exclude actions matching these patterns (applied after include)
    pub exclude_patterns: Vec<String>,
}

impl ActionLoggerConfig {
    /// Create a config from comma-separated pattern strings
    ///
    /// `None` means "everything" for include and "nothing" for exclude.
    ///
    /// ```
    /// use packlist::logger::ActionLoggerConfig;
    ///
    /// let config = ActionLoggerConfig::new(Some("Item*,ListUnpackAll"), Some("ItemRename"));
    /// assert!(config.should_log("ItemAdd"));
    /// assert!(config.should_log("ListUnpackAll"));
    /// assert!(!config.should_log("ItemRename"));
    /// assert!(!config.should_log("SearchSetPacked"));
    /// ```
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self {
            include_patterns: include.map(split_patterns).unwrap_or_default(),
            exclude_patterns: exclude.map(split_patterns).unwrap_or_default(),
        }
    }

    pub fn with_patterns(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include_patterns: include,
            exclude_patterns: exclude,
        }
    }

    /// Check if an action name passes the include/exclude patterns
    pub fn should_log(&self, action_name: &str) -> bool {
        if !self.include_patterns.is_empty()
            && !self
                .include_patterns
                .iter()
                .any(|p| glob_match(p, action_name))
        {
            return false;
        }

        !self
            .exclude_patterns
            .iter()
            .any(|p| glob_match(p, action_name))
    }
}

fn split_patterns(patterns: &str) -> Vec<String> {
    patterns
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

// ============================================================================
// In-Memory Action Log
// ============================================================================

/// One dispatched action as recorded by the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLogEntry {
    /// Action name (from Action::name())
    pub name: &'static str,
    /// Summary representation (from ActionSummary::summary())
    pub summary: String,
    /// Sequence number for ordering
    pub sequence: u64,
    pub logged_at: DateTime<Utc>,
    /// Whether the action changed state; `None` until the reducer has run
    pub state_changed: Option<bool>,
}

impl ActionLogEntry {
    pub fn new(name: &'static str, summary: String, sequence: u64) -> Self {
        Self {
            name,
            summary,
            sequence,
            logged_at: Utc::now(),
            state_changed: None,
        }
    }
}

/// Configuration for the action log ring buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLogConfig {
    /// Maximum number of entries to keep
    pub capacity: usize,
    pub filter: ActionLoggerConfig,
}

impl Default for ActionLogConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            filter: ActionLoggerConfig::default(),
        }
    }
}

impl ActionLogConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub fn new(capacity: usize, filter: ActionLoggerConfig) -> Self {
        Self { capacity, filter }
    }
}

/// Ring buffer of recent actions; the oldest entry is dropped when full
#[derive(Debug, Clone)]
pub struct ActionLog {
    entries: VecDeque<ActionLogEntry>,
    config: ActionLogConfig,
    next_sequence: u64,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(ActionLogConfig::default())
    }
}

impl ActionLog {
    pub fn new(config: ActionLogConfig) -> Self {
        Self {
            entries: VecDeque::with_capacity(config.capacity),
            config,
            next_sequence: 0,
        }
    }

    /// Log an action if it passes the filter
    ///
    /// Returns the entry if it was logged, None if filtered out.
    pub fn log<A: ActionSummary>(&mut self, action: &A) -> Option<&ActionLogEntry> {
        let name = action.name();
        if self.config.capacity == 0 || !self.config.filter.should_log(name) {
            return None;
        }

        let entry = ActionLogEntry::new(name, action.summary(), self.next_sequence);
        self.next_sequence += 1;

        if self.entries.len() >= self.config.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.entries.back()
    }

    /// Update the last entry with state_changed info (called after reducer)
    pub fn update_last_state_changed(&mut self, changed: bool) {
        if let Some(entry) = self.entries.back_mut() {
            entry.state_changed = Some(changed);
        }
    }

    /// All entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter()
    }

    /// The most recent `count` entries, newest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter().rev().take(count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn config(&self) -> &ActionLogConfig {
        &self.config
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Middleware that logs filtered actions to `tracing` and, optionally, to an
/// [`ActionLog`]
#[derive(Debug, Clone)]
pub struct ActionLoggerMiddleware {
    config: ActionLoggerConfig,
    log: Option<ActionLog>,
    /// Whether the action in flight made it into the log
    last_action_logged: bool,
    /// When false, every hook is a no-op
    active: bool,
}

impl ActionLoggerMiddleware {
    /// Tracing only, no in-memory storage
    pub fn new(config: ActionLoggerConfig) -> Self {
        Self {
            config,
            log: None,
            last_action_logged: false,
            active: true,
        }
    }

    /// Tracing plus an in-memory log
    pub fn with_log(config: ActionLogConfig) -> Self {
        Self {
            config: config.filter.clone(),
            log: Some(ActionLog::new(config)),
            last_action_logged: false,
            active: true,
        }
    }

    pub fn with_default_log() -> Self {
        Self::with_log(ActionLogConfig::default())
    }

    /// Enable or disable the middleware, e.g. from a CLI flag
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Get the action log (if storage is enabled)
    pub fn log(&self) -> Option<&ActionLog> {
        self.log.as_ref()
    }

    pub fn log_mut(&mut self) -> Option<&mut ActionLog> {
        self.log.as_mut()
    }

    pub fn config(&self) -> &ActionLoggerConfig {
        &self.config
    }
}

impl<A: ActionSummary, S> Middleware<A, S> for ActionLoggerMiddleware {
    fn before(&mut self, action: &A, _state: &S) {
        if !self.active {
            return;
        }

        let name = action.name();
        if self.config.should_log(name) {
            tracing::debug!(action = %name, summary = %action.summary(), "action");
        }

        self.last_action_logged = self
            .log
            .as_mut()
            .is_some_and(|log| log.log(action).is_some());
    }

    fn after(&mut self, _action: &A, state_changed: bool, _state: &S) {
        if !self.active || !self.last_action_logged {
            return;
        }
        if let Some(log) = self.log.as_mut() {
            log.update_last_state_changed(state_changed);
        }
    }
}

/// Simple glob pattern matching supporting `*` and `?`.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while ti < text.len() {
        match pattern.get(pi) {
            Some('?') => {
                pi += 1;
                ti += 1;
            }
            Some('*') => {
                star = Some((pi, ti));
                pi += 1;
            }
            Some(c) if *c == text[ti] => {
                pi += 1;
                ti += 1;
            }
            _ => match star {
                // backtrack: let the last star swallow one more character
                Some((star_pi, star_ti)) => {
                    pi = star_pi + 1;
                    ti = star_ti + 1;
                    star = Some((star_pi, star_ti + 1));
                }
                None => return false,
            },
        }
    }

    pattern[pi..].iter().all(|c| *c == '*')
}
