use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::value::{StateValue, SubscriptionId};

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

/// Path-keyed state shared between resources and whatever renders them.
///
/// - `set(path, value)` stores a value and notifies matching subscribers.
/// - `get(path)` reads the current value (Arc clone).
/// - `subscribe(pattern, handler)` registers a change handler.
///
/// Patterns are either an exact path (`groups/list`), a prefix ending in
/// `/#` (`groups/#` matches `groups/list` and `groups` itself), or `#` for
/// everything.
pub struct StateStore {
    values: RwLock<BTreeMap<String, StateValue>>,
    handlers: RwLock<Vec<HandlerEntry>>,
    next_id: AtomicU64,
}

#[derive(Clone)]
struct HandlerEntry {
    id: SubscriptionId,
    pattern: String,
    handler: ChangeHandler,
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    if pattern == "#" {
        return true;
    }
    match pattern.strip_suffix("/#") {
        Some(prefix) => {
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        }
        None => pattern == path,
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Set a typed value at the given path and notify matching subscribers.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        self.set_value(path, StateValue::new(value));
    }

    pub fn set_value(&self, path: &str, value: StateValue) {
        {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            values.insert(path.to_string(), value.clone());
        }
        // Handlers run outside both locks so they may read the store.
        let matching: Vec<ChangeHandler> = {
            let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
            handlers
                .iter()
                .filter(|e| pattern_matches(&e.pattern, path))
                .map(|e| e.handler.clone())
                .collect()
        };
        for handler in matching {
            handler(path, &value);
        }
    }

    pub fn get(&self, path: &str) -> Option<StateValue> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.get(path).cloned()
    }

    /// Read and clone a typed value. `None` if absent or of another type.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|v| v.cloned())
    }

    /// Remove the value at a path. Does NOT notify subscribers.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.contains_key(path)
    }

    pub fn len(&self) -> usize {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored paths, in order.
    pub fn paths(&self) -> Vec<String> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.keys().cloned().collect()
    }

    /// Subscribe to changes matching `pattern`.
    ///
    /// The handler is called synchronously on the task that calls `set`.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers.push(HandlerEntry {
            id,
            pattern: pattern.to_string(),
            handler: Arc::new(handler),
        });
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|e| e.id != id);
        handlers.len() < before
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
