//! The type-erased snapshot the store hands to subscribers.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A resource snapshot behind a shared pointer.
///
/// Every subscriber notified for one change sees the same allocation;
/// cloning only bumps the count.
#[derive(Clone)]
pub struct StateValue(Arc<dyn Any + Send + Sync>);

impl StateValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// `None` on a type mismatch.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Owned copy of the snapshot, if it is a `T`.
    pub fn cloned<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    pub fn type_id(&self) -> TypeId {
        (*self.0).type_id()
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateValue({:?})", self.type_id())
    }
}

/// Returned by `StateStore::subscribe`; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
