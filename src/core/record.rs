//! Record identity

use serde_json::Value;
use std::fmt::Debug;
use std::hash::Hash;

/// A domain record shown in a list view (invoice, employee, stock item...)
///
/// The engine only borrows records. Identity is used by
/// [`Selection`](crate::engine::Selection) to remember rows across criteria
/// changes; every other attribute is read through schema accessors.
pub trait Record {
    /// Identifier type, unique within one collection
    type Id: Clone + Eq + Hash + Debug;

    /// Get the identifier for this record
    fn record_id(&self) -> Self::Id;
}

/// JSON rows are identified by their `"id"` member
///
/// Rows without one fall back to their serialized form so two identical rows
/// share an identity.
impl Record for Value {
    type Id = String;

    fn record_id(&self) -> String {
        match self.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => self.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

impl<R: Record + ?Sized> Record for &R {
    type Id = R::Id;

    fn record_id(&self) -> Self::Id {
        (**self).record_id()
    }
}
