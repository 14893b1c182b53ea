//! Entities - identifier-bearing records owned by an `EntityStore`.
//!
//! Every stored kind implements [`Entity`], usually through
//! `#[derive(Entity)]`:
//!
//! ```ignore
//! use bookstore::{Entity, EntityId};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Entity)]
//! #[entity(kind = "author", collection = "authors")]
//! pub struct Author {
//!     #[serde(default)]
//!     pub id: EntityId,
//!     #[entity(required)]
//!     pub first_name: String,
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

pub use bookstore_macros::Entity;

/// Store-assigned identifier. Starts at 1 and is never reused.
pub type EntityId = u64;

/// Instant type for every server-side timestamp.
pub type Timestamp = DateTime<Utc>;

/// Capability set required by `EntityStore<T>`.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Singular kind name used in error messages (e.g. "book").
    const KIND: &'static str;

    /// Plural collection name used for routes and snapshot files (e.g. "books").
    const COLLECTION: &'static str;

    fn id(&self) -> EntityId;

    fn set_id(&mut self, id: EntityId);

    /// Reject records with missing required fields.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Fill server-computed fields when the record is first stored.
    fn stamp_created(&mut self, _now: Timestamp) {}

    /// Copy immutable server-owned fields from the stored record on update.
    fn retain_server_fields(&mut self, _existing: &Self) {}
}

/// Presence check used by `#[entity(required)]` fields.
pub trait Required {
    fn is_missing(&self) -> bool;
}

impl Required for String {
    fn is_missing(&self) -> bool {
        self.trim().is_empty()
    }
}

impl<T> Required for Vec<T> {
    fn is_missing(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Required for Option<T> {
    fn is_missing(&self) -> bool {
        self.is_none()
    }
}

/// Sign check used by `#[entity(non_negative)]` fields. NaN counts as negative.
pub trait NonNegative {
    fn is_negative(&self) -> bool;
}

impl NonNegative for f64 {
    fn is_negative(&self) -> bool {
        self.is_nan() || *self < 0.0
    }
}

impl NonNegative for i64 {
    fn is_negative(&self) -> bool {
        *self < 0
    }
}
