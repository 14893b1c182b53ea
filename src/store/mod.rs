//! Persisted entity stores.
//!
//! - [`EntityStore`] - generic CRUD store, one instance per entity kind
//! - [`Persistence`] - snapshot adapter seam
//! - [`JsonFilePersistence`] - one JSON file per kind
//! - [`InMemoryPersistence`] - process-local snapshots for tests and demos

mod entity_store;
mod persistence;
mod queries;

pub use entity_store::EntityStore;
pub use persistence::{write_json_atomic, InMemoryPersistence, JsonFilePersistence, Persistence};
