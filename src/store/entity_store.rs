//! EntityStore - RwLock-guarded map of one entity kind, snapshotted on every write.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use log::{debug, info, warn};

use super::persistence::{InMemoryPersistence, JsonFilePersistence, Persistence};
use crate::context::Context;
use crate::entity::{Entity, EntityId};
use crate::error::{Error, Result};

struct State<T> {
    items: HashMap<EntityId, T>,
    next_id: EntityId,
}

/// Thread-safe store for one entity kind.
///
/// Readers share the lock; writers hold it exclusively across the mutation
/// and the snapshot write, so the snapshot always reflects the last
/// mutation that succeeded. When the snapshot write fails the in-memory
/// state is restored and the error is returned.
pub struct EntityStore<T: Entity> {
    state: RwLock<State<T>>,
    persistence: Box<dyn Persistence<T>>,
}

impl<T: Entity> EntityStore<T> {
    /// Open a JSON-file backed store, loading any existing snapshot.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_persistence(JsonFilePersistence::new(path.as_ref())?)
    }

    /// Open a store over any persistence adapter, loading its snapshot.
    pub fn with_persistence(persistence: impl Persistence<T> + 'static) -> Result<Self> {
        let loaded = persistence.load()?;
        let mut items = HashMap::with_capacity(loaded.len());
        for item in loaded {
            items.insert(item.id(), item);
        }
        let next_id = items.keys().max().map_or(1, |max| max + 1);

        info!(
            "event=store_open module=store status=ok kind={} location={} count={} next_id={}",
            T::KIND,
            persistence.location(),
            items.len(),
            next_id
        );

        Ok(Self {
            state: RwLock::new(State { items, next_id }),
            persistence: Box::new(persistence),
        })
    }

    /// An empty store whose snapshot lives in process memory.
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(State {
                items: HashMap::new(),
                next_id: 1,
            }),
            persistence: Box::new(InMemoryPersistence::new()),
        }
    }

    pub fn location(&self) -> String {
        self.persistence.location()
    }

    /// Validate, assign the next id, stamp server fields, and store `entity`.
    pub fn create(&self, ctx: &Context, mut entity: T) -> Result<T> {
        ctx.check()?;
        entity.validate()?;

        let mut state = self.write()?;
        let id = state.next_id;
        entity.set_id(id);
        entity.stamp_created(Utc::now());
        state.items.insert(id, entity.clone());
        state.next_id = id + 1;

        if let Err(err) = self.persist(&state) {
            state.items.remove(&id);
            state.next_id = id;
            warn!(
                "event=entity_create module=store status=reverted kind={} id={} error={}",
                T::KIND,
                id,
                err
            );
            return Err(err);
        }

        debug!(
            "event=entity_create module=store status=ok kind={} id={}",
            T::KIND,
            id
        );
        Ok(entity)
    }

    pub fn get(&self, ctx: &Context, id: EntityId) -> Result<T> {
        ctx.check()?;
        let state = self.read()?;
        state.items.get(&id).cloned().ok_or(Error::NotFound {
            kind: T::KIND,
            id,
        })
    }

    /// Replace the record stored under `id`. The id and server-owned fields are kept.
    pub fn update(&self, ctx: &Context, id: EntityId, value: T) -> Result<T> {
        self.modify(ctx, id, move |current| {
            *current = value;
            Ok(())
        })
    }

    /// Atomic read-modify-write of one record.
    ///
    /// `f` runs under the exclusive lock on a copy of the stored record. An
    /// error from `f` (or from validating its result) leaves the store untouched.
    pub fn modify<F>(&self, ctx: &Context, id: EntityId, f: F) -> Result<T>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        ctx.check()?;

        let mut state = self.write()?;
        let existing = state
            .items
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound { kind: T::KIND, id })?;

        let mut next = existing.clone();
        f(&mut next)?;
        next.set_id(id);
        next.retain_server_fields(&existing);
        next.validate()?;

        state.items.insert(id, next.clone());
        if let Err(err) = self.persist(&state) {
            state.items.insert(id, existing);
            warn!(
                "event=entity_update module=store status=reverted kind={} id={} error={}",
                T::KIND,
                id,
                err
            );
            return Err(err);
        }

        debug!(
            "event=entity_update module=store status=ok kind={} id={}",
            T::KIND,
            id
        );
        Ok(next)
    }

    /// Remove and return the record stored under `id`.
    pub fn delete(&self, ctx: &Context, id: EntityId) -> Result<T> {
        ctx.check()?;

        let mut state = self.write()?;
        let removed = state
            .items
            .remove(&id)
            .ok_or(Error::NotFound { kind: T::KIND, id })?;

        if let Err(err) = self.persist(&state) {
            state.items.insert(id, removed);
            warn!(
                "event=entity_delete module=store status=reverted kind={} id={} error={}",
                T::KIND,
                id,
                err
            );
            return Err(err);
        }

        debug!(
            "event=entity_delete module=store status=ok kind={} id={}",
            T::KIND,
            id
        );
        Ok(removed)
    }

    /// Every record, sorted by id.
    pub fn list(&self, ctx: &Context) -> Result<Vec<T>> {
        self.find(ctx, |_| true)
    }

    /// Records matching `predicate`, sorted by id.
    pub fn find<P>(&self, ctx: &Context, predicate: P) -> Result<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        ctx.check()?;
        let state = self.read()?;
        let mut found: Vec<T> = state
            .items
            .values()
            .filter(|item| predicate(item))
            .cloned()
            .collect();
        found.sort_by_key(|item| item.id());
        Ok(found)
    }

    pub fn len(&self, ctx: &Context) -> Result<usize> {
        ctx.check()?;
        Ok(self.read()?.items.len())
    }

    pub fn is_empty(&self, ctx: &Context) -> Result<bool> {
        Ok(self.len(ctx)? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State<T>>> {
        self.state.read().map_err(|_| Error::LockPoisoned("read"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State<T>>> {
        self.state.write().map_err(|_| Error::LockPoisoned("write"))
    }

    // Only reachable with state borrowed from the write guard.
    fn persist(&self, state: &State<T>) -> Result<()> {
        let mut items: Vec<&T> = state.items.values().collect();
        items.sort_by_key(|item| item.id());
        self.persistence.save(&items)
    }
}
