//! Concurrent writers and cancellation.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bookstore::{Author, CancelReason, Context, EntityStore, Error};

use crate::support::{author, book, ctx};

#[test]
fn concurrent_creates_get_distinct_ids() {
    let store = Arc::new(EntityStore::<Author>::in_memory());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let ctx = Context::background();
                (0..25)
                    .map(|n| {
                        store
                            .create(&ctx, author(&format!("w{worker}"), &format!("n{n}")))
                            .unwrap()
                            .id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: HashSet<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    assert_eq!(ids.len(), 200);
    assert_eq!(ids.iter().max(), Some(&200));
    assert_eq!(store.len(&ctx()).unwrap(), 200);
}

#[test]
fn concurrent_modifies_never_lose_updates() {
    let store = Arc::new(EntityStore::in_memory());
    let created = store.create(&ctx(), book("Counter", 1.0, 0)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let ctx = Context::background();
                for _ in 0..50 {
                    store
                        .modify(&ctx, created.id, |b| {
                            b.stock += 1;
                            Ok(())
                        })
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.get(&ctx(), created.id).unwrap().stock, 400);
}

#[test]
fn every_operation_fails_fast_on_cancelled_context() {
    let store = EntityStore::<Author>::in_memory();
    let live = ctx();
    let created = store.create(&live, author("Kim", "Stanley")).unwrap();

    let cancelled = live.child();
    cancelled.cancel();
    let expect = Error::Cancelled(CancelReason::Cancelled);

    assert_eq!(store.get(&cancelled, created.id).unwrap_err(), expect);
    assert_eq!(store.list(&cancelled).unwrap_err(), expect);
    assert_eq!(
        store.update(&cancelled, created.id, author("X", "Y")).unwrap_err(),
        expect
    );
    assert_eq!(store.delete(&cancelled, created.id).unwrap_err(), expect);
    assert_eq!(store.create(&cancelled, author("A", "B")).unwrap_err(), expect);

    assert_eq!(store.get(&live, created.id).unwrap(), created);
}

#[test]
fn expired_deadline_is_reported() {
    let store = EntityStore::<Author>::in_memory();
    let ctx = Context::background().with_timeout(Duration::from_millis(5));
    thread::sleep(Duration::from_millis(15));

    assert_eq!(
        store.list(&ctx).unwrap_err(),
        Error::Cancelled(CancelReason::DeadlineExceeded)
    );
}
