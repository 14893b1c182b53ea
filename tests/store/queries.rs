//! Book search and time-range queries.

use bookstore::{Author, Book, BookSearch, EntityStore, Order, OrderItem, SalesReport};
use chrono::{Duration, TimeZone, Utc};

use crate::support::{book, ctx};

fn library() -> EntityStore<Book> {
    let ctx = ctx();
    let store = EntityStore::in_memory();
    store.create(&ctx, book("Dune", 9.99, 5)).unwrap();
    store
        .create(
            &ctx,
            Book {
                title: "The Hobbit".into(),
                author: Author {
                    first_name: "J.R.R.".into(),
                    last_name: "Tolkien".into(),
                    ..Default::default()
                },
                genres: vec!["Fantasy".into()],
                published_at: Utc.with_ymd_and_hms(1937, 9, 21, 0, 0, 0).unwrap(),
                price: 14.5,
                stock: 0,
                ..Default::default()
            },
        )
        .unwrap();
    store.create(&ctx, book("Children of Dune", 12.0, 2)).unwrap();
    store
}

fn titles(books: Vec<Book>) -> Vec<String> {
    books.into_iter().map(|b| b.title).collect()
}

#[test]
fn search_combines_criteria() {
    let store = library();
    let found = store
        .search(
            &ctx(),
            &BookSearch {
                title: "dune".into(),
                min_price: 10.0,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(titles(found), vec!["Children of Dune"]);
}

#[test]
fn search_by_author_full_name_and_genre() {
    let store = library();
    let by_author = store
        .search(
            &ctx(),
            &BookSearch {
                author: "j.r.r. tolkien".into(),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(titles(by_author), vec!["The Hobbit"]);

    let by_genre = store
        .search(
            &ctx(),
            &BookSearch {
                genres: vec!["science fiction".into()],
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(titles(by_genre), vec!["Dune", "Children of Dune"]);
}

#[test]
fn zero_stock_bound_means_unbounded() {
    let store = library();
    let found = store
        .search(
            &ctx(),
            &BookSearch {
                max_stock: 0,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(found.len(), 3);

    let in_stock = store
        .search(
            &ctx(),
            &BookSearch {
                min_stock: 1,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(titles(in_stock), vec!["Dune", "Children of Dune"]);
}

#[test]
fn orders_created_between_is_inclusive() {
    let ctx = ctx();
    let store = EntityStore::<Order>::in_memory();
    let order = store
        .create(
            &ctx,
            Order {
                items: vec![OrderItem {
                    book: book("Dune", 9.99, 1),
                    quantity: 1,
                }],
                ..Default::default()
            },
        )
        .unwrap();

    let at = order.created_at;
    assert_eq!(store.created_between(&ctx, at, at).unwrap().len(), 1);
    assert!(store
        .created_between(&ctx, at + Duration::milliseconds(1), at + Duration::hours(1))
        .unwrap()
        .is_empty());
}

#[test]
fn reports_generated_between_is_inclusive() {
    let ctx = ctx();
    let store = EntityStore::<SalesReport>::in_memory();
    let day = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    for offset in [0, 1, 2] {
        store
            .create(
                &ctx,
                SalesReport {
                    timestamp: day + Duration::days(offset),
                    ..Default::default()
                },
            )
            .unwrap();
    }

    let found = store
        .generated_between(&ctx, day, day + Duration::days(1))
        .unwrap();
    assert_eq!(found.len(), 2);
}
