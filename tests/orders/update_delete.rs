//! Order updates move the per-book difference; deletes release everything.

use bookstore::{Error, OrderStatus};

use crate::support::Shop;

#[test]
fn update_reserves_increase_and_releases_decrease() {
    let shop = Shop::new();
    let a = shop.add_book("A", 2.0, 10);
    let b = shop.add_book("B", 3.0, 10);
    let service = &shop.app.order_service;

    let order = service
        .create_order(&shop.ctx, shop.draft(&[(a.id, 4), (b.id, 1)]))
        .unwrap();
    assert_eq!((shop.stock(a.id), shop.stock(b.id)), (6, 9));

    let updated = service
        .update_order(&shop.ctx, order.id, shop.draft(&[(a.id, 1), (b.id, 5)]))
        .unwrap();

    assert_eq!((shop.stock(a.id), shop.stock(b.id)), (9, 5));
    assert_eq!(updated.total_price, 17.0);
    assert_eq!(updated.created_at, order.created_at);
}

#[test]
fn update_releases_books_dropped_from_the_order() {
    let shop = Shop::new();
    let a = shop.add_book("A", 1.0, 5);
    let b = shop.add_book("B", 1.0, 5);
    let service = &shop.app.order_service;

    let order = service
        .create_order(&shop.ctx, shop.draft(&[(a.id, 2)]))
        .unwrap();
    service
        .update_order(&shop.ctx, order.id, shop.draft(&[(b.id, 3)]))
        .unwrap();

    assert_eq!(shop.stock(a.id), 5);
    assert_eq!(shop.stock(b.id), 2);
}

#[test]
fn update_beyond_stock_fails() {
    let shop = Shop::new();
    let a = shop.add_book("A", 1.0, 3);
    let service = &shop.app.order_service;

    let order = service
        .create_order(&shop.ctx, shop.draft(&[(a.id, 2)]))
        .unwrap();
    let err = service
        .update_order(&shop.ctx, order.id, shop.draft(&[(a.id, 4)]))
        .unwrap_err();

    assert!(matches!(
        err,
        Error::InsufficientStock {
            available: 1,
            requested: 2,
            ..
        }
    ));
    assert_eq!(shop.stock(a.id), 1);
    assert_eq!(service.get_order(&shop.ctx, order.id).unwrap().items[0].quantity, 2);
}

#[test]
fn update_with_overflowing_book_total_is_rejected() {
    let shop = Shop::new();
    let a = shop.add_book("A", 1.0, 10);
    let service = &shop.app.order_service;

    let order = service
        .create_order(&shop.ctx, shop.draft(&[(a.id, 2)]))
        .unwrap();
    let err = service
        .update_order(&shop.ctx, order.id, shop.draft(&[(a.id, u32::MAX), (a.id, 1)]))
        .unwrap_err();

    assert!(matches!(err, Error::Validation { kind: "order", .. }));
    assert_eq!(shop.stock(a.id), 8);
    assert_eq!(service.get_order(&shop.ctx, order.id).unwrap(), order);
}

#[test]
fn update_can_change_status() {
    let shop = Shop::new();
    let a = shop.add_book("A", 1.0, 3);
    let service = &shop.app.order_service;
    let order = service
        .create_order(&shop.ctx, shop.draft(&[(a.id, 1)]))
        .unwrap();

    let mut input = shop.draft(&[(a.id, 1)]);
    input.status = OrderStatus::Shipped;
    let updated = service.update_order(&shop.ctx, order.id, input).unwrap();

    assert_eq!(updated.status, OrderStatus::Shipped);
    assert_eq!(shop.stock(a.id), 2);
}

#[test]
fn delete_releases_all_quantities() {
    let shop = Shop::new();
    let a = shop.add_book("A", 1.0, 5);
    let b = shop.add_book("B", 1.0, 5);
    let service = &shop.app.order_service;

    let order = service
        .create_order(&shop.ctx, shop.draft(&[(a.id, 2), (b.id, 5)]))
        .unwrap();
    service.delete_order(&shop.ctx, order.id).unwrap();

    assert_eq!((shop.stock(a.id), shop.stock(b.id)), (5, 5));
    assert!(service.get_order(&shop.ctx, order.id).unwrap_err().is_not_found());
}

#[test]
fn delete_skips_books_that_no_longer_exist() {
    let shop = Shop::new();
    let a = shop.add_book("A", 1.0, 5);
    let gone = shop.add_book("Gone", 1.0, 5);
    let service = &shop.app.order_service;

    let order = service
        .create_order(&shop.ctx, shop.draft(&[(gone.id, 1), (a.id, 1)]))
        .unwrap();
    shop.app.books.delete(&shop.ctx, gone.id).unwrap();

    service.delete_order(&shop.ctx, order.id).unwrap();
    assert_eq!(shop.stock(a.id), 5);
}

#[test]
fn delete_keeps_order_and_stock_when_release_fails() {
    let shop = Shop::new();
    let a = shop.add_book("A", 1.0, 5);
    let b = shop.add_book("B", 1.0, 5);
    let service = &shop.app.order_service;

    let order = service
        .create_order(&shop.ctx, shop.draft(&[(a.id, 3), (b.id, 1)]))
        .unwrap();

    shop.books_disk.fail_writes(true);
    let err = service.delete_order(&shop.ctx, order.id).unwrap_err();
    shop.books_disk.fail_writes(false);

    assert!(matches!(err, Error::Persistence { .. }));
    assert_eq!(service.get_order(&shop.ctx, order.id).unwrap(), order);
    assert_eq!((shop.stock(a.id), shop.stock(b.id)), (2, 4));
}

#[test]
fn unknown_order_is_not_found() {
    let shop = Shop::new();
    let service = &shop.app.order_service;
    assert!(service.delete_order(&shop.ctx, 77).unwrap_err().is_not_found());
    assert!(service
        .update_order(&shop.ctx, 77, shop.draft(&[(1, 1)]))
        .unwrap_err()
        .is_not_found());
}
