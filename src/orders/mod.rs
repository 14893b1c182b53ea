//! Order placement with book stock reservation.
//!
//! [`OrderService`] keeps `Book::stock` in step with the quantities held by
//! live orders: creating an order reserves stock, updating it reserves or
//! releases the per-book difference, and deleting it releases everything.
//!
//! Each single-book reservation is an atomic `EntityStore::modify`, so two
//! orders can never both take the last copy. The sequence across several
//! books, and across the book and order stores, is not atomic: when item `k`
//! of an order fails, items `1..k-1` stay reserved.

mod service;

pub use service::OrderService;
