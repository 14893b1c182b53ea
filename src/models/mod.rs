//! Bookstore domain records.
//!
//! Each record derives [`Entity`](crate::Entity) and is persisted by its own
//! `EntityStore`. Records that embed other records (an order's customer, a
//! book's author) hold value copies taken at write time, not references.

mod author;
mod book;
mod customer;
mod order;
mod report;

pub use author::Author;
pub use book::{Book, BookSearch};
pub use customer::{Address, Customer};
pub use order::{Order, OrderItem, OrderStatus};
pub use report::{BookSales, SalesReport};

/// Round a monetary amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
