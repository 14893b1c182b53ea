//! Bookstore inventory service.
//!
//! Generic persisted entity stores for books, authors, customers, orders and
//! sales reports; an order service that keeps book stock in step with order
//! quantities; and a background engine that periodically turns recent orders
//! into sales reports and nudges the prices of top sellers.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bookstore::{Bookstore, Context, ReportSettings, Book, Order};
//!
//! let app = Bookstore::in_memory(ReportSettings::default());
//! let ctx = Context::background();
//!
//! let book = app.books.create(&ctx, Book { title: "Dune".into(), price: 9.99, stock: 3, ..Default::default() })?;
//! let order = app.order_service.create_order(&ctx, draft)?;
//! let report = app.reporter.generate_report(&ctx, chrono::Utc::now())?;
//! ```

// Lets `#[derive(Entity)]` expand to `::bookstore::...` paths inside this crate too.
extern crate self as bookstore;

mod app;
mod config;
mod context;
mod entity;
mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod logging;
pub mod models;
mod orders;
pub mod reports;
pub mod store;

pub use app::Bookstore;
pub use config::Config;
pub use context::{CancelReason, Context};
pub use entity::{Entity, EntityId, NonNegative, Required, Timestamp};
pub use error::{Error, Result};
pub use models::{
    Address, Author, Book, BookSales, BookSearch, Customer, Order, OrderItem, OrderStatus,
    SalesReport,
};
pub use orders::OrderService;
pub use reports::{ReportSettings, ReporterStats, SalesReporter, SalesReporterThread};
pub use store::{EntityStore, InMemoryPersistence, JsonFilePersistence, Persistence};
