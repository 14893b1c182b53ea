//! Store wiring shared by the binary, the HTTP layer and tests.

use std::sync::Arc;

use log::info;

use crate::config::Config;
use crate::error::Result;
use crate::models::{Author, Book, Customer, Order, SalesReport};
use crate::orders::OrderService;
use crate::reports::{ReportSettings, SalesReporter};
use crate::store::EntityStore;

/// One store per entity kind plus the collaborators built on top of them.
///
/// Cloning is cheap; clones share the same stores.
#[derive(Clone)]
pub struct Bookstore {
    pub books: Arc<EntityStore<Book>>,
    pub authors: Arc<EntityStore<Author>>,
    pub customers: Arc<EntityStore<Customer>>,
    pub orders: Arc<EntityStore<Order>>,
    pub reports: Arc<EntityStore<SalesReport>>,
    pub order_service: OrderService,
    pub reporter: Arc<SalesReporter>,
}

impl Bookstore {
    /// Open every store from the snapshot files named in `config`.
    pub fn open(config: &Config) -> Result<Self> {
        let store = Self::from_stores(
            Arc::new(EntityStore::open(&config.books)?),
            Arc::new(EntityStore::open(&config.authors)?),
            Arc::new(EntityStore::open(&config.customers)?),
            Arc::new(EntityStore::open(&config.orders)?),
            Arc::new(EntityStore::open(&config.reports)?),
            config.report_settings(),
        );
        info!(
            "event=bookstore_open module=app status=ok reports_dir={}",
            config.reports_dir.display()
        );
        Ok(store)
    }

    /// Memory-backed stores; reports are still written under `settings.output_dir`.
    pub fn in_memory(settings: ReportSettings) -> Self {
        Self::from_stores(
            Arc::new(EntityStore::in_memory()),
            Arc::new(EntityStore::in_memory()),
            Arc::new(EntityStore::in_memory()),
            Arc::new(EntityStore::in_memory()),
            Arc::new(EntityStore::in_memory()),
            settings,
        )
    }

    pub fn from_stores(
        books: Arc<EntityStore<Book>>,
        authors: Arc<EntityStore<Author>>,
        customers: Arc<EntityStore<Customer>>,
        orders: Arc<EntityStore<Order>>,
        reports: Arc<EntityStore<SalesReport>>,
        settings: ReportSettings,
    ) -> Self {
        let order_service =
            OrderService::new(books.clone(), customers.clone(), orders.clone());
        let reporter = Arc::new(SalesReporter::new(
            books.clone(),
            orders.clone(),
            reports.clone(),
            settings,
        ));
        Self {
            books,
            authors,
            customers,
            orders,
            reports,
            order_service,
            reporter,
        }
    }
}
