//! HTTP transport over the bookstore stores.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /ping` - liveness probe, answers `pong`.
//! - `GET|POST /api/books`, `GET|PUT|DELETE /api/books/:id` - `GET /api/books` searches.
//! - `GET|POST /api/authors`, `GET|PUT|DELETE /api/authors/:id`
//! - `GET|POST /api/customers`, `GET|PUT|DELETE /api/customers/:id`
//! - `GET|POST /api/orders`, `GET|PUT|DELETE /api/orders/:id` - stock-reserving order writes.
//! - `GET /api/reports/sales?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD`
//!
//! Errors are returned as `{ "error": "<message>" }` with the status from
//! [`Error::status_code`](crate::Error::status_code).
//!
//! ## Example
//!
//! ```ignore
//! use bookstore::{http, Bookstore, Context};
//!
//! let app = Bookstore::open(&config)?;
//! let root = Context::background();
//! http::serve(app, root, "0.0.0.0:8080", async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! ```

mod error;
mod handlers;
mod query;

use std::future::Future;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use log::info;

use crate::app::Bookstore;
use crate::context::Context;
use crate::models::{Author, Book, Customer};

pub use error::ApiError;
pub use handlers::StoreAccess;
pub use query::{BookQuery, ReportQuery};

/// Deadline applied to every request's context.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared handler state: the stores and the root context requests derive from.
#[derive(Clone)]
pub struct AppState {
    pub app: Bookstore,
    pub root: Context,
}

impl AppState {
    fn request_context(&self) -> Context {
        self.root.with_timeout(REQUEST_TIMEOUT)
    }
}

/// Build the axum `Router` for `app`. Request contexts are children of `root`.
pub fn router(app: Bookstore, root: Context) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route(
            "/api/books",
            get(handlers::search_books).post(handlers::create_entity::<Book>),
        )
        .route(
            "/api/books/:id",
            get(handlers::get_entity::<Book>)
                .put(handlers::update_entity::<Book>)
                .delete(handlers::delete_entity::<Book>),
        )
        .route(
            "/api/authors",
            get(handlers::list_entities::<Author>).post(handlers::create_entity::<Author>),
        )
        .route(
            "/api/authors/:id",
            get(handlers::get_entity::<Author>)
                .put(handlers::update_entity::<Author>)
                .delete(handlers::delete_entity::<Author>),
        )
        .route(
            "/api/customers",
            get(handlers::list_entities::<Customer>).post(handlers::create_entity::<Customer>),
        )
        .route(
            "/api/customers/:id",
            get(handlers::get_entity::<Customer>)
                .put(handlers::update_entity::<Customer>)
                .delete(handlers::delete_entity::<Customer>),
        )
        .route(
            "/api/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route(
            "/api/orders/:id",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .route("/api/reports/sales", get(handlers::sales_reports))
        .with_state(AppState { app, root })
}

/// Serve `app` at `addr` until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(app: Bookstore, root: Context, addr: &str, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "event=http_listen module=http status=ok addr={}",
        listener.local_addr()?
    );
    axum::serve(listener, router(app, root))
        .with_graceful_shutdown(shutdown)
        .await
}
