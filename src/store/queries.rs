//! Kind-specific queries layered on `EntityStore::find`.

use super::EntityStore;
use crate::context::Context;
use crate::entity::Timestamp;
use crate::error::Result;
use crate::models::{Book, BookSearch, Order, SalesReport};

impl EntityStore<Book> {
    /// Books matching every criterion set in `search`, sorted by id.
    pub fn search(&self, ctx: &Context, search: &BookSearch) -> Result<Vec<Book>> {
        self.find(ctx, |book| search.matches(book))
    }
}

impl EntityStore<Order> {
    /// Orders created within `[start, end]`, sorted by id.
    pub fn created_between(
        &self,
        ctx: &Context,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<Order>> {
        self.find(ctx, |order| order.created_at >= start && order.created_at <= end)
    }
}

impl EntityStore<SalesReport> {
    /// Reports generated within `[start, end]`, sorted by id.
    pub fn generated_between(
        &self,
        ctx: &Context,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<SalesReport>> {
        self.find(ctx, |report| {
            report.timestamp >= start && report.timestamp <= end
        })
    }
}
