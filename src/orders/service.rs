use std::sync::Arc;

use log::{info, warn};

use crate::context::Context;
use crate::entity::EntityId;
use crate::error::{Error, Result};
use crate::models::{Book, Customer, Order, OrderItem, OrderStatus};
use crate::store::EntityStore;

/// Coordinates the book, customer and order stores for order writes.
#[derive(Clone)]
pub struct OrderService {
    books: Arc<EntityStore<Book>>,
    customers: Arc<EntityStore<Customer>>,
    orders: Arc<EntityStore<Order>>,
}

impl OrderService {
    pub fn new(
        books: Arc<EntityStore<Book>>,
        customers: Arc<EntityStore<Customer>>,
        orders: Arc<EntityStore<Order>>,
    ) -> Self {
        Self {
            books,
            customers,
            orders,
        }
    }

    /// Place an order, reserving stock for each line in list order.
    ///
    /// Only `customer.id`, `items[].book.id` and `items[].quantity` are read
    /// from `draft`. The stored order embeds the current customer and book
    /// records, is priced from current book prices and starts `pending`.
    pub fn create_order(&self, ctx: &Context, draft: Order) -> Result<Order> {
        validate_draft(&draft)?;
        let customer = self.customers.get(ctx, draft.customer.id)?;

        let mut reserved: Vec<(EntityId, u32)> = Vec::with_capacity(draft.items.len());
        let mut items = Vec::with_capacity(draft.items.len());
        for line in &draft.items {
            match self.reserve(ctx, line.book.id, line.quantity) {
                Ok(book) => {
                    reserved.push((book.id, line.quantity));
                    items.push(OrderItem {
                        book,
                        quantity: line.quantity,
                    });
                }
                Err(err) => {
                    if !reserved.is_empty() {
                        warn!(
                            "event=order_create module=orders status=partial reserved_books={:?} failed_book={} error={}",
                            reserved, line.book.id, err
                        );
                    }
                    return Err(err);
                }
            }
        }

        let mut order = Order {
            customer,
            items,
            status: OrderStatus::Pending,
            ..Default::default()
        };
        order.total_price = order.items_total();

        match self.orders.create(ctx, order) {
            Ok(order) => {
                info!(
                    "event=order_create module=orders status=ok id={} items={} total={:.2}",
                    order.id,
                    order.items.len(),
                    order.total_price
                );
                Ok(order)
            }
            Err(err) => {
                let released: Vec<(EntityId, i64)> = reserved
                    .iter()
                    .map(|&(id, quantity)| (id, i64::from(quantity)))
                    .collect();
                self.undo(&released);
                Err(err)
            }
        }
    }

    /// Replace an order's lines, status and customer, adjusting stock by the per-book difference.
    pub fn update_order(&self, ctx: &Context, id: EntityId, draft: Order) -> Result<Order> {
        validate_draft(&draft)?;
        let existing = self.orders.get(ctx, id)?;

        let customer = if draft.customer.id == existing.customer.id {
            existing.customer.clone()
        } else {
            self.customers.get(ctx, draft.customer.id)?
        };

        let mut applied: Vec<(EntityId, i64)> = Vec::new();
        for (book_id, delta) in stock_deltas(&existing, &draft)? {
            let result = if delta > 0 {
                self.reserve(ctx, book_id, delta.unsigned_abs() as u32)
            } else {
                self.release(ctx, book_id, delta.unsigned_abs() as u32)
            };
            match result {
                Ok(_) => applied.push((book_id, delta)),
                Err(err) if delta < 0 && err.is_not_found() => {
                    warn!(
                        "event=order_update module=orders status=skipped order_id={} book_id={} reason=book_missing",
                        id, book_id
                    );
                }
                Err(err) => {
                    if !applied.is_empty() {
                        warn!(
                            "event=order_update module=orders status=partial order_id={} applied={:?} failed_book={} error={}",
                            id, applied, book_id, err
                        );
                    }
                    return Err(err);
                }
            }
        }

        let items = match self.priced_items(ctx, &draft) {
            Ok(items) => items,
            Err(err) => {
                self.undo(&applied);
                return Err(err);
            }
        };

        let mut order = Order {
            id,
            customer,
            items,
            status: draft.status,
            created_at: existing.created_at,
            ..Default::default()
        };
        order.total_price = order.items_total();

        match self.orders.update(ctx, id, order) {
            Ok(order) => {
                info!(
                    "event=order_update module=orders status=ok id={} items={} total={:.2}",
                    order.id,
                    order.items.len(),
                    order.total_price
                );
                Ok(order)
            }
            Err(err) => {
                self.undo(&applied);
                Err(err)
            }
        }
    }

    /// Return every line's quantity to stock, then delete the order.
    ///
    /// Books that have since been deleted are skipped. Any other release
    /// failure, or a failure to delete the order, puts back the stock
    /// released so far and returns the error with the order still stored.
    pub fn delete_order(&self, ctx: &Context, id: EntityId) -> Result<Order> {
        let order = self.orders.get(ctx, id)?;

        let mut released: Vec<(EntityId, i64)> = Vec::new();
        for (book_id, quantity) in order.quantities()? {
            match self.release(ctx, book_id, quantity) {
                Ok(_) => released.push((book_id, -i64::from(quantity))),
                Err(err) if err.is_not_found() => {
                    warn!(
                        "event=order_delete module=orders status=skipped order_id={} book_id={} reason=book_missing",
                        id, book_id
                    );
                }
                Err(err) => {
                    warn!(
                        "event=order_delete module=orders status=error order_id={} book_id={} quantity={} error={}",
                        id, book_id, quantity, err
                    );
                    self.undo(&released);
                    return Err(err);
                }
            }
        }

        if let Err(err) = self.orders.delete(ctx, id) {
            self.undo(&released);
            return Err(err);
        }

        info!("event=order_delete module=orders status=ok id={}", id);
        Ok(order)
    }

    pub fn get_order(&self, ctx: &Context, id: EntityId) -> Result<Order> {
        self.orders.get(ctx, id)
    }

    pub fn list_orders(&self, ctx: &Context) -> Result<Vec<Order>> {
        self.orders.list(ctx)
    }

    /// Draft lines with the current book records embedded.
    fn priced_items(&self, ctx: &Context, draft: &Order) -> Result<Vec<OrderItem>> {
        draft
            .items
            .iter()
            .map(|line| {
                Ok(OrderItem {
                    book: self.books.get(ctx, line.book.id)?,
                    quantity: line.quantity,
                })
            })
            .collect()
    }

    fn reserve(&self, ctx: &Context, book_id: EntityId, quantity: u32) -> Result<Book> {
        self.books.modify(ctx, book_id, |book| {
            if book.stock < quantity {
                return Err(Error::InsufficientStock {
                    book_id,
                    title: book.title.clone(),
                    available: book.stock,
                    requested: quantity,
                });
            }
            book.stock -= quantity;
            Ok(())
        })
    }

    fn release(&self, ctx: &Context, book_id: EntityId, quantity: u32) -> Result<Book> {
        self.books.modify(ctx, book_id, |book| {
            book.stock = book.stock.saturating_add(quantity);
            Ok(())
        })
    }

    /// Reverse stock changes after a later step failed.
    ///
    /// Positive deltas were reservations and are released; negative ones were releases and are reserved again.
    fn undo(&self, applied: &[(EntityId, i64)]) {
        let detached = Context::background();
        for &(book_id, delta) in applied {
            let quantity = delta.unsigned_abs() as u32;
            let result = if delta > 0 {
                self.release(&detached, book_id, quantity)
            } else {
                self.reserve(&detached, book_id, quantity)
            };
            match result {
                Ok(_) => info!(
                    "event=stock_compensate module=orders status=ok book_id={} delta={}",
                    book_id, -delta
                ),
                Err(err) => warn!(
                    "event=stock_compensate module=orders status=error book_id={} delta={} error={}",
                    book_id, -delta, err
                ),
            }
        }
    }
}

fn validate_draft(draft: &Order) -> Result<()> {
    if draft.customer.id == 0 {
        return Err(Error::validation("order", "customer id is required"));
    }
    if draft.items.is_empty() {
        return Err(Error::validation("order", "items is required"));
    }
    for line in &draft.items {
        if line.book.id == 0 {
            return Err(Error::validation("order", "book id is required"));
        }
        if line.quantity == 0 {
            return Err(Error::validation(
                "order",
                format!("quantity for book {} must be positive", line.book.id),
            ));
        }
    }
    draft.quantities()?;
    Ok(())
}

/// `new − old` quantity per book over the union of both orders, skipping zero deltas.
///
/// Books appear in the order they are first seen in `old`, then `new`.
fn stock_deltas(old: &Order, new: &Order) -> Result<Vec<(EntityId, i64)>> {
    let old_quantities = old.quantities()?;
    let new_quantities = new.quantities()?;

    let mut book_ids: Vec<EntityId> = old_quantities.iter().map(|(id, _)| *id).collect();
    for (id, _) in &new_quantities {
        if !book_ids.contains(id) {
            book_ids.push(*id);
        }
    }

    let quantity_of = |quantities: &[(EntityId, u32)], id: EntityId| {
        quantities
            .iter()
            .find(|(book_id, _)| *book_id == id)
            .map_or(0, |(_, quantity)| i64::from(*quantity))
    };

    Ok(book_ids
        .into_iter()
        .map(|id| (id, quantity_of(&new_quantities, id) - quantity_of(&old_quantities, id)))
        .filter(|(_, delta)| *delta != 0)
        .collect())
}
