use serde::{Deserialize, Serialize};

use super::{round_cents, Book, Customer};
use crate::entity::{Entity, EntityId, Timestamp};
use crate::error::{Error, Result};

/// One order line. `book` is a copy of the book as it was when the line was priced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderItem {
    pub book: Book,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Entity)]
#[entity(kind = "order", collection = "orders")]
#[serde(default)]
pub struct Order {
    pub id: EntityId,
    pub customer: Customer,
    #[entity(required)]
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    pub status: OrderStatus,
    #[entity(created_at)]
    pub created_at: Timestamp,
}

impl Order {
    /// Sum of price × quantity over the embedded book copies, in cents precision.
    pub fn items_total(&self) -> f64 {
        round_cents(
            self.items
                .iter()
                .map(|item| item.book.price * f64::from(item.quantity))
                .sum(),
        )
    }

    /// Quantity per book id, in first-seen order. Repeated lines for the same book are summed.
    ///
    /// Fails with `Error::Validation` when a book's summed quantity does not fit in `u32`.
    pub fn quantities(&self) -> Result<Vec<(EntityId, u32)>> {
        let mut totals: Vec<(EntityId, u32)> = Vec::new();
        for item in &self.items {
            match totals.iter_mut().find(|(id, _)| *id == item.book.id) {
                Some((id, quantity)) => {
                    *quantity = quantity.checked_add(item.quantity).ok_or_else(|| {
                        Error::validation(
                            Self::KIND,
                            format!("total quantity for book {} is too large", id),
                        )
                    })?;
                }
                None => totals.push((item.book.id, item.quantity)),
            }
        }
        Ok(totals)
    }
}
