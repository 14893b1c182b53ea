use serde::{Deserialize, Serialize};

use super::Book;
use crate::entity::{Entity, EntityId, Timestamp};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookSales {
    pub book: Book,
    /// Copies sold across every order in the window.
    pub quantity: u64,
}

/// Aggregate of the orders placed during one reporting window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Entity)]
#[entity(kind = "report", collection = "reports")]
#[serde(default)]
pub struct SalesReport {
    pub id: EntityId,
    pub timestamp: Timestamp,
    pub total_revenue: f64,
    pub total_orders: usize,
    pub top_selling_books: Vec<BookSales>,
}
