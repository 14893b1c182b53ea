use crate::entity::EntityId;
use crate::models::{round_cents, BookSales, Order};

/// Totals for one reporting window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesSummary {
    pub total_revenue: f64,
    pub total_orders: usize,
    pub top_selling_books: Vec<BookSales>,
}

/// Aggregate `orders` into revenue, order count and the `top` best sellers.
///
/// Quantities are summed per book id. Books enter the ranking in the order
/// they are first seen (orders in the given order, items in list order) and
/// the sort by quantity is stable, so ties keep that first-seen order. The
/// `BookSales::book` copy is taken from the first line that mentions it.
pub fn summarize(orders: &[Order], top: usize) -> SalesSummary {
    let mut sales: Vec<BookSales> = Vec::new();
    let mut total_revenue = 0.0;

    for order in orders {
        total_revenue += order.total_price;
        for item in &order.items {
            match position(&sales, item.book.id) {
                Some(index) => sales[index].quantity += u64::from(item.quantity),
                None => sales.push(BookSales {
                    book: item.book.clone(),
                    quantity: u64::from(item.quantity),
                }),
            }
        }
    }

    sales.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    sales.truncate(top);

    SalesSummary {
        total_revenue: round_cents(total_revenue),
        total_orders: orders.len(),
        top_selling_books: sales,
    }
}

fn position(sales: &[BookSales], book_id: EntityId) -> Option<usize> {
    sales.iter().position(|entry| entry.book.id == book_id)
}
