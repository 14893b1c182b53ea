use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Duration;
use log::{info, warn};

use super::aggregation::summarize;
use crate::context::Context;
use crate::entity::{EntityId, Timestamp};
use crate::error::{Error, Result};
use crate::models::{round_cents, Book, Order, SalesReport};
use crate::store::{write_json_atomic, EntityStore};

/// Tunables for one report cycle.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Trailing window covered by each report, ending at the generation instant.
    pub window: Duration,
    /// Length of the top-sellers list.
    pub top_sellers: usize,
    /// How many of the top sellers get a price increase.
    pub price_adjustments: usize,
    pub price_increase_percent: f64,
    /// Directory receiving one `report_<timestamp>_<id>.json` file per cycle.
    pub output_dir: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            window: Duration::hours(24),
            top_sellers: 10,
            price_adjustments: 3,
            price_increase_percent: 10.0,
            output_dir: PathBuf::from("reports"),
        }
    }
}

/// `report_<YYYYMMDDHHMMSSmmm>_<id>.json` for report `id` generated at `at`.
pub fn report_file_name(at: Timestamp, id: EntityId) -> String {
    format!("report_{}_{}.json", at.format("%Y%m%d%H%M%S%3f"), id)
}

/// Generates sales reports from the order store.
///
/// Cycles are serialized by an internal mutex; they only reach the stores
/// through their public operations.
pub struct SalesReporter {
    books: Arc<EntityStore<Book>>,
    orders: Arc<EntityStore<Order>>,
    reports: Arc<EntityStore<SalesReport>>,
    settings: ReportSettings,
    cycle: Mutex<()>,
}

impl SalesReporter {
    pub fn new(
        books: Arc<EntityStore<Book>>,
        orders: Arc<EntityStore<Order>>,
        reports: Arc<EntityStore<SalesReport>>,
        settings: ReportSettings,
    ) -> Self {
        Self {
            books,
            orders,
            reports,
            settings,
            cycle: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Run one cycle for the window ending at `now` and return the stored report.
    ///
    /// Fetching orders, storing the report and writing its file must all
    /// succeed. Price adjustments are best effort: each failure is logged and
    /// the remaining books are still adjusted.
    pub fn generate_report(&self, ctx: &Context, now: Timestamp) -> Result<SalesReport> {
        // The guard protects no data, so a cycle that panicked leaves nothing to repair.
        let _cycle = self.cycle.lock().unwrap_or_else(PoisonError::into_inner);
        ctx.check()?;

        let start = now - self.settings.window;
        let orders = self.orders.created_between(ctx, start, now)?;
        let summary = summarize(&orders, self.settings.top_sellers);

        let report = self.reports.create(
            ctx,
            SalesReport {
                timestamp: now,
                total_revenue: summary.total_revenue,
                total_orders: summary.total_orders,
                top_selling_books: summary.top_selling_books,
                ..Default::default()
            },
        )?;

        let dir = &self.settings.output_dir;
        fs::create_dir_all(dir).map_err(|e| Error::persistence(dir.display(), e))?;
        let path = dir.join(report_file_name(now, report.id));
        write_json_atomic(&path, &report)?;

        let adjusted = self.adjust_prices(ctx, &report);

        info!(
            "event=report_generate module=reports status=ok id={} orders={} revenue={:.2} top_sellers={} prices_adjusted={} file={}",
            report.id,
            report.total_orders,
            report.total_revenue,
            report.top_selling_books.len(),
            adjusted,
            path.display()
        );
        Ok(report)
    }

    fn adjust_prices(&self, ctx: &Context, report: &SalesReport) -> usize {
        let factor = 1.0 + self.settings.price_increase_percent / 100.0;
        let mut adjusted = 0;

        for sales in report
            .top_selling_books
            .iter()
            .take(self.settings.price_adjustments)
        {
            let book_id = sales.book.id;
            let result = self.books.modify(ctx, book_id, |book| {
                book.price = round_cents(book.price * factor);
                Ok(())
            });
            match result {
                Ok(book) => {
                    adjusted += 1;
                    info!(
                        "event=price_adjust module=reports status=ok book_id={} price={:.2}",
                        book_id, book.price
                    );
                }
                Err(err) => warn!(
                    "event=price_adjust module=reports status=error book_id={} error={}",
                    book_id, err
                ),
            }
        }

        adjusted
    }
}
