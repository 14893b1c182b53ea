//! Periodic sales reporting.
//!
//! - [`summarize`] - pure aggregation of a window's orders
//! - [`SalesReporter`] - one report cycle: aggregate, store, write file, adjust prices
//! - [`SalesReporterThread`] - runs cycles on a fixed schedule until stopped
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use bookstore::{Context, ReportSettings, SalesReporter, SalesReporterThread};
//!
//! let reporter = Arc::new(SalesReporter::new(books, orders, reports, ReportSettings::default()));
//! let root = Context::background();
//! let engine = SalesReporterThread::spawn(reporter, Duration::from_secs(1440), &root);
//!
//! // ... serve requests ...
//!
//! let stats = engine.stop();
//! println!("generated {} reports", stats.reports_generated);
//! ```

mod aggregation;
mod reporter;
mod thread;

pub use aggregation::{summarize, SalesSummary};
pub use reporter::{report_file_name, ReportSettings, SalesReporter};
pub use thread::{ReporterStats, SalesReporterThread};
