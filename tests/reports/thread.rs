//! Scheduling and shutdown of the background reporter.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bookstore::{Context, SalesReporterThread};

use crate::support::Shop;

fn wait_until(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
    let started = Instant::now();
    while started.elapsed() < timeout {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    done()
}

#[test]
fn generates_immediately_and_then_on_each_tick() {
    let shop = Shop::new();
    let root = Context::background();
    let engine = SalesReporterThread::spawn(
        Arc::clone(&shop.app.reporter),
        Duration::from_millis(30),
        &root,
    );

    assert!(wait_until(Duration::from_secs(5), || {
        shop.app.reports.len(&shop.ctx).unwrap() >= 3
    }));
    assert!(engine.is_running());

    let stats = engine.stop();
    assert!(stats.reports_generated >= 3);
    assert_eq!(stats.reports_failed, 0);
    assert!(stats.ticks >= stats.reports_generated);
}

#[test]
fn stop_returns_promptly_with_long_interval() {
    let shop = Shop::new();
    let root = Context::background();
    let engine = SalesReporterThread::spawn(
        Arc::clone(&shop.app.reporter),
        Duration::from_secs(3600),
        &root,
    );
    assert!(wait_until(Duration::from_secs(5), || {
        shop.app.reports.len(&shop.ctx).unwrap() == 1
    }));

    let started = Instant::now();
    let stats = engine.stop();
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(stats.reports_generated, 1);
}

#[test]
fn parent_cancellation_stops_the_engine() {
    let shop = Shop::new();
    let root = Context::background();
    let engine = SalesReporterThread::spawn(
        Arc::clone(&shop.app.reporter),
        Duration::from_secs(3600),
        &root,
    );
    assert!(wait_until(Duration::from_secs(5), || {
        shop.app.reports.len(&shop.ctx).unwrap() == 1
    }));

    root.cancel();
    assert!(wait_until(Duration::from_secs(1), || !engine.is_running()));

    let stats = engine.stop();
    assert_eq!(stats.reports_generated, 1);
    assert_eq!(stats.reports_failed, 0);
}
