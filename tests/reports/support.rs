//! Shared fixtures: a bookstore whose report files land in a temp dir.

#![allow(dead_code)]

use std::path::Path;

use bookstore::{
    Book, Bookstore, Context, Customer, EntityId, Order, OrderItem, ReportSettings,
};

pub struct Shop {
    pub app: Bookstore,
    pub ctx: Context,
    pub customer_id: EntityId,
    reports_dir: tempfile::TempDir,
}

impl Shop {
    pub fn new() -> Self {
        let reports_dir = tempfile::tempdir().unwrap();
        let app = Bookstore::in_memory(ReportSettings {
            output_dir: reports_dir.path().join("out"),
            ..ReportSettings::default()
        });
        let ctx = Context::background();
        let customer_id = app
            .customers
            .create(
                &ctx,
                Customer {
                    name: "Ada".into(),
                    email: "ada@example.com".into(),
                    ..Default::default()
                },
            )
            .unwrap()
            .id;
        Self {
            app,
            ctx,
            customer_id,
            reports_dir,
        }
    }

    pub fn output_dir(&self) -> std::path::PathBuf {
        self.reports_dir.path().join("out")
    }

    pub fn add_book(&self, title: &str, price: f64, stock: u32) -> Book {
        self.app
            .books
            .create(
                &self.ctx,
                Book {
                    title: title.into(),
                    price,
                    stock,
                    ..Default::default()
                },
            )
            .unwrap()
    }

    pub fn order(&self, lines: &[(EntityId, u32)]) -> Order {
        let draft = Order {
            customer: Customer {
                id: self.customer_id,
                ..Default::default()
            },
            items: lines
                .iter()
                .map(|&(id, quantity)| OrderItem {
                    book: Book {
                        id,
                        ..Default::default()
                    },
                    quantity,
                })
                .collect(),
            ..Default::default()
        };
        self.app
            .order_service
            .create_order(&self.ctx, draft)
            .unwrap()
    }

    pub fn price(&self, id: EntityId) -> f64 {
        self.app.books.get(&self.ctx, id).unwrap().price
    }
}

pub fn report_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
