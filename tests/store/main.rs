//! EntityStore integration tests.

mod concurrency;
mod queries;
