//! Stock reservation protocol tests.

mod update_delete;
