//! tally-store: SQL persistence for the judging service.
//!
//! Holds the judges registry, the upsert-keyed score store, and the
//! materialized contestant totals. Production runs against Postgres;
//! the same store opens an in-memory SQLite database for tests and
//! local development. All SQL is parameterized and written to the
//! dialect subset both backends accept, so every query runs unchanged
//! on either one.
//!
//! The `Store` is `Clone` + `Send` + `Sync` (a pooled handle) and can
//! be shared across async tasks.

pub mod config;
pub mod error;
pub mod schema;
pub mod store;

pub use config::DbConfig;
pub use error::{StoreError, StoreResult};
pub use store::Store;
