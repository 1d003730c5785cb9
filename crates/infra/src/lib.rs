//! Infrastructure layer: Postgres gateway, in-memory stores, view cache.

pub mod cache;
pub mod db;
pub mod error;
pub mod invoices;
pub mod users;

pub use cache::{InMemoryViewCache, ViewCache};
pub use db::{Database, DatabaseConfig};
pub use error::StoreError;
pub use invoices::{InMemoryInvoiceStore, InvoiceStore, PostgresInvoiceStore};
pub use users::{InMemoryUserStore, PostgresUserStore, UserStore};
