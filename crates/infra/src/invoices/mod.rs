//! Persistence for the `invoices` table.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryInvoiceStore;
pub use postgres::PostgresInvoiceStore;
pub use r#trait::InvoiceStore;
