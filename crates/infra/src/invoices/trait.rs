use std::sync::Arc;

use invoicedesk_core::{Invoice, InvoiceChanges, InvoiceId, NewInvoice};

use crate::error::StoreError;

/// Invoice persistence gateway.
///
/// Each mutating call issues exactly one statement; nothing spans a transaction.
#[async_trait::async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a row and return its generated id.
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, StoreError>;

    /// Overwrite customer, amount and status. Returns rows affected.
    async fn update(&self, id: InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError>;

    /// Returns rows affected.
    async fn delete(&self, id: InvoiceId) -> Result<u64, StoreError>;

    async fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError>;

    /// All invoices, newest issue date first.
    async fn list(&self) -> Result<Vec<Invoice>, StoreError>;
}

#[async_trait::async_trait]
impl<S> InvoiceStore for Arc<S>
where
    S: InvoiceStore + ?Sized,
{
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, StoreError> {
        (**self).insert(invoice).await
    }

    async fn update(&self, id: InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError> {
        (**self).update(id, changes).await
    }

    async fn delete(&self, id: InvoiceId) -> Result<u64, StoreError> {
        (**self).delete(id).await
    }

    async fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        (**self).list().await
    }
}
