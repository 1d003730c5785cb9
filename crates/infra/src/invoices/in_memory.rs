use std::collections::HashMap;
use std::sync::RwLock;

use invoicedesk_core::{Invoice, InvoiceChanges, InvoiceId, NewInvoice};

use super::r#trait::InvoiceStore;
use crate::error::StoreError;

/// In-memory invoice table.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceStore {
    rows: RwLock<HashMap<InvoiceId, Invoice>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory invoice store lock poisoned".to_string())
}

#[async_trait::async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, StoreError> {
        let id = InvoiceId::new();
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.insert(
            id,
            Invoice {
                id,
                customer_id: invoice.customer_id,
                amount: invoice.amount,
                status: invoice.status,
                date: invoice.date,
            },
        );
        Ok(id)
    }

    async fn update(&self, id: InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        match rows.get_mut(&id) {
            Some(row) => {
                row.apply(&changes);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: InvoiceId) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        Ok(rows.remove(&id).map_or(0, |_| 1))
    }

    async fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        let mut all: Vec<Invoice> = rows.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.as_uuid().cmp(a.id.as_uuid())));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use invoicedesk_core::{Cents, CustomerId, InvoiceStatus};

    fn new_invoice(day: u32) -> NewInvoice {
        NewInvoice {
            customer_id: CustomerId::new(),
            amount: Cents::from_raw(1000).unwrap(),
            status: InvoiceStatus::Pending,
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
        }
    }

    #[tokio::test]
    async fn insert_update_delete() {
        let store = InMemoryInvoiceStore::new();
        let id = store.insert(new_invoice(1)).await.unwrap();

        let changes = InvoiceChanges {
            customer_id: CustomerId::new(),
            amount: Cents::from_raw(2500).unwrap(),
            status: InvoiceStatus::Paid,
        };
        assert_eq!(store.update(id, changes.clone()).await.unwrap(), 1);

        let row = store.get(id).await.unwrap().unwrap();
        assert_eq!(row.amount.get(), 2500);
        assert_eq!(row.status, InvoiceStatus::Paid);
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        assert_eq!(store.delete(id).await.unwrap(), 1);
        assert_eq!(store.delete(id).await.unwrap(), 0);
        assert_eq!(store.update(id, changes).await.unwrap(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = InMemoryInvoiceStore::new();
        store.insert(new_invoice(3)).await.unwrap();
        store.insert(new_invoice(9)).await.unwrap();
        store.insert(new_invoice(5)).await.unwrap();

        let days: Vec<u32> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|i| chrono::Datelike::day(&i.date))
            .collect();
        assert_eq!(days, vec![9, 5, 3]);
    }
}
