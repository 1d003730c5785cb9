//! Postgres-backed invoice store.
//!
//! Every statement is parameterized; values never reach the SQL text.
//! `amount` is read back through a `BIGINT` cast so tables declaring it as
//! `INT` decode the same way.

use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use invoicedesk_core::{Cents, CustomerId, Invoice, InvoiceChanges, InvoiceId, NewInvoice};

use super::r#trait::InvoiceStore;
use crate::error::{StoreError, map_sqlx_error};

#[derive(Debug, Clone)]
pub struct PostgresInvoiceStore {
    pool: PgPool,
}

impl PostgresInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug)]
struct InvoiceRow {
    id: Uuid,
    customer_id: Uuid,
    amount: i64,
    status: String,
    date: NaiveDate,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for InvoiceRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(InvoiceRow {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            amount: row.try_get("amount")?,
            status: row.try_get("status")?,
            date: row.try_get("date")?,
        })
    }
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = StoreError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let bad = |e: invoicedesk_core::DomainError| {
            StoreError::Database(format!("invoice {} has invalid data: {}", row.id, e))
        };
        Ok(Invoice {
            id: InvoiceId::from_uuid(row.id),
            customer_id: CustomerId::from_uuid(row.customer_id),
            amount: Cents::from_raw(row.amount).map_err(bad)?,
            status: row.status.parse().map_err(bad)?,
            date: row.date,
        })
    }
}

fn decode_rows(rows: Vec<sqlx::postgres::PgRow>, operation: &str) -> Result<Vec<Invoice>, StoreError> {
    use sqlx::FromRow;

    rows.iter()
        .map(|row| {
            InvoiceRow::from_row(row)
                .map_err(|e| map_sqlx_error(operation, e))
                .and_then(Invoice::try_from)
        })
        .collect()
}

#[async_trait::async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    #[instrument(skip_all, fields(customer_id = %invoice.customer_id))]
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(invoice.customer_id.as_uuid())
        .bind(invoice.amount.get())
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_invoice", e))?;

        let id: Uuid = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("insert_invoice", e))?;
        Ok(InvoiceId::from_uuid(id))
    }

    #[instrument(skip_all, fields(invoice_id = %id))]
    async fn update(&self, id: InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $1, amount = $2, status = $3
            WHERE id = $4
            "#,
        )
        .bind(changes.customer_id.as_uuid())
        .bind(changes.amount.get())
        .bind(changes.status.as_str())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_invoice", e))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip_all, fields(invoice_id = %id))]
    async fn delete(&self, id: InvoiceId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_invoice", e))?;

        Ok(result.rows_affected())
    }

    async fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, amount::BIGINT AS amount, status, date
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_invoice", e))?;

        Ok(decode_rows(rows, "get_invoice")?.into_iter().next())
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, amount::BIGINT AS amount, status, date
            FROM invoices
            ORDER BY date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_invoices", e))?;

        decode_rows(rows, "list_invoices")
    }
}
