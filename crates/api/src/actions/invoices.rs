//! Invoice mutations.
//!
//! Storage failures on create/update are logged and swallowed: the caller
//! is still redirected to the list, which is re-read from the store.

use chrono::Utc;
use tracing::{error, info, instrument};

use invoicedesk_core::validation::InvoiceForm;
use invoicedesk_core::{ActionState, FormData, InvoiceId};

use super::{ActionContext, ActionError, INVOICES_PATH};

pub const MSG_CREATE_FAILED: &str = "Missing Fields. Failed to Create Invoice.";
pub const MSG_UPDATE_FAILED: &str = "Missing Fields. Failed to Update Invoice.";

#[instrument(skip_all)]
pub async fn create_invoice(ctx: &ActionContext, form: &FormData) -> Result<ActionState, ActionError> {
    let input = match InvoiceForm::parse(form) {
        Ok(input) => input,
        Err(fields) => return Ok(ActionState::field_errors(fields, MSG_CREATE_FAILED)),
    };

    let invoice = input.into_new(Utc::now().date_naive());
    match ctx.invoices.insert(invoice).await {
        Ok(id) => info!(invoice_id = %id, "invoice created"),
        Err(e) => error!(error = %e, "failed to create invoice"),
    }

    ctx.cache.invalidate(INVOICES_PATH);
    Ok(ActionState::redirect(INVOICES_PATH))
}

#[instrument(skip_all, fields(invoice_id = %id))]
pub async fn update_invoice(
    ctx: &ActionContext,
    id: InvoiceId,
    form: &FormData,
) -> Result<ActionState, ActionError> {
    let input = match InvoiceForm::parse(form) {
        Ok(input) => input,
        Err(fields) => return Ok(ActionState::field_errors(fields, MSG_UPDATE_FAILED)),
    };

    match ctx.invoices.update(id, input.into_changes()).await {
        Ok(0) => info!("no invoice with that id"),
        Ok(_) => info!("invoice updated"),
        Err(e) => error!(error = %e, "failed to update invoice"),
    }

    ctx.cache.invalidate(INVOICES_PATH);
    Ok(ActionState::redirect(INVOICES_PATH))
}

#[instrument(skip_all, fields(invoice_id = %id))]
pub async fn delete_invoice(ctx: &ActionContext, id: InvoiceId) -> Result<ActionState, ActionError> {
    match ctx.invoices.delete(id).await {
        Ok(rows) => {
            info!(rows, "invoice deleted");
            ctx.cache.invalidate(INVOICES_PATH);
        }
        Err(e) => error!(error = %e, "failed to delete invoice"),
    }
    Ok(ActionState::done())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use invoicedesk_core::validation::{MSG_AMOUNT, MSG_CUSTOMER, MSG_STATUS};
    use invoicedesk_core::{Cents, CustomerId, InvoiceStatus};
    use invoicedesk_infra::{InMemoryUserStore, InvoiceStore};

    use super::*;
    use crate::actions::testing::*;

    fn valid_form(customer: CustomerId, amount: &str) -> FormData {
        FormData::new()
            .with("customerId", customer.to_string())
            .with("amount", amount)
            .with("status", "pending")
    }

    fn recording(store: RecordingInvoiceStore) -> (Arc<RecordingInvoiceStore>, Harness) {
        let store = Arc::new(store);
        let h = harness(store.clone(), Arc::new(InMemoryUserStore::new()));
        (store, h)
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected_without_insert() {
        let (store, h) = recording(RecordingInvoiceStore::default());
        for amount in ["0", "-5", "", "abc"] {
            let state = create_invoice(&h.ctx, &valid_form(CustomerId::new(), amount))
                .await
                .unwrap();
            let ActionState::FieldErrors { fields, message } = state else {
                panic!("expected field errors for {amount:?}");
            };
            assert_eq!(fields.get("amount"), [MSG_AMOUNT.to_string()]);
            assert!(!fields.contains("customerId"));
            assert_eq!(message, MSG_CREATE_FAILED);
        }
        assert!(store.inserts.lock().unwrap().is_empty());
        assert_eq!(h.cache.generation(INVOICES_PATH), 0);
    }

    #[tokio::test]
    async fn empty_form_reports_every_field() {
        let (_, h) = recording(RecordingInvoiceStore::default());
        let state = create_invoice(&h.ctx, &FormData::new()).await.unwrap();
        let ActionState::FieldErrors { fields, .. } = state else {
            panic!("expected field errors");
        };
        assert_eq!(fields.get("customerId"), [MSG_CUSTOMER.to_string()]);
        assert_eq!(fields.get("amount"), [MSG_AMOUNT.to_string()]);
        assert_eq!(fields.get("status"), [MSG_STATUS.to_string()]);
    }

    #[tokio::test]
    async fn valid_create_inserts_once_in_cents_dated_today() {
        let (store, h) = recording(RecordingInvoiceStore::default());
        let customer = CustomerId::new();

        let state = create_invoice(&h.ctx, &valid_form(customer, "123.45")).await.unwrap();
        assert_eq!(state, ActionState::redirect(INVOICES_PATH));

        let inserts = store.inserts.lock().unwrap();
        assert_eq!(inserts.len(), 1);
        assert_eq!(inserts[0].customer_id, customer);
        assert_eq!(inserts[0].amount, Cents::from_raw(12_345).unwrap());
        assert_eq!(inserts[0].status, InvoiceStatus::Pending);
        assert_eq!(inserts[0].date, Utc::now().date_naive());
        assert_eq!(h.cache.generation(INVOICES_PATH), 1);
        assert_eq!(store.inner.len(), 1);
    }

    #[tokio::test]
    async fn failing_insert_still_invalidates_and_redirects() {
        let (store, h) = recording(RecordingInvoiceStore::failing());

        let state = create_invoice(&h.ctx, &valid_form(CustomerId::new(), "10")).await.unwrap();

        assert_eq!(state, ActionState::redirect(INVOICES_PATH));
        assert_eq!(store.inserts.lock().unwrap().len(), 1);
        assert_eq!(h.cache.generation(INVOICES_PATH), 1);
        assert!(store.inner.is_empty());
    }

    #[tokio::test]
    async fn update_rejects_bad_input_with_update_message() {
        let (store, h) = recording(RecordingInvoiceStore::default());
        let form = valid_form(CustomerId::new(), "0");

        let state = update_invoice(&h.ctx, InvoiceId::new(), &form).await.unwrap();

        let ActionState::FieldErrors { message, .. } = state else {
            panic!("expected field errors");
        };
        assert_eq!(message, MSG_UPDATE_FAILED);
        assert!(store.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_original_date() {
        let (store, h) = recording(RecordingInvoiceStore::default());
        let customer = CustomerId::new();
        create_invoice(&h.ctx, &valid_form(customer, "5")).await.unwrap();
        let original = store.inner.list().await.unwrap().remove(0);

        let form = FormData::new()
            .with("customerId", customer.to_string())
            .with("amount", "7.5")
            .with("status", "paid");
        let state = update_invoice(&h.ctx, original.id, &form).await.unwrap();
        assert_eq!(state, ActionState::redirect(INVOICES_PATH));

        let updated = store.inner.get(original.id).await.unwrap().unwrap();
        assert_eq!(updated.amount, Cents::from_raw(750).unwrap());
        assert_eq!(updated.status, InvoiceStatus::Paid);
        assert_eq!(updated.date, original.date);
        assert_eq!(h.cache.generation(INVOICES_PATH), 2);
    }

    #[tokio::test]
    async fn failing_update_still_redirects() {
        let (_, h) = recording(RecordingInvoiceStore::failing());
        let state = update_invoice(&h.ctx, InvoiceId::new(), &valid_form(CustomerId::new(), "1"))
            .await
            .unwrap();
        assert_eq!(state, ActionState::redirect(INVOICES_PATH));
        assert_eq!(h.cache.generation(INVOICES_PATH), 1);
    }

    #[tokio::test]
    async fn delete_invalidates_only_on_success() {
        let (store, h) = recording(RecordingInvoiceStore::default());
        let state = delete_invoice(&h.ctx, InvoiceId::new()).await.unwrap();
        assert_eq!(state, ActionState::done());
        assert_eq!(store.deletes.lock().unwrap().len(), 1);
        assert_eq!(h.cache.generation(INVOICES_PATH), 1);

        let (store, h) = recording(RecordingInvoiceStore::failing());
        let state = delete_invoice(&h.ctx, InvoiceId::new()).await.unwrap();
        assert_eq!(state, ActionState::done());
        assert_eq!(store.deletes.lock().unwrap().len(), 1);
        assert_eq!(h.cache.generation(INVOICES_PATH), 0);
    }
}
