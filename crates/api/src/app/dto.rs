use serde_json::{Value, json};

use invoicedesk_core::Invoice;

// -------------------------
// Response mapping
// -------------------------

pub fn invoice_to_json(invoice: &Invoice) -> Value {
    json!({
        "id": invoice.id.to_string(),
        "customer_id": invoice.customer_id.to_string(),
        "amount": invoice.amount.get(),
        "amount_display": invoice.amount.to_string(),
        "status": invoice.status.as_str(),
        "date": invoice.date.to_string(),
    })
}

pub fn invoices_to_json(invoices: &[Invoice]) -> Value {
    Value::Array(invoices.iter().map(invoice_to_json).collect())
}
