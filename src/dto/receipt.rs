//! DTOs shaped for the order confirmation receipt.

use serde::Serialize;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub extras: Vec<String>,
}

/// Data required to render the confirmation page and its PDF export.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ReceiptPageData {
    pub basket_id: String,
    pub order_id: String,
    pub display_id: String,
    pub created_at: String,
    pub order_type: &'static str,
    pub status_label: &'static str,
    pub status_tone: &'static str,
    pub customer_name: String,
    pub customer_phone: String,
    pub delivery_address: Option<String>,
    pub delivery_time: String,
    pub delivery_note: Option<String>,
    pub payment_method: &'static str,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: String,
    pub delivery_fee: String,
    pub service_fee: String,
    pub tip: Option<String>,
    pub discount: Option<String>,
    pub total: String,
}
