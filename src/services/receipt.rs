//! Confirmation receipt: lookup, page data and PDF export.

use chrono::{DateTime, NaiveDateTime};

use crate::domain::basket::Customization;
use crate::domain::customer::TransportIds;
use crate::domain::facet::OrderType;
use crate::domain::order::OrderSummary;
use crate::dto::receipt::{ReceiptLine, ReceiptPageData};
use crate::gateway::StorefrontReader;
use crate::pdf::PdfDocument;
use crate::services::checkout::format_price;

const DATE_FORMAT: &str = "%B %-d, %Y, %I:%M %p";

/// Looks the order up; failures are logged and reported as `None`.
pub async fn load_order<G>(gateway: &G, order_id: &str, ids: &TransportIds) -> Option<OrderSummary>
where
    G: StorefrontReader + ?Sized,
{
    match gateway.fetch_order(order_id, ids).await {
        Ok(order) => Some(order),
        Err(err) => {
            log::error!("Failed to fetch order {order_id}: {err}");
            None
        }
    }
}

/// Formats the backend timestamp as `March 5, 2025, 07:30 PM`. Unparseable
/// values are shown as received.
pub fn format_created_at(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(DATE_FORMAT).to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(parsed) => parsed.format(DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

fn extras(customization: Option<&Customization>) -> Vec<String> {
    customization.map(Customization::describe).unwrap_or_default()
}

pub fn receipt_page(order: &OrderSummary, basket_id: &str) -> ReceiptPageData {
    let amount = &order.order_amount;
    let total = amount.order_total + amount.delivery_fee + amount.service_fee;
    let delivery_time = if order.delivery_time.asap || order.delivery_time.scheduled_time.is_empty()
    {
        "As soon as possible".to_string()
    } else {
        order.delivery_time.scheduled_time.clone()
    };
    let order_type = match order.order_type {
        OrderType::Delivery => "Delivery",
        OrderType::Pickup => "Pickup",
    };

    ReceiptPageData {
        basket_id: basket_id.to_string(),
        order_id: order.order_id.clone(),
        display_id: order.display_id.clone(),
        created_at: format_created_at(&order.created_at),
        order_type,
        status_label: order.status.label(),
        status_tone: order.status.tone(),
        customer_name: order.user_name.clone(),
        customer_phone: order.user_phone.clone(),
        delivery_address: order.delivery_address.clone().filter(|a| !a.is_empty()),
        delivery_time,
        delivery_note: order.delivery_note.clone().filter(|n| !n.is_empty()),
        payment_method: order.selected_method.label(),
        lines: order
            .order_items
            .iter()
            .map(|item| ReceiptLine {
                name: item.name.clone(),
                quantity: item.quantity,
                price: format_price(item.price),
                extras: extras(item.customization.as_ref()),
            })
            .collect(),
        subtotal: format_price(amount.order_total),
        delivery_fee: format_price(amount.delivery_fee),
        service_fee: format_price(amount.service_fee),
        tip: (amount.tip_amount > 0.0).then(|| format_price(amount.tip_amount)),
        discount: amount
            .discount
            .as_ref()
            .filter(|d| d.amount > 0.0)
            .map(|d| format!("-{} ({})", format_price(d.amount), d.code)),
        total: format_price(total),
    }
}

/// Renders the receipt as a PDF document.
pub fn render_pdf(receipt: &ReceiptPageData) -> Vec<u8> {
    let mut document = PdfDocument::new();
    document
        .heading("Order Receipt")
        .text("Thank you for your order!")
        .gap()
        .row("Order ID", &receipt.display_id)
        .row("Order date", &receipt.created_at)
        .row("Order type", receipt.order_type)
        .row("Status", receipt.status_label)
        .gap()
        .bold("Customer")
        .text(&receipt.customer_name)
        .text(&receipt.customer_phone);
    if let Some(address) = &receipt.delivery_address {
        document.text(address);
    }
    document
        .row("Delivery time", &receipt.delivery_time)
        .row("Payment", receipt.payment_method);
    if let Some(note) = &receipt.delivery_note {
        document.row("Note", note);
    }

    document.gap().bold("Items");
    for line in &receipt.lines {
        document.row(&format!("{} x {}", line.quantity, line.name), &line.price);
        for extra in &line.extras {
            document.text(&format!("    {extra}"));
        }
    }

    document
        .gap()
        .row("Subtotal", &receipt.subtotal)
        .row("Delivery fee", &receipt.delivery_fee)
        .row("Service fee", &receipt.service_fee);
    if let Some(tip) = &receipt.tip {
        document.row("Tip", tip);
    }
    if let Some(discount) = &receipt.discount {
        document.row("Discount", discount);
    }
    document.bold_row("Total", &receipt.total);

    document.build()
}
