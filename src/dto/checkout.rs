//! DTOs shaped for the checkout page templates.

use serde::{Deserialize, Serialize};

use crate::domain::facet::{AddressDraft, ContactDraft, FacetKind, NoteDraft, OrderType, TimeDraft};
use crate::domain::order::PaymentMethod;
use crate::services::order_details::OrderDetails;

/// Query string of `/checkout`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
}

impl CheckoutQuery {
    pub fn editing(basket_id: &str, order_type: OrderType) -> Self {
        Self {
            basket_id: Some(basket_id.to_string()),
            order_id: None,
            order_type: Some(order_type.as_str().to_string()),
        }
    }

    pub fn confirmation(basket_id: &str, order_id: &str) -> Self {
        Self {
            basket_id: Some(basket_id.to_string()),
            order_id: Some(order_id.to_string()),
            order_type: None,
        }
    }

    /// Relative `/checkout` URL carrying this query.
    pub fn to_url(&self) -> String {
        match serde_html_form::to_string(self) {
            Ok(query) if !query.is_empty() => format!("/checkout?{query}"),
            Ok(_) => "/checkout".to_string(),
            Err(err) => {
                log::error!("Failed to encode checkout query: {err}");
                "/checkout".to_string()
            }
        }
    }
}

/// One line of the order summary.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SummaryLine {
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub image: Option<String>,
    pub extras: Vec<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BillView {
    pub subtotal: String,
    /// Shown only for delivery orders.
    pub delivery_fee: Option<String>,
    pub service_fee: String,
    pub total: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct OrderSummaryView {
    pub lines: Vec<SummaryLine>,
    pub bill: BillView,
}

/// Displayed state of the order-detail synchronizer.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct OrderDetailsView {
    pub ready: bool,
    pub pickup: bool,
    pub dialog: Option<FacetKind>,
    pub contact: ContactDraft,
    pub address: AddressDraft,
    pub display_address: String,
    pub time: TimeDraft,
    pub notes: NoteDraft,
}

impl From<&OrderDetails> for OrderDetailsView {
    fn from(details: &OrderDetails) -> Self {
        Self {
            ready: details.is_ready(),
            pickup: details.context().is_pickup(),
            dialog: details.dialog(),
            contact: details.contact().clone(),
            address: details.address().clone(),
            display_address: details.display_address(),
            time: details.time().clone(),
            notes: details.notes().clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PaymentOption {
    pub id: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl PaymentOption {
    pub fn all(selected: PaymentMethod) -> Vec<Self> {
        PaymentMethod::ALL
            .into_iter()
            .map(|method| Self {
                id: method.id(),
                label: method.label(),
                selected: method == selected,
            })
            .collect()
    }
}

/// Aggregated data required to render the checkout editing view.
#[derive(Clone, Debug)]
pub struct CheckoutPageData {
    pub basket_id: String,
    pub order_type: OrderType,
    pub deliverable: bool,
    pub details: OrderDetailsView,
    /// `None` when the basket is empty.
    pub summary: Option<OrderSummaryView>,
    pub payment_methods: Vec<PaymentOption>,
}

impl CheckoutPageData {
    /// Orders need complete details, and a deliverable address unless picked up.
    pub fn can_order(&self) -> bool {
        self.details.ready && (self.details.pickup || self.deliverable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_urls_are_encoded() {
        let url = CheckoutQuery::editing("b 1&x", OrderType::Pickup).to_url();
        assert_eq!(url, "/checkout?basketId=b+1%26x&orderType=PICKUP");

        let url = CheckoutQuery::confirmation("b1", "o-9").to_url();
        assert_eq!(url, "/checkout?basketId=b1&orderId=o-9");
    }

    #[test]
    fn payment_options_mark_the_selection() {
        let options = PaymentOption::all(PaymentMethod::Google);
        assert_eq!(options.len(), 4);
        assert_eq!(
            options.iter().filter(|o| o.selected).map(|o| o.id).collect::<Vec<_>>(),
            vec!["google"]
        );
    }
}
