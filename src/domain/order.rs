use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::basket::Customization;
use crate::domain::facet::{OrderType, TimeDraft};

/// Payment options offered at checkout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Google,
    Credit,
    Paypal,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Google,
        PaymentMethod::Credit,
        PaymentMethod::Paypal,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Google => "google",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Paypal => "paypal",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash on Delivery",
            PaymentMethod::Google => "Google Pay",
            PaymentMethod::Credit => "Credit or Debit card",
            PaymentMethod::Paypal => "PayPal",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.id() == id)
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Preparing,
    InProgress,
    Cooked,
    Ready,
    ReadyForPickup,
    OutForDelivery,
    Delivered,
    Cancelled,
    Failed,
    Completed,
}

impl OrderStatus {
    pub const fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::InProgress => "In progress",
            OrderStatus::Cooked => "Cooked",
            OrderStatus::Ready => "Ready",
            OrderStatus::ReadyForPickup => "Ready for pickup",
            OrderStatus::OutForDelivery => "Out for delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Failed => "Failed",
            OrderStatus::Completed => "Completed",
        }
    }

    /// Badge colour used by the receipt template.
    pub const fn tone(self) -> &'static str {
        match self {
            OrderStatus::Pending => "warning",
            OrderStatus::Accepted
            | OrderStatus::ReadyForPickup
            | OrderStatus::OutForDelivery => "info",
            OrderStatus::Preparing | OrderStatus::InProgress | OrderStatus::Cooked => "primary",
            OrderStatus::Ready | OrderStatus::Delivered | OrderStatus::Completed => "success",
            OrderStatus::Cancelled | OrderStatus::Failed => "error",
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItemSummary {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    pub customization: Option<Customization>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Discount {
    pub amount: f64,
    pub code: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderAmount {
    pub order_total: f64,
    pub delivery_fee: f64,
    pub service_fee: f64,
    pub tip_amount: f64,
    pub discount: Option<Discount>,
}

/// Placed order as returned by the order lookup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub display_id: String,
    pub order_id: String,
    pub order_type: OrderType,
    pub selected_method: PaymentMethod,
    #[serde(default)]
    pub order_items: Vec<OrderItemSummary>,
    #[serde(default)]
    pub order_amount: OrderAmount,
    #[serde(default)]
    pub delivery_time: TimeDraft,
    pub delivery_note: Option<String>,
    pub delivery_address: Option<String>,
    pub created_at: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_phone: String,
}

/// Body of the cash order placement call.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashOrderRequest {
    pub selected_method: PaymentMethod,
    pub basket_id: String,
    pub order_type: OrderType,
    pub delivery_time: TimeDraft,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_note: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderCreated {
    pub order_id: Option<String>,
}

impl OrderCreated {
    /// The created order id, when the backend actually returned one.
    pub fn into_order_id(self) -> Option<String> {
        self.order_id.filter(|id| !id.trim().is_empty())
    }
}
