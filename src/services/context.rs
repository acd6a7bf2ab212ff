//! Per-request checkout context handed to the services explicitly.

use crate::domain::facet::{AddressDraft, OrderType};
use crate::models::config::ServerConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct CheckoutContext {
    pub order_type: OrderType,
    /// International calling code prefixed to national phone numbers.
    pub calling_code: u16,
    /// Country suffix of formatted addresses.
    pub country: String,
    /// Operator address shown for pickup orders.
    pub pickup_address: AddressDraft,
}

impl CheckoutContext {
    pub fn new(config: &ServerConfig, order_type: OrderType) -> Self {
        Self {
            order_type,
            calling_code: config.country_calling_code,
            country: config.country_name.clone(),
            pickup_address: config.pickup_address.clone(),
        }
    }

    pub fn is_pickup(&self) -> bool {
        self.order_type == OrderType::Pickup
    }
}

#[cfg(test)]
pub(crate) fn test_context(order_type: OrderType) -> CheckoutContext {
    CheckoutContext {
        order_type,
        calling_code: 49,
        country: "Germany".to_string(),
        pickup_address: AddressDraft {
            building_number: "7".to_string(),
            street: "Marktplatz".to_string(),
            town: "Heidelberg".to_string(),
            pincode: "69117".to_string(),
        },
    }
}
