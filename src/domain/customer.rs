use serde::{Deserialize, Serialize};

use crate::domain::facet::{AddressDraft, OrderType};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerAddress {
    pub pincode: String,
    pub building_number: String,
    pub street: String,
    pub town: String,
    pub display_address: String,
}

impl CustomerAddress {
    /// Builds the wire address from a draft, deriving the display string.
    pub fn from_draft(draft: &AddressDraft, country: &str) -> Self {
        Self {
            pincode: draft.pincode.clone(),
            building_number: draft.building_number.clone(),
            street: draft.street.clone(),
            town: draft.town.clone(),
            display_address: draft.display(country),
        }
    }
}

impl From<&CustomerAddress> for AddressDraft {
    fn from(address: &CustomerAddress) -> Self {
        Self {
            building_number: address.building_number.clone(),
            street: address.street.clone(),
            town: address.town.clone(),
            pincode: address.pincode.clone(),
        }
    }
}

/// Canonical customer as known to the backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerDetails {
    pub name: String,
    pub phone_number: String,
    pub address: Option<CustomerAddress>,
}

/// Composite payload of the remote "save customer" call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    pub customer: CustomerDetails,
    pub order_type: OrderType,
}

/// Response of the user-addresses lookup used for seeding.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserAddresses {
    pub customer_details: Option<CustomerDetails>,
    pub has_address: bool,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserLocation {
    pub lat: f64,
    pub lng: f64,
}

/// Delivery eligibility for the current customer.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryDetails {
    pub order_type: Option<String>,
    pub user_location: UserLocation,
    pub is_free_delivery: bool,
    pub delivery_fee: f64,
    pub deliverable: bool,
}

/// Checkout profile: customer details merged with delivery eligibility.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub phone_number: String,
    pub address: CustomerAddress,
    /// Previously used order type, empty when unknown.
    pub order_type: String,
    pub user_location: UserLocation,
    pub is_free_delivery: bool,
    pub delivery_fee: f64,
    pub deliverable: bool,
}

impl Customer {
    /// Empty profile used when the backend cannot be reached.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn merge(details: CustomerDetails, delivery: DeliveryDetails) -> Self {
        Self {
            name: details.name,
            phone_number: details.phone_number,
            address: details.address.unwrap_or_default(),
            order_type: delivery.order_type.unwrap_or_default(),
            user_location: delivery.user_location,
            is_free_delivery: delivery.is_free_delivery,
            delivery_fee: delivery.delivery_fee,
            deliverable: delivery.deliverable,
        }
    }
}

/// Transport-session identifiers copied from the basket response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportIds {
    pub device_id: Option<String>,
    pub tid: Option<String>,
}

impl TransportIds {
    pub fn new(device_id: impl Into<String>, tid: impl Into<String>) -> Self {
        let non_empty = |s: String| Some(s).filter(|s| !s.is_empty());
        Self {
            device_id: non_empty(device_id.into()),
            tid: non_empty(tid.into()),
        }
    }

    /// Both identifiers, when known; callers proceed without them otherwise.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.device_id, &self.tid) {
            (Some(device_id), Some(tid)) => Some((device_id.as_str(), tid.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_ids_require_both_values() {
        assert_eq!(TransportIds::new("dev", "t1").pair(), Some(("dev", "t1")));
        assert_eq!(TransportIds::new("dev", "").pair(), None);
        assert_eq!(TransportIds::default().pair(), None);
    }

    #[test]
    fn merge_keeps_delivery_eligibility() {
        let details = CustomerDetails {
            name: "Ada".into(),
            phone_number: "15551234".into(),
            address: None,
        };
        let delivery = DeliveryDetails {
            order_type: Some("PICKUP".into()),
            delivery_fee: 2.5,
            deliverable: true,
            ..DeliveryDetails::default()
        };

        let customer = Customer::merge(details, delivery);

        assert_eq!(customer.name, "Ada");
        assert_eq!(customer.order_type, "PICKUP");
        assert!(customer.deliverable);
        assert_eq!(customer.address, CustomerAddress::default());
    }

    #[test]
    fn partial_server_payloads_deserialize() {
        let parsed: UserAddresses =
            serde_json::from_str(r#"{"customerDetails":{"name":"Ada"}}"#).unwrap();
        let details = parsed.customer_details.unwrap();
        assert_eq!(details.name, "Ada");
        assert!(details.address.is_none());
        assert!(!parsed.has_address);
    }
}
