//! Editable order facets and their canonical drafts.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four independently editable aspects of an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetKind {
    Contact,
    Address,
    Time,
    Notes,
}

impl FacetKind {
    pub const ALL: [FacetKind; 4] = [
        FacetKind::Contact,
        FacetKind::Address,
        FacetKind::Time,
        FacetKind::Notes,
    ];

    /// Session key under which the facet draft is stored.
    pub const fn as_str(self) -> &'static str {
        match self {
            FacetKind::Contact => "contact",
            FacetKind::Address => "address",
            FacetKind::Time => "time",
            FacetKind::Notes => "notes",
        }
    }

    /// Whether a confirmed change of this facet is persisted remotely.
    pub const fn is_persisted(self) -> bool {
        matches!(self, FacetKind::Contact | FacetKind::Address)
    }
}

impl Display for FacetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FacetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown facet kind: {s}"))
    }
}

/// Delivery mode of the order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    #[default]
    Delivery,
    Pickup,
}

impl OrderType {
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderType::Delivery => "DELIVERY",
            OrderType::Pickup => "PICKUP",
        }
    }

    /// Parses the wire representation, returning `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DELIVERY" => Some(OrderType::Delivery),
            "PICKUP" => Some(OrderType::Pickup),
            _ => None,
        }
    }

    /// Resolves the order type from the request parameter, then the
    /// customer's known preference, defaulting to delivery.
    pub fn resolve(param: Option<&str>, preference: Option<&str>) -> Self {
        param
            .and_then(Self::parse)
            .or_else(|| preference.and_then(Self::parse))
            .unwrap_or_default()
    }
}

impl Display for OrderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    pub name: String,
    /// Raw dialed form, e.g. `+49-15551234`.
    pub phone_number: String,
}

impl ContactDraft {
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.phone_number.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    pub building_number: String,
    pub street: String,
    pub town: String,
    pub pincode: String,
}

impl AddressDraft {
    pub fn is_complete(&self) -> bool {
        !self.building_number.is_empty()
            && !self.street.is_empty()
            && !self.town.is_empty()
            && !self.pincode.is_empty()
    }

    /// Formats the address as `"{street} {building}, {pincode} {town}, {country}"`.
    pub fn display(&self, country: &str) -> String {
        format!(
            "{} {}, {} {}, {}",
            self.street, self.building_number, self.pincode, self.town, country
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeDraft {
    pub asap: bool,
    /// Empty when `asap` is set.
    #[serde(default)]
    pub scheduled_time: String,
}

impl Default for TimeDraft {
    fn default() -> Self {
        Self {
            asap: true,
            scheduled_time: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    #[serde(default)]
    pub notes: String,
}

/// Canonical value of one facet, tagged by kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FacetDraft {
    Contact(ContactDraft),
    Address(AddressDraft),
    Time(TimeDraft),
    Notes(NoteDraft),
}

impl FacetDraft {
    pub const fn kind(&self) -> FacetKind {
        match self {
            FacetDraft::Contact(_) => FacetKind::Contact,
            FacetDraft::Address(_) => FacetKind::Address,
            FacetDraft::Time(_) => FacetKind::Time,
            FacetDraft::Notes(_) => FacetKind::Notes,
        }
    }
}

/// Raw value confirmed by a facet dialog, before normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FacetPayload {
    Contact(ContactDraft),
    Address(AddressDraft),
    Time(TimeDraft),
    Notes(NoteDraft),
}

impl FacetPayload {
    pub const fn kind(&self) -> FacetKind {
        match self {
            FacetPayload::Contact(_) => FacetKind::Contact,
            FacetPayload::Address(_) => FacetKind::Address,
            FacetPayload::Time(_) => FacetKind::Time,
            FacetPayload::Notes(_) => FacetKind::Notes,
        }
    }
}
