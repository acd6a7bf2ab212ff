use serde::{Deserialize, Serialize};

/// Free-form customization attached to a basket or order line.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    pub notes: Option<String>,
    pub options: Vec<String>,
    pub spicy_level: Option<String>,
}

impl Customization {
    /// Short human-readable fragments: options, spice level, then notes.
    pub fn describe(&self) -> Vec<String> {
        let mut extras: Vec<String> = self
            .options
            .iter()
            .filter(|option| !option.trim().is_empty())
            .cloned()
            .collect();
        if let Some(level) = self.spicy_level.as_deref().filter(|l| !l.is_empty()) {
            extras.push(format!("Spicy: {level}"));
        }
        if let Some(notes) = self.notes.as_deref().filter(|n| !n.is_empty()) {
            extras.push(format!("Note: {notes}"));
        }
        extras
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BasketItem {
    pub item_id: String,
    pub item_name: String,
    pub quantity: u32,
    /// Line total in euros.
    pub price: f64,
    pub customization: Option<Customization>,
}

/// Basket contents plus the transport identifiers issued with it.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Cart {
    pub cart_items: Vec<BasketItem>,
    pub basket_id: String,
    pub device_id: String,
    pub tid: String,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.cart_items.is_empty()
    }

    pub fn subtotal(&self) -> f64 {
        self.cart_items.iter().map(|item| item.price).sum()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtotal_sums_line_prices() {
        let cart: Cart = serde_json::from_str(
            r#"{"cartItems":[{"itemId":"a","itemName":"Pho","quantity":2,"price":19.0},
                {"itemId":"b","itemName":"Tea","quantity":1,"price":3.5}],
               "basketId":"b1","deviceId":"dev","tid":"t1"}"#,
        )
        .unwrap();
        assert_eq!(cart.subtotal(), 22.5);
        assert!(!cart.is_empty());
    }

    #[test]
    fn customization_lists_what_was_chosen() {
        let customization = Customization {
            notes: Some("no onions".into()),
            options: vec!["Extra rice".into(), " ".into()],
            spicy_level: Some("Medium".into()),
        };
        assert_eq!(
            customization.describe(),
            vec!["Extra rice", "Spicy: Medium", "Note: no onions"]
        );
    }
}
