use serde::Deserialize;
use validator::Validate;

use crate::domain::facet::{
    AddressDraft, ContactDraft, FacetPayload, NoteDraft, OrderType, TimeDraft,
};
use crate::domain::order::PaymentMethod;
use crate::domain::types::MAX_NOTE_LENGTH;
use crate::dto::checkout::CheckoutQuery;
use crate::forms::FormError;

/// Hidden fields every checkout form carries so the handler can return to
/// the same page.
pub trait CheckoutTarget {
    fn basket_id(&self) -> &str;
    fn raw_order_type(&self) -> &str;

    fn order_type(&self) -> OrderType {
        OrderType::resolve(Some(self.raw_order_type()), None)
    }

    /// Checkout URL to redirect to after handling the form.
    fn return_url(&self) -> String {
        CheckoutQuery::editing(self.basket_id(), self.order_type()).to_url()
    }
}

macro_rules! checkout_target {
    ($($form:ty),+ $(,)?) => {
        $(
            impl CheckoutTarget for $form {
                fn basket_id(&self) -> &str {
                    &self.basket_id
                }

                fn raw_order_type(&self) -> &str {
                    &self.order_type
                }
            }
        )+
    };
}

checkout_target!(
    DialogForm,
    ContactForm,
    AddressForm,
    TimeForm,
    NotesForm,
    PaymentMethodForm,
    PlaceOrderForm,
);

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Form data for opening or closing a dialog.
pub struct DialogForm {
    #[validate(length(min = 1))]
    pub basket_id: String,
    #[serde(default)]
    pub order_type: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Confirmed contact dialog.
pub struct ContactForm {
    #[validate(length(min = 1))]
    pub basket_id: String,
    #[serde(default)]
    pub order_type: String,
    #[serde(default)]
    pub name: String,
    /// Raw dialed form, `+{code}-{number}`.
    #[serde(default)]
    pub phone_number: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Confirmed delivery address dialog.
pub struct AddressForm {
    #[validate(length(min = 1))]
    pub basket_id: String,
    #[serde(default)]
    pub order_type: String,
    #[serde(default)]
    pub building_number: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub town: String,
    #[serde(default)]
    pub pincode: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Confirmed delivery time dialog.
pub struct TimeForm {
    #[validate(length(min = 1))]
    pub basket_id: String,
    #[serde(default)]
    pub order_type: String,
    /// Checkbox; present when ticked.
    #[serde(default)]
    pub asap: Option<String>,
    #[serde(default)]
    pub scheduled_time: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Confirmed delivery note dialog.
pub struct NotesForm {
    #[validate(length(min = 1))]
    pub basket_id: String,
    #[serde(default)]
    pub order_type: String,
    #[serde(default)]
    #[validate(length(max = MAX_NOTE_LENGTH))]
    pub notes: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Payment method radio selection.
pub struct PaymentMethodForm {
    #[validate(length(min = 1))]
    pub basket_id: String,
    #[serde(default)]
    pub order_type: String,
    pub method: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Place-order button.
pub struct PlaceOrderForm {
    #[validate(length(min = 1))]
    pub basket_id: String,
    #[serde(default)]
    pub order_type: String,
}

impl From<ContactForm> for FacetPayload {
    fn from(form: ContactForm) -> Self {
        FacetPayload::Contact(ContactDraft {
            name: form.name,
            phone_number: form.phone_number,
        })
    }
}

impl From<AddressForm> for FacetPayload {
    fn from(form: AddressForm) -> Self {
        FacetPayload::Address(AddressDraft {
            building_number: form.building_number,
            street: form.street,
            town: form.town,
            pincode: form.pincode,
        })
    }
}

impl From<TimeForm> for FacetPayload {
    fn from(form: TimeForm) -> Self {
        FacetPayload::Time(TimeDraft {
            asap: form.asap.is_some_and(|value| value != "false"),
            scheduled_time: form.scheduled_time,
        })
    }
}

impl From<NotesForm> for FacetPayload {
    fn from(form: NotesForm) -> Self {
        FacetPayload::Notes(NoteDraft { notes: form.notes })
    }
}

impl TryFrom<&PaymentMethodForm> for PaymentMethod {
    type Error = FormError;

    fn try_from(form: &PaymentMethodForm) -> Result<Self, Self::Error> {
        PaymentMethod::from_id(form.method.trim())
            .ok_or_else(|| FormError::UnknownPaymentMethod(form.method.clone()))
    }
}
