//! Form definitions backing the checkout routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod checkout;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),
}
