pub mod checkout;
pub mod context;
pub mod handlers;
pub mod order_details;
pub mod payment;
pub mod receipt;

use thiserror::Error;

use crate::domain::facet::FacetKind;
use crate::domain::types::ValidationError;
use crate::gateway::errors::GatewayError;
use crate::store::errors::StoreError;

pub use context::CheckoutContext;

/// Errors surfaced by the checkout services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("session store error: {0}")]
    Store(#[from] StoreError),

    #[error("remote call failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("the {0} dialog is not open")]
    DialogNotOpen(FacetKind),

    #[error("the {0} facet cannot be edited for this order")]
    FacetUnavailable(FacetKind),

    #[error("basketId is required")]
    MissingBasket,

    #[error("the delivery address is outside the delivery area")]
    NotDeliverable,

    #[error("order was not accepted: {0}")]
    OrderRejected(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
