//! DTO modules that bridge services with templates.

pub mod checkout;
pub mod receipt;
