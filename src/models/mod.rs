//! Server-side models that are not part of the checkout domain.

pub mod config;
