//! Domain types shared by the checkout services.

pub mod basket;
pub mod customer;
pub mod facet;
pub mod order;
pub mod types;
