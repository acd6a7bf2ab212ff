//! Remote storefront backend: menu, basket, user details, addresses, orders.
//!
//! The services only see these traits; [`HttpGateway`] is the production
//! implementation and tests swap in mocks.
#![allow(async_fn_in_trait)]

use crate::domain::basket::{Cart, MenuItem};
use crate::domain::customer::{CreateCustomer, DeliveryDetails, TransportIds, UserAddresses};
use crate::domain::order::{CashOrderRequest, OrderCreated, OrderSummary};
use crate::gateway::errors::GatewayResult;

pub mod errors;
pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpGateway;

pub trait StorefrontReader {
    async fn fetch_menu_items(&self) -> GatewayResult<Vec<MenuItem>>;
    async fn fetch_basket(&self, basket_id: &str) -> GatewayResult<Cart>;
    async fn fetch_user_addresses(&self, ids: &TransportIds) -> GatewayResult<UserAddresses>;
    async fn fetch_delivery_details(&self, ids: &TransportIds) -> GatewayResult<DeliveryDetails>;
    async fn fetch_order(&self, order_id: &str, ids: &TransportIds) -> GatewayResult<OrderSummary>;
}

pub trait CustomerWriter {
    async fn save_address(&self, payload: &CreateCustomer, ids: &TransportIds)
    -> GatewayResult<()>;
}

pub trait OrderWriter {
    async fn create_cash_order(
        &self,
        request: &CashOrderRequest,
        ids: &TransportIds,
    ) -> GatewayResult<OrderCreated>;
}

