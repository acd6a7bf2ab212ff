//! Mock backend used to isolate services in tests.

use mockall::mock;

use crate::domain::basket::{Cart, MenuItem};
use crate::domain::customer::{CreateCustomer, DeliveryDetails, TransportIds, UserAddresses};
use crate::domain::order::{CashOrderRequest, OrderCreated, OrderSummary};
use crate::gateway::errors::GatewayResult;
use crate::gateway::{CustomerWriter, OrderWriter, StorefrontReader};

mock! {
    pub Gateway {}

    impl StorefrontReader for Gateway {
        async fn fetch_menu_items(&self) -> GatewayResult<Vec<MenuItem>>;
        async fn fetch_basket(&self, basket_id: &str) -> GatewayResult<Cart>;
        async fn fetch_user_addresses(&self, ids: &TransportIds) -> GatewayResult<UserAddresses>;
        async fn fetch_delivery_details(&self, ids: &TransportIds) -> GatewayResult<DeliveryDetails>;
        async fn fetch_order(&self, order_id: &str, ids: &TransportIds) -> GatewayResult<OrderSummary>;
    }

    impl CustomerWriter for Gateway {
        async fn save_address(
            &self,
            payload: &CreateCustomer,
            ids: &TransportIds,
        ) -> GatewayResult<()>;
    }

    impl OrderWriter for Gateway {
        async fn create_cash_order(
            &self,
            request: &CashOrderRequest,
            ids: &TransportIds,
        ) -> GatewayResult<OrderCreated>;
    }
}
