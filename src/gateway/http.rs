//! HTTP client for the storefront REST backend.
//!
//! Every endpoint answers with a `{ "data": ... }` envelope. The optional
//! `x-device-id`/`x-tid` headers are sent only when both identifiers are
//! known; otherwise the request goes out without them.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::basket::{Cart, MenuItem};
use crate::domain::customer::{CreateCustomer, DeliveryDetails, TransportIds, UserAddresses};
use crate::domain::order::{CashOrderRequest, OrderCreated, OrderSummary};
use crate::gateway::errors::{GatewayError, GatewayResult};
use crate::gateway::{CustomerWriter, OrderWriter, StorefrontReader};

pub const DEVICE_ID_HEADER: &str = "x-device-id";
pub const TID_HEADER: &str = "x-tid";

#[derive(serde::Deserialize)]
struct ApiResponse<T> {
    data: Option<T>,
}

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Creates a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the `reqwest::Client` cannot be built
    /// and [`GatewayError::Api`] if `base_url` is not an http(s) URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| GatewayError::Api(format!("invalid base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Api(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn with_ids(builder: RequestBuilder, ids: &TransportIds) -> RequestBuilder {
        match ids.pair() {
            Some((device_id, tid)) => builder
                .header(DEVICE_ID_HEADER, device_id)
                .header(TID_HEADER, tid),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> GatewayResult<T> {
        let response = request.send().await?.error_for_status()?;
        let body = response.text().await?;
        let envelope: ApiResponse<T> =
            serde_json::from_str(&body).map_err(|e| GatewayError::Deserialize {
                context: url.path().to_string(),
                source: e,
            })?;
        envelope
            .data
            .ok_or_else(|| GatewayError::MissingData(url.path().to_string()))
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        ids: &TransportIds,
    ) -> GatewayResult<T> {
        let url = self.endpoint(segments);
        let request = Self::with_ids(self.client.get(url.clone()), ids);
        self.send(request, &url).await
    }

    async fn post_data<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
        ids: &TransportIds,
    ) -> GatewayResult<T> {
        let url = self.endpoint(segments);
        let request = Self::with_ids(self.client.post(url.clone()).json(body), ids);
        self.send(request, &url).await
    }
}

impl StorefrontReader for HttpGateway {
    async fn fetch_menu_items(&self) -> GatewayResult<Vec<MenuItem>> {
        self.get_data(&["menu", "listing"], &TransportIds::default())
            .await
    }

    async fn fetch_basket(&self, basket_id: &str) -> GatewayResult<Cart> {
        self.get_data(&["cart", "basket", basket_id], &TransportIds::default())
            .await
    }

    async fn fetch_user_addresses(&self, ids: &TransportIds) -> GatewayResult<UserAddresses> {
        self.get_data(&["user-details", "details"], ids).await
    }

    async fn fetch_delivery_details(&self, ids: &TransportIds) -> GatewayResult<DeliveryDetails> {
        self.get_data(&["user-details", "delivery"], ids).await
    }

    async fn fetch_order(&self, order_id: &str, ids: &TransportIds) -> GatewayResult<OrderSummary> {
        self.get_data(&["orders", order_id], ids).await
    }
}

impl CustomerWriter for HttpGateway {
    async fn save_address(
        &self,
        payload: &CreateCustomer,
        ids: &TransportIds,
    ) -> GatewayResult<()> {
        let url = self.endpoint(&["user-details", "address"]);
        let request = Self::with_ids(self.client.post(url).json(payload), ids);
        request.send().await?.error_for_status()?;
        Ok(())
    }
}

impl OrderWriter for HttpGateway {
    async fn create_cash_order(
        &self,
        request: &CashOrderRequest,
        ids: &TransportIds,
    ) -> GatewayResult<OrderCreated> {
        self.post_data(&["order"], request, ids).await
    }
}
