use serde_json::json;
use storefront_checkout::domain::customer::{CreateCustomer, CustomerDetails, TransportIds};
use storefront_checkout::domain::facet::{OrderType, TimeDraft};
use storefront_checkout::domain::order::{CashOrderRequest, OrderStatus, PaymentMethod};
use storefront_checkout::gateway::errors::GatewayError;
use storefront_checkout::gateway::{CustomerWriter, HttpGateway, OrderWriter, StorefrontReader};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(&server.uri(), 5).expect("gateway")
}

#[tokio::test]
async fn basket_is_unwrapped_from_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cart/basket/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "cartItems": [{ "itemId": "m1", "itemName": "Margherita", "quantity": 1, "price": 9.5 }],
                "basketId": "b1",
                "deviceId": "dev-1",
                "tid": "t-1"
            }
        })))
        .mount(&server)
        .await;

    let cart = gateway(&server).fetch_basket("b1").await.unwrap();

    assert_eq!(cart.cart_items.len(), 1);
    assert_eq!(cart.device_id, "dev-1");
    assert_eq!(cart.subtotal(), 9.5);
}

#[tokio::test]
async fn missing_data_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/menu/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .mount(&server)
        .await;

    let err = gateway(&server).fetch_menu_items().await.unwrap_err();

    assert!(matches!(err, GatewayError::MissingData(ref p) if p == "/menu/listing"));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user-details/delivery"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .fetch_delivery_details(&TransportIds::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Deserialize { .. }));
}

#[tokio::test]
async fn transport_ids_are_sent_when_both_are_known() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user-details/details"))
        .and(header("x-device-id", "dev-1"))
        .and(header("x-tid", "t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "customerDetails": { "name": "Ada King" }, "hasAddress": false }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let addresses = gateway(&server)
        .fetch_user_addresses(&TransportIds::new("dev-1", "t-1"))
        .await
        .unwrap();

    assert_eq!(addresses.customer_details.unwrap().name, "Ada King");
}

#[tokio::test]
async fn partial_transport_ids_are_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/o-1"))
        .and(header_exists("x-device-id"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/o-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "displayId": "#1",
                "orderId": "o-1",
                "orderType": "DELIVERY",
                "selectedMethod": "cash",
                "createdAt": "2024-05-01T18:30:00Z",
                "status": "OUT_FOR_DELIVERY"
            }
        })))
        .mount(&server)
        .await;

    let order = gateway(&server)
        .fetch_order("o-1", &TransportIds::new("dev-1", ""))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::OutForDelivery);
    assert_eq!(order.delivery_time, TimeDraft::default());
}

#[tokio::test]
async fn save_address_fails_on_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user-details/address"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let payload = CreateCustomer {
        customer: CustomerDetails {
            name: "Ada King".into(),
            phone_number: "+4915551234".into(),
            address: None,
        },
        order_type: OrderType::Pickup,
    };

    let result = gateway(&server)
        .save_address(&payload, &TransportIds::default())
        .await;

    assert!(matches!(result, Err(GatewayError::Http(_))));
}

#[tokio::test]
async fn save_address_posts_the_composite_customer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user-details/address"))
        .and(body_json(json!({
            "customer": { "name": "Ada King", "phoneNumber": "+4915551234", "address": null },
            "orderType": "PICKUP"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let payload = CreateCustomer {
        customer: CustomerDetails {
            name: "Ada King".into(),
            phone_number: "+4915551234".into(),
            address: None,
        },
        order_type: OrderType::Pickup,
    };

    gateway(&server)
        .save_address(&payload, &TransportIds::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn cash_order_returns_the_created_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/order"))
        .respond_with(|request: &Request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            let id = format!("o-{}", body["basketId"].as_str().unwrap_or_default());
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "orderId": id } }))
        })
        .mount(&server)
        .await;
    let request = CashOrderRequest {
        selected_method: PaymentMethod::Cash,
        basket_id: "b1".into(),
        order_type: OrderType::Delivery,
        delivery_time: TimeDraft::default(),
        delivery_note: Some("Ring twice".into()),
    };

    let created = gateway(&server)
        .create_cash_order(&request, &TransportIds::new("dev-1", "t-1"))
        .await
        .unwrap();

    assert_eq!(created.into_order_id().as_deref(), Some("o-b1"));
}
