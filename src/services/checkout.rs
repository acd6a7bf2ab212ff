//! Page loaders for the checkout and the bill shown next to the order summary.
//!
//! Every remote lookup here soft-fails: errors are logged and replaced with an
//! empty value so the page still renders.

use crate::domain::basket::{Cart, MenuItem};
use crate::domain::customer::{Customer, CustomerDetails, TransportIds};
use crate::domain::facet::OrderType;
use crate::dto::checkout::{
    BillView, CheckoutPageData, CheckoutQuery, OrderDetailsView, OrderSummaryView, PaymentOption,
    SummaryLine,
};
use crate::dto::receipt::ReceiptPageData;
use crate::gateway::StorefrontReader;
use crate::models::config::ServerConfig;
use crate::services::order_details::OrderDetails;
use crate::services::{CheckoutContext, ServiceError, ServiceResult, payment, receipt};
use crate::store::{CheckoutStore, IdentifierSlot};

pub const SERVICE_FEE_PERCENT: f64 = 2.5;
pub const SERVICE_FEE_CAP: f64 = 0.99;

/// Everything the checkout page fetches from the backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CheckoutData {
    pub menu: Vec<MenuItem>,
    pub cart: Cart,
    pub customer: Customer,
    /// Saved customer details, reused to seed the order details.
    pub saved_details: Option<CustomerDetails>,
    pub ids: TransportIds,
}

/// Returns the basket id or [`ServiceError::MissingBasket`] when absent or blank.
pub fn require_basket_id(basket_id: Option<&str>) -> ServiceResult<&str> {
    basket_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(ServiceError::MissingBasket)
}

pub async fn load_menu<G>(gateway: &G) -> Vec<MenuItem>
where
    G: StorefrontReader + ?Sized,
{
    gateway.fetch_menu_items().await.unwrap_or_else(|err| {
        log::error!("Failed to fetch menu items: {err}");
        Vec::new()
    })
}

pub async fn load_cart<G>(gateway: &G, basket_id: &str) -> Cart
where
    G: StorefrontReader + ?Sized,
{
    gateway.fetch_basket(basket_id).await.unwrap_or_else(|err| {
        log::error!("Failed to fetch basket {basket_id}: {err}");
        Cart::default()
    })
}

/// Fetches the customer's saved details and delivery eligibility
/// concurrently and merges them. The saved details are also returned on their
/// own; they survive a failed eligibility lookup.
pub async fn load_customer<G>(
    gateway: &G,
    ids: &TransportIds,
) -> (Customer, Option<CustomerDetails>)
where
    G: StorefrontReader + ?Sized,
{
    let (addresses, delivery) = tokio::join!(
        gateway.fetch_user_addresses(ids),
        gateway.fetch_delivery_details(ids)
    );
    let addresses = match addresses {
        Ok(addresses) => Some(addresses),
        Err(err) => {
            log::error!("Failed to fetch user addresses: {err}");
            None
        }
    };
    let customer = match (&addresses, delivery) {
        (Some(addresses), Ok(delivery)) => Customer::merge(
            addresses.customer_details.clone().unwrap_or_default(),
            delivery,
        ),
        (Some(_), Err(err)) => {
            log::error!("Failed to fetch delivery details: {err}");
            Customer::unavailable()
        }
        (None, _) => Customer::unavailable(),
    };
    (customer, addresses.and_then(|addresses| addresses.customer_details))
}

/// Loads menu and basket in parallel, then the customer with the basket's
/// transport identifiers. Fresh identifiers are remembered in the session.
pub async fn load_checkout<S, G>(store: &S, gateway: &G, basket_id: &str) -> ServiceResult<CheckoutData>
where
    S: IdentifierSlot + ?Sized,
    G: StorefrontReader + ?Sized,
{
    let (menu, cart) = tokio::join!(load_menu(gateway), load_cart(gateway, basket_id));

    let fresh = TransportIds::new(cart.device_id.clone(), cart.tid.clone());
    let ids = if fresh.pair().is_some() {
        store.remember_transport_ids(&fresh)?;
        fresh
    } else {
        store.transport_ids()?
    };

    let (customer, saved_details) = load_customer(gateway, &ids).await;

    Ok(CheckoutData {
        menu,
        cart,
        customer,
        saved_details,
        ids,
    })
}

/// Query parameter first, then the customer's previous choice.
pub fn resolve_order_type(param: Option<&str>, customer: &Customer) -> OrderType {
    OrderType::resolve(param, Some(customer.order_type.as_str()))
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BillSummary {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub service_fee: f64,
    pub total: f64,
}

impl BillSummary {
    pub fn compute(cart: &Cart, customer: &Customer, order_type: OrderType) -> Self {
        let subtotal = cart.subtotal();
        let delivery_fee = if order_type == OrderType::Delivery && !customer.is_free_delivery {
            customer.delivery_fee
        } else {
            0.0
        };
        let service_fee = service_fee(subtotal);
        Self {
            subtotal,
            delivery_fee,
            service_fee,
            total: subtotal + delivery_fee + service_fee,
        }
    }
}

impl BillView {
    pub fn new(bill: &BillSummary, order_type: OrderType) -> Self {
        Self {
            subtotal: format_price(bill.subtotal),
            delivery_fee: (order_type == OrderType::Delivery).then(|| format_price(bill.delivery_fee)),
            service_fee: format_price(bill.service_fee),
            total: format_price(bill.total),
        }
    }
}

/// Order summary for the basket, or `None` when it is empty.
pub fn summarize(data: &CheckoutData, order_type: OrderType) -> Option<OrderSummaryView> {
    if data.cart.is_empty() {
        return None;
    }
    let lines = data
        .cart
        .cart_items
        .iter()
        .map(|item| SummaryLine {
            name: item.item_name.clone(),
            quantity: item.quantity,
            price: format_price(item.price),
            image: data
                .menu
                .iter()
                .find(|entry| entry.id == item.item_id)
                .and_then(|entry| entry.image.clone()),
            extras: item
                .customization
                .as_ref()
                .map(|c| c.describe())
                .unwrap_or_default(),
        })
        .collect();
    let bill = BillSummary::compute(&data.cart, &data.customer, order_type);
    Some(OrderSummaryView {
        lines,
        bill: BillView::new(&bill, order_type),
    })
}

/// What `/checkout` renders.
#[derive(Clone, Debug)]
pub enum CheckoutPage {
    Editing(Box<CheckoutPageData>),
    Confirmation(Box<ReceiptPageData>),
}

/// Builds the checkout page for one visit.
///
/// With an `orderId` whose lookup succeeds the receipt replaces the editing
/// view. Otherwise the page data is loaded and the order details are seeded.
pub async fn show_checkout<S, G>(
    store: &S,
    gateway: &G,
    config: &ServerConfig,
    query: &CheckoutQuery,
) -> ServiceResult<CheckoutPage>
where
    S: CheckoutStore + ?Sized,
    G: StorefrontReader + ?Sized,
{
    let basket_id = require_basket_id(query.basket_id.as_deref())?;

    if let Some(order_id) = query.order_id.as_deref().filter(|id| !id.trim().is_empty()) {
        let ids = store.transport_ids()?;
        if let Some(order) = receipt::load_order(gateway, order_id, &ids).await {
            let page = receipt::receipt_page(&order, basket_id);
            return Ok(CheckoutPage::Confirmation(Box::new(page)));
        }
        log::warn!("Order {order_id} unavailable, showing the editing view");
    }

    let data = load_checkout(store, gateway, basket_id).await?;
    let order_type = resolve_order_type(query.order_type.as_deref(), &data.customer);

    let mut details = OrderDetails::new(CheckoutContext::new(config, order_type));
    details.seed(store, data.saved_details.as_ref())?;
    details.adopt_dialog(store)?;

    let selected = payment::selected_method(store)?;

    Ok(CheckoutPage::Editing(Box::new(CheckoutPageData {
        basket_id: basket_id.to_string(),
        order_type,
        deliverable: data.customer.deliverable,
        details: OrderDetailsView::from(&details),
        summary: summarize(&data, order_type),
        payment_methods: PaymentOption::all(selected),
    })))
}

/// 2.5% of the subtotal in cents, never more than 0.99.
pub fn service_fee(subtotal: f64) -> f64 {
    let fee = (subtotal * SERVICE_FEE_PERCENT).round() / 100.0;
    fee.min(SERVICE_FEE_CAP)
}

/// Formats an amount the way the storefront prints prices: `12,50 €`.
pub fn format_price(amount: f64) -> String {
    format!("{amount:.2} €").replacen('.', ",", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::basket::BasketItem;
    use crate::domain::customer::{CustomerAddress, DeliveryDetails, UserAddresses};
    use crate::gateway::errors::GatewayError;
    use crate::gateway::mock::MockGateway;
    use crate::models::config::test_config;
    use crate::store::{DraftReader, MemoryStore};

    fn cart(prices: &[f64]) -> Cart {
        Cart {
            cart_items: prices
                .iter()
                .enumerate()
                .map(|(i, price)| BasketItem {
                    item_id: format!("i{i}"),
                    item_name: format!("Item {i}"),
                    quantity: 1,
                    price: *price,
                    customization: None,
                })
                .collect(),
            basket_id: "b1".into(),
            device_id: "dev".into(),
            tid: "t1".into(),
        }
    }

    #[test]
    fn basket_id_is_required() {
        assert_eq!(require_basket_id(Some(" b1 ")).unwrap(), "b1");
        assert!(matches!(require_basket_id(Some("")), Err(ServiceError::MissingBasket)));
        assert!(matches!(require_basket_id(None), Err(ServiceError::MissingBasket)));
    }

    #[test]
    fn service_fee_is_capped() {
        assert_eq!(service_fee(10.0), 0.25);
        assert_eq!(service_fee(100.0), 0.99);
        assert_eq!(service_fee(0.0), 0.0);
    }

    #[test]
    fn delivery_fee_only_applies_to_paid_delivery() {
        let customer = Customer {
            delivery_fee: 2.5,
            ..Customer::default()
        };
        let items = cart(&[8.0, 4.0]);

        let delivery = BillSummary::compute(&items, &customer, OrderType::Delivery);
        let pickup = BillSummary::compute(&items, &customer, OrderType::Pickup);
        let free = BillSummary::compute(
            &items,
            &Customer {
                is_free_delivery: true,
                ..customer.clone()
            },
            OrderType::Delivery,
        );

        assert_eq!(delivery.subtotal, 12.0);
        assert_eq!(delivery.delivery_fee, 2.5);
        assert_eq!(delivery.service_fee, 0.3);
        assert!((delivery.total - 14.8).abs() < 1e-9);
        assert_eq!(pickup.delivery_fee, 0.0);
        assert_eq!(free.delivery_fee, 0.0);
    }

    #[test]
    fn prices_use_a_decimal_comma() {
        assert_eq!(format_price(12.5), "12,50 €");
        assert_eq!(format_price(0.0), "0,00 €");
    }

    #[test]
    fn order_type_falls_back_to_customer_preference() {
        let customer = Customer {
            order_type: "PICKUP".into(),
            ..Customer::default()
        };
        assert_eq!(resolve_order_type(None, &customer), OrderType::Pickup);
        assert_eq!(
            resolve_order_type(Some("DELIVERY"), &customer),
            OrderType::Delivery
        );
    }

    #[actix_web::test]
    async fn checkout_loads_customer_with_basket_identifiers() {
        let store = MemoryStore::new();
        let mut gateway = MockGateway::new();
        gateway
            .expect_fetch_menu_items()
            .returning(|| Ok(Vec::new()));
        gateway
            .expect_fetch_basket()
            .withf(|id| id == "b1")
            .returning(|_| Ok(cart(&[5.0])));
        gateway
            .expect_fetch_user_addresses()
            .withf(|ids| ids.pair() == Some(("dev", "t1")))
            .returning(|_| {
                Ok(UserAddresses {
                    customer_details: Some(CustomerDetails {
                        name: "Ada".into(),
                        ..CustomerDetails::default()
                    }),
                    has_address: false,
                })
            });
        gateway
            .expect_fetch_delivery_details()
            .returning(|_| {
                Ok(DeliveryDetails {
                    deliverable: true,
                    ..DeliveryDetails::default()
                })
            });

        let data = load_checkout(&store, &gateway, "b1").await.unwrap();

        assert_eq!(data.customer.name, "Ada");
        assert!(data.customer.deliverable);
        assert_eq!(data.saved_details.map(|d| d.name).as_deref(), Some("Ada"));
        assert_eq!(store.transport_ids().unwrap(), TransportIds::new("dev", "t1"));
    }

    #[actix_web::test]
    async fn missing_basket_fetches_nothing() {
        let store = MemoryStore::new();
        let gateway = MockGateway::new();

        let result = show_checkout(&store, &gateway, &test_config(), &CheckoutQuery::default()).await;

        assert!(matches!(result, Err(ServiceError::MissingBasket)));
    }

    #[actix_web::test]
    async fn known_order_replaces_the_editing_view() {
        let store = MemoryStore::new();
        let mut gateway = MockGateway::new();
        gateway
            .expect_fetch_order()
            .withf(|id, _| id == "o-1")
            .times(1)
            .returning(|_, _| {
                Ok(serde_json::from_str(
                    r##"{"displayId":"#7","orderId":"o-1","orderType":"PICKUP",
                        "selectedMethod":"cash","createdAt":"2025-01-02T10:00:00Z",
                        "status":"PENDING"}"##,
                )
                .unwrap())
            });
        gateway.expect_fetch_basket().never();

        let query = CheckoutQuery::confirmation("b1", "o-1");
        let page = show_checkout(&store, &gateway, &test_config(), &query).await.unwrap();

        match page {
            CheckoutPage::Confirmation(receipt) => assert_eq!(receipt.display_id, "#7"),
            CheckoutPage::Editing(_) => panic!("expected the receipt"),
        }
    }

    #[actix_web::test]
    async fn empty_basket_renders_details_without_summary() {
        let store = MemoryStore::new();
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_menu_items().returning(|| Ok(Vec::new()));
        gateway.expect_fetch_basket().returning(|_| Ok(Cart::default()));
        gateway
            .expect_fetch_user_addresses()
            .returning(|_| Ok(UserAddresses::default()));
        gateway
            .expect_fetch_delivery_details()
            .returning(|_| Ok(DeliveryDetails::default()));

        let query = CheckoutQuery::editing("b1", OrderType::Delivery);
        let page = show_checkout(&store, &gateway, &test_config(), &query).await.unwrap();

        let CheckoutPage::Editing(data) = page else {
            panic!("expected the editing view");
        };
        assert!(data.summary.is_none());
        assert!(!data.details.ready);
        assert_eq!(data.payment_methods.iter().filter(|o| o.selected).count(), 1);
    }

    #[actix_web::test]
    async fn failed_lookups_fall_back_to_empty_values() {
        let store = MemoryStore::new();
        store
            .remember_transport_ids(&TransportIds::new("old-dev", "old-t"))
            .unwrap();
        let mut gateway = MockGateway::new();
        gateway
            .expect_fetch_menu_items()
            .returning(|| Err(GatewayError::Api("down".into())));
        gateway
            .expect_fetch_basket()
            .returning(|_| Err(GatewayError::Api("down".into())));
        gateway
            .expect_fetch_user_addresses()
            .withf(|ids| ids.pair() == Some(("old-dev", "old-t")))
            .returning(|_| Ok(UserAddresses::default()));
        gateway
            .expect_fetch_delivery_details()
            .returning(|_| Err(GatewayError::MissingData("/user-details/delivery".into())));

        let data = load_checkout(&store, &gateway, "b1").await.unwrap();

        assert!(data.menu.is_empty());
        assert!(data.cart.is_empty());
        assert_eq!(data.customer, Customer::unavailable());
        assert!(!data.customer.deliverable);
        assert_eq!(data.saved_details, None);
    }

    #[actix_web::test]
    async fn checkout_fetches_saved_details_once_and_seeds_from_them() {
        let store = MemoryStore::new();
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_menu_items().returning(|| Ok(Vec::new()));
        gateway
            .expect_fetch_basket()
            .returning(|_| Ok(cart(&[12.0])));
        gateway
            .expect_fetch_user_addresses()
            .times(1)
            .returning(|_| {
                Ok(UserAddresses {
                    customer_details: Some(CustomerDetails {
                        name: "Ada King".into(),
                        phone_number: "15551234".into(),
                        address: Some(CustomerAddress {
                            building_number: "12".into(),
                            street: "Main St".into(),
                            town: "Berlin".into(),
                            pincode: "10115".into(),
                            display_address: String::new(),
                        }),
                    }),
                    has_address: true,
                })
            });
        gateway.expect_fetch_delivery_details().times(1).returning(|_| {
            Ok(DeliveryDetails {
                deliverable: true,
                ..DeliveryDetails::default()
            })
        });

        let query = CheckoutQuery::editing("b1", OrderType::Delivery);
        let page = show_checkout(&store, &gateway, &test_config(), &query).await.unwrap();

        let CheckoutPage::Editing(data) = page else {
            panic!("expected the editing view");
        };
        assert!(data.details.ready);
        assert_eq!(data.details.contact.name, "Ada King");
        assert!(data.can_order());
        assert_eq!(store.address_draft().unwrap().map(|a| a.street).as_deref(), Some("Main St"));
    }
}
