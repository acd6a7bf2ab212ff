//! Payment-method selection and cash order placement.

use crate::domain::customer::TransportIds;
use crate::domain::facet::OrderType;
use crate::domain::order::{CashOrderRequest, PaymentMethod};
use crate::gateway::{OrderWriter, StorefrontReader};
use crate::services::{ServiceError, ServiceResult};
use crate::store::{DraftReader, PaymentSlot};

/// Currently selected payment method. An absent or unknown selection falls
/// back to cash, which is written back so later reads agree.
pub fn selected_method<S>(store: &S) -> ServiceResult<PaymentMethod>
where
    S: PaymentSlot + ?Sized,
{
    match store.payment_method()? {
        Some(method) => Ok(method),
        None => {
            store.set_payment_method(PaymentMethod::default())?;
            Ok(PaymentMethod::default())
        }
    }
}

pub fn select_method<S>(store: &S, method: PaymentMethod) -> ServiceResult<()>
where
    S: PaymentSlot + ?Sized,
{
    store.set_payment_method(method)?;
    log::debug!("Payment method set to {}", method.id());
    Ok(())
}

/// Builds the cash order body from the session drafts.
pub fn cash_order_request<S>(
    store: &S,
    basket_id: &str,
    order_type: OrderType,
) -> ServiceResult<CashOrderRequest>
where
    S: DraftReader + PaymentSlot + ?Sized,
{
    let delivery_time = store.time_draft()?.unwrap_or_default();
    let delivery_note = match order_type {
        OrderType::Delivery => Some(store.note_draft()?.unwrap_or_default().notes),
        OrderType::Pickup => None,
    };

    Ok(CashOrderRequest {
        selected_method: selected_method(store)?,
        basket_id: basket_id.to_string(),
        order_type,
        delivery_time,
        delivery_note,
    })
}

/// Delivery orders need an address the backend currently delivers to. A
/// failed eligibility lookup refuses the order as well.
pub async fn ensure_deliverable<G>(
    gateway: &G,
    ids: &TransportIds,
    order_type: OrderType,
) -> ServiceResult<()>
where
    G: StorefrontReader + ?Sized,
{
    if order_type == OrderType::Pickup {
        return Ok(());
    }
    let delivery = gateway.fetch_delivery_details(ids).await.map_err(|err| {
        log::error!("Failed to check delivery eligibility: {err}");
        ServiceError::from(err)
    })?;
    if delivery.deliverable {
        Ok(())
    } else {
        Err(ServiceError::NotDeliverable)
    }
}

/// Places the order and returns the created order id.
///
/// A response without an order id is reported as
/// [`ServiceError::OrderRejected`] so the caller can offer a retry.
pub async fn place_cash_order<S, G>(
    store: &S,
    gateway: &G,
    ids: &TransportIds,
    basket_id: &str,
    order_type: OrderType,
) -> ServiceResult<String>
where
    S: DraftReader + PaymentSlot + ?Sized,
    G: StorefrontReader + OrderWriter + ?Sized,
{
    ensure_deliverable(gateway, ids, order_type).await?;
    let request = cash_order_request(store, basket_id, order_type)?;
    let created = gateway
        .create_cash_order(&request, ids)
        .await
        .map_err(|err| {
            log::error!("Failed to place order for basket {basket_id}: {err}");
            ServiceError::from(err)
        })?;

    match created.into_order_id() {
        Some(order_id) => {
            log::info!("Placed order {order_id} for basket {basket_id}");
            Ok(order_id)
        }
        None => {
            log::error!("Order placement for basket {basket_id} returned no order id");
            Err(ServiceError::OrderRejected(
                "the backend did not return an order id".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::facet::{FacetDraft, NoteDraft, TimeDraft};
    use crate::domain::customer::DeliveryDetails;
    use crate::domain::order::OrderCreated;
    use crate::gateway::errors::GatewayError;
    use crate::gateway::mock::MockGateway;
    use crate::store::{DraftWriter, MemoryStore};

    fn deliverable_gateway(deliverable: bool) -> MockGateway {
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_delivery_details().returning(move |_| {
            Ok(DeliveryDetails {
                deliverable,
                ..DeliveryDetails::default()
            })
        });
        gateway
    }

    #[test]
    fn selection_defaults_to_cash_and_is_persisted() {
        let store = MemoryStore::new();

        assert_eq!(selected_method(&store).unwrap(), PaymentMethod::Cash);
        assert_eq!(store.payment_method().unwrap(), Some(PaymentMethod::Cash));

        select_method(&store, PaymentMethod::Paypal).unwrap();
        assert_eq!(selected_method(&store).unwrap(), PaymentMethod::Paypal);
    }

    #[test]
    fn pickup_orders_carry_no_note() {
        let store = MemoryStore::new();
        store
            .put_draft(&FacetDraft::Notes(NoteDraft {
                notes: "Leave at door".into(),
            }))
            .unwrap();

        let pickup = cash_order_request(&store, "b1", OrderType::Pickup).unwrap();
        let delivery = cash_order_request(&store, "b1", OrderType::Delivery).unwrap();

        assert_eq!(pickup.delivery_note, None);
        assert_eq!(delivery.delivery_note.as_deref(), Some("Leave at door"));
        assert_eq!(delivery.delivery_time, TimeDraft::default());
    }

    #[actix_web::test]
    async fn placed_order_returns_its_id() {
        let store = MemoryStore::new();
        store
            .put_draft(&FacetDraft::Time(TimeDraft {
                asap: false,
                scheduled_time: "18:00".into(),
            }))
            .unwrap();
        let mut gateway = deliverable_gateway(true);
        gateway
            .expect_create_cash_order()
            .withf(|request, _| {
                request.basket_id == "b1"
                    && request.delivery_time.scheduled_time == "18:00"
                    && request.selected_method == PaymentMethod::Cash
            })
            .times(1)
            .returning(|_, _| {
                Ok(OrderCreated {
                    order_id: Some("o-42".into()),
                })
            });

        let order_id = place_cash_order(
            &store,
            &gateway,
            &TransportIds::default(),
            "b1",
            OrderType::Delivery,
        )
        .await
        .unwrap();

        assert_eq!(order_id, "o-42");
    }

    #[actix_web::test]
    async fn missing_order_id_is_a_failure() {
        let store = MemoryStore::new();
        let mut gateway = MockGateway::new();
        gateway
            .expect_create_cash_order()
            .returning(|_, _| Ok(OrderCreated::default()));

        let err = place_cash_order(
            &store,
            &gateway,
            &TransportIds::default(),
            "b1",
            OrderType::Pickup,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::OrderRejected(_)));
    }

    #[actix_web::test]
    async fn backend_errors_propagate() {
        let store = MemoryStore::new();
        let mut gateway = deliverable_gateway(true);
        gateway
            .expect_create_cash_order()
            .returning(|_, _| Err(GatewayError::Api("closed".into())));

        let err = place_cash_order(
            &store,
            &gateway,
            &TransportIds::default(),
            "b1",
            OrderType::Delivery,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::Gateway(_)));
    }

    #[actix_web::test]
    async fn undeliverable_address_places_no_order() {
        let store = MemoryStore::new();
        let mut gateway = deliverable_gateway(false);
        gateway.expect_create_cash_order().never();

        let err = place_cash_order(
            &store,
            &gateway,
            &TransportIds::default(),
            "b1",
            OrderType::Delivery,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::NotDeliverable));
    }

    #[actix_web::test]
    async fn pickup_skips_the_eligibility_check() {
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_delivery_details().never();

        ensure_deliverable(&gateway, &TransportIds::default(), OrderType::Pickup)
            .await
            .unwrap();
    }
}
