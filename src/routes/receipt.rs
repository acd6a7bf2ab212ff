use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, web};

use crate::gateway::HttpGateway;
use crate::services::receipt;
use crate::store::{CheckoutSession, IdentifierSlot};

/// File name safe subset of an order id.
fn file_stem(order_id: &str) -> String {
    order_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect()
}

#[get("/checkout/orders/{order_id}/receipt.pdf")]
pub async fn download_receipt(
    order_id: web::Path<String>,
    session: Session,
    gateway: web::Data<HttpGateway>,
) -> impl Responder {
    let order_id = order_id.into_inner();
    let store = CheckoutSession::new(session);
    let ids = store.transport_ids().unwrap_or_default();

    let Some(order) = receipt::load_order(gateway.get_ref(), &order_id, &ids).await else {
        return HttpResponse::NotFound().finish();
    };

    let page = receipt::receipt_page(&order, "");
    let bytes = receipt::render_pdf(&page);

    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"order-{}.pdf\"", file_stem(&order_id)),
        ))
        .body(bytes)
}
