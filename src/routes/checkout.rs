use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;
use validator::Validate;

use crate::domain::facet::{FacetKind, FacetPayload};
use crate::domain::order::PaymentMethod;
use crate::dto::checkout::CheckoutQuery;
use crate::forms::FormError;
use crate::forms::checkout::{
    AddressForm, CheckoutTarget, ContactForm, DialogForm, NotesForm, PaymentMethodForm,
    PlaceOrderForm, TimeForm,
};
use crate::gateway::HttpGateway;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, redirect, render_template};
use crate::services::checkout::{self as checkout_service, CheckoutPage};
use crate::services::order_details::{OrderDetails, reconcile};
use crate::services::{CheckoutContext, ServiceError, payment};
use crate::store::{CheckoutSession, IdentifierSlot};

#[get("/checkout")]
pub async fn show_checkout(
    query: web::Query<CheckoutQuery>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    gateway: web::Data<HttpGateway>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let store = CheckoutSession::new(session);

    let page =
        match checkout_service::show_checkout(&store, gateway.get_ref(), &server_config, &query)
            .await
        {
            Ok(page) => page,
            Err(ServiceError::MissingBasket) => {
                log::info!("Checkout visited without a basket, leaving");
                return redirect(&server_config.storefront_url);
            }
            Err(err) => {
                log::error!("Failed to load checkout: {err}");
                return HttpResponse::InternalServerError().finish();
            }
        };

    let mut context = base_context(&flash_messages, "checkout", &server_config.storefront_url);
    match page {
        CheckoutPage::Confirmation(receipt) => {
            context.insert("receipt", &receipt);
            render_template(&tera, "checkout/confirmation.html", &context)
        }
        CheckoutPage::Editing(page) => {
            context.insert("basket_id", &page.basket_id);
            context.insert("order_type", page.order_type.as_str());
            context.insert("deliverable", &page.deliverable);
            context.insert("can_order", &page.can_order());
            context.insert("details", &page.details);
            context.insert("summary", &page.summary);
            context.insert("payment_methods", &page.payment_methods);
            render_template(&tera, "checkout/index.html", &context)
        }
    }
}

/// Restores the order details of the page a form was posted from.
fn restore_details<F: CheckoutTarget>(
    store: &CheckoutSession,
    server_config: &ServerConfig,
    form: &F,
) -> Option<OrderDetails> {
    let context = CheckoutContext::new(server_config, form.order_type());
    match OrderDetails::restore(context, store) {
        Ok(details) => Some(details),
        Err(err) => {
            log::error!("Failed to restore order details: {err}");
            None
        }
    }
}

#[get("/checkout/dialog/{kind}")]
pub async fn open_dialog(
    kind: web::Path<String>,
    web::Query(form): web::Query<DialogForm>,
    session: Session,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let return_url = form.return_url();
    let Ok(kind) = kind.parse::<FacetKind>() else {
        FlashMessage::error("Unknown section.").send();
        return redirect(&return_url);
    };

    let store = CheckoutSession::new(session);
    let Some(mut details) = restore_details(&store, &server_config, &form) else {
        return HttpResponse::InternalServerError().finish();
    };

    match details.open_dialog(&store, kind) {
        Ok(()) => {}
        Err(ServiceError::FacetUnavailable(_)) => {
            FlashMessage::error("This section cannot be changed for pickup orders.").send();
        }
        Err(err) => {
            log::error!("Failed to open {kind} dialog: {err}");
            FlashMessage::error("Could not open the dialog.").send();
        }
    }
    redirect(&return_url)
}

#[post("/checkout/dialog/close")]
pub async fn close_dialog(
    session: Session,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<DialogForm>,
) -> impl Responder {
    let store = CheckoutSession::new(session);
    if let Some(mut details) = restore_details(&store, &server_config, &form) {
        if let Err(err) = details.close_dialog(&store) {
            log::error!("Failed to close dialog: {err}");
        }
    }
    redirect(&form.return_url())
}

/// Local commit first, then the remote save. A rejected payload or a failed
/// save re-opens the dialog.
async fn confirm_dialog<F>(
    session: Session,
    gateway: &HttpGateway,
    server_config: &ServerConfig,
    form: F,
) -> HttpResponse
where
    F: CheckoutTarget + Validate + Into<FacetPayload>,
{
    let return_url = form.return_url();
    if let Err(err) = form.validate().map_err(FormError::from) {
        log::error!("Failed to validate form: {err}");
        FlashMessage::error("Please check the form.").send();
        return redirect(&return_url);
    }

    let store = CheckoutSession::new(session);
    let Some(mut details) = restore_details(&store, server_config, &form) else {
        return HttpResponse::InternalServerError().finish();
    };

    let commit = match details.confirm(&store, form.into()) {
        Ok(commit) => commit,
        Err(ServiceError::Validation(err)) => {
            FlashMessage::error(format!("Invalid {}: {}", err.field, err.message)).send();
            return redirect(&return_url);
        }
        Err(ServiceError::DialogNotOpen(_) | ServiceError::FacetUnavailable(_)) => {
            FlashMessage::warning("This section is not being edited.").send();
            return redirect(&return_url);
        }
        Err(err) => {
            log::error!("Failed to confirm dialog: {err}");
            FlashMessage::error("Could not update your details.").send();
            return redirect(&return_url);
        }
    };

    let ids = store.transport_ids().unwrap_or_default();
    match reconcile(&store, gateway, &ids, &commit).await {
        Ok(()) if commit.save.is_some() => {
            FlashMessage::success("Your details were saved.").send();
        }
        Ok(()) => {}
        Err(_) => {
            if let Err(err) = details.open_dialog(&store, commit.kind) {
                log::error!("Failed to re-open {} dialog: {err}", commit.kind);
            }
            FlashMessage::error("Your changes are kept but could not be saved. Please try again.")
                .send();
        }
    }
    redirect(&return_url)
}

#[post("/checkout/dialog/contact")]
pub async fn confirm_contact(
    session: Session,
    gateway: web::Data<HttpGateway>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<ContactForm>,
) -> impl Responder {
    confirm_dialog(session, &gateway, &server_config, form).await
}

#[post("/checkout/dialog/address")]
pub async fn confirm_address(
    session: Session,
    gateway: web::Data<HttpGateway>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<AddressForm>,
) -> impl Responder {
    confirm_dialog(session, &gateway, &server_config, form).await
}

#[post("/checkout/dialog/time")]
pub async fn confirm_time(
    session: Session,
    gateway: web::Data<HttpGateway>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<TimeForm>,
) -> impl Responder {
    confirm_dialog(session, &gateway, &server_config, form).await
}

#[post("/checkout/dialog/notes")]
pub async fn confirm_notes(
    session: Session,
    gateway: web::Data<HttpGateway>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<NotesForm>,
) -> impl Responder {
    confirm_dialog(session, &gateway, &server_config, form).await
}

#[post("/checkout/payment-method")]
pub async fn select_payment_method(
    session: Session,
    web::Form(form): web::Form<PaymentMethodForm>,
) -> impl Responder {
    let return_url = form.return_url();
    let method = match PaymentMethod::try_from(&form) {
        Ok(method) => method,
        Err(err) => {
            log::warn!("Rejected payment selection: {err}");
            FlashMessage::error("Unknown payment method.").send();
            return redirect(&return_url);
        }
    };

    let store = CheckoutSession::new(session);
    if let Err(err) = payment::select_method(&store, method) {
        log::error!("Failed to store payment method: {err}");
        FlashMessage::error("Could not change the payment method.").send();
    }
    redirect(&return_url)
}

#[post("/checkout/order")]
pub async fn place_order(
    session: Session,
    gateway: web::Data<HttpGateway>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<PlaceOrderForm>,
) -> impl Responder {
    let return_url = form.return_url();
    if let Err(err) = form.validate().map_err(FormError::from) {
        log::error!("Failed to validate form: {err}");
        return redirect(&server_config.storefront_url);
    }

    let store = CheckoutSession::new(session);
    let Some(details) = restore_details(&store, &server_config, &form) else {
        return HttpResponse::InternalServerError().finish();
    };
    if !details.is_ready() {
        FlashMessage::warning("Please complete your contact details and address first.").send();
        return redirect(&return_url);
    }

    let ids = store.transport_ids().unwrap_or_default();
    match payment::place_cash_order(
        &store,
        gateway.get_ref(),
        &ids,
        &form.basket_id,
        form.order_type(),
    )
    .await
    {
        Ok(order_id) => redirect(&CheckoutQuery::confirmation(&form.basket_id, &order_id).to_url()),
        Err(ServiceError::NotDeliverable) => {
            FlashMessage::warning("We cannot deliver to this address. Try pickup instead.").send();
            redirect(&return_url)
        }
        Err(err) => {
            log::error!("Failed to place order: {err}");
            FlashMessage::error("Your order could not be placed. Please try again.").send();
            redirect(&return_url)
        }
    }
}
