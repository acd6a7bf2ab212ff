use actix_cors::Cors;
use actix_files::Files;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::gateway::HttpGateway;
use crate::models::config::ServerConfig;
use crate::routes::checkout::{
    close_dialog, confirm_address, confirm_contact, confirm_notes, confirm_time, open_dialog,
    place_order, select_payment_method, show_checkout,
};
use crate::routes::receipt::download_receipt;

pub mod domain;
pub mod dto;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod pdf;
pub mod routes;
pub mod services;
pub mod store;

/// Minimum length of the cookie signing secret.
pub const MIN_SECRET_LEN: usize = 64;

/// Registers the checkout routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(show_checkout)
        .service(close_dialog)
        .service(confirm_contact)
        .service(confirm_address)
        .service(confirm_time)
        .service(confirm_notes)
        .service(open_dialog)
        .service(select_payment_method)
        .service(place_order)
        .service(download_receipt);
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    if server_config.secret.len() < MIN_SECRET_LEN {
        return Err(std::io::Error::other(format!(
            "secret must be at least {MIN_SECRET_LEN} bytes"
        )));
    }

    let gateway = HttpGateway::new(&server_config.backend_url, server_config.request_timeout_secs)
        .map_err(|e| std::io::Error::other(format!("Failed to build backend client: {e}")))?;

    // Keys and stores for sessions and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting checkout on {}:{} against {}",
        bind_address.0,
        bind_address.1,
        server_config.backend_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
