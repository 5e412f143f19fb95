use actix_cors::Cors;
use actix_web::{dev::Server, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::configuration::settings::{DatabaseSettings, Settings};
use crate::doc::ApiDoc;
use crate::response::ApiResponse;
use crate::routes::{addresses, health_check::health_check, users};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);

        // Non-destructive schema sync: embedded migrations are idempotent.
        sqlx::migrate!("./migrations")
            .run(&connection_pool)
            .await
            .context("Failed to run database migrations.")?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            environment = %configuration.application.environment,
            port,
            "Starting HTTP server"
        );

        Ok(Self {
            port,
            server: run(listener, connection_pool)?,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Awaits the server; actix drains connections and stops gracefully on
    /// SIGTERM/SIGINT, after which the pool is dropped.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .max_connections(5)
        .idle_timeout(std::time::Duration::from_secs(10))
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect_lazy_with(configuration.with_db())
}

pub fn run(listener: TcpListener, connection_pool: PgPool) -> Result<Server, std::io::Error> {
    let connection_pool = web::Data::new(connection_pool);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"]);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(json_config())
            .app_data(path_config())
            .app_data(query_config())
            .service(
                SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .route("/users", web::post().to(users::create_user))
                    .route("/users", web::get().to(users::list_users))
                    .route(
                        "/users-with-addresses",
                        web::get().to(users::list_users_with_addresses),
                    )
                    .route("/users/{id}", web::get().to(users::get_user))
                    .route("/users/{id}", web::put().to(users::update_user))
                    .route("/users/{id}", web::patch().to(users::patch_user))
                    .route("/users/{id}", web::delete().to(users::delete_user))
                    .route("/addresses", web::post().to(addresses::create_address))
                    .route("/addresses", web::get().to(addresses::list_addresses))
                    .route("/addresses/{id}", web::get().to(addresses::get_address))
                    .route("/addresses/{id}", web::put().to(addresses::update_address))
                    .route("/addresses/{id}", web::patch().to(addresses::patch_address))
                    .route(
                        "/addresses/{id}",
                        web::delete().to(addresses::delete_address),
                    ),
            )
            .app_data(connection_pool.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Extractor failures never reach the handlers; they are rewritten into the
/// validation envelope here.
fn validation_error_response(detail: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::validation_errors(vec![detail]))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = validation_error_response(err.to_string());
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        let response = validation_error_response(err.to_string());
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = validation_error_response(err.to_string());
        actix_web::error::InternalError::from_response(err, response).into()
    })
}
