//src/main.rs

use anyhow::Context;
use axum::{
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();
    let cors = cors_layer(&config.cors_origins);

    let app_state = AppState::new(config)
        .await
        .context("Falha ao inicializar o estado da aplicação.")?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Inicia o servidor
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {}", bind_addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Erro no servidor Axum")?;

    tracing::info!("Servidor encerrado.");
    Ok(())
}

fn router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let public_auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route("/reset-password/{token}", post(handlers::auth::reset_password));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/register-staff", post(handlers::auth::register_staff))
        .route("/users", get(handlers::auth::list_users))
        .route(
            "/users/{id}",
            put(handlers::auth::update_user).delete(handlers::auth::delete_user),
        );

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::inventory::list_products).post(handlers::inventory::create_product),
        )
        .route("/low-stock", get(handlers::inventory::list_low_stock))
        .route(
            "/{id}",
            get(handlers::inventory::get_product)
                .put(handlers::inventory::update_product)
                .delete(handlers::inventory::delete_product),
        );

    let unit_routes = Router::new()
        .route(
            "/",
            get(handlers::inventory::list_units).post(handlers::inventory::create_unit),
        )
        .route(
            "/{id}",
            put(handlers::inventory::update_unit).delete(handlers::inventory::delete_unit),
        );

    let category_routes = Router::new()
        .route(
            "/",
            get(handlers::inventory::list_categories).post(handlers::inventory::create_category),
        )
        .route(
            "/{id}",
            put(handlers::inventory::update_category).delete(handlers::inventory::delete_category),
        );

    let warehouse_routes = Router::new()
        .route(
            "/",
            get(handlers::inventory::list_warehouses).post(handlers::inventory::create_warehouse),
        )
        .route(
            "/{id}",
            put(handlers::inventory::update_warehouse)
                .delete(handlers::inventory::delete_warehouse),
        );

    let adjustment_routes = Router::new().route(
        "/",
        get(handlers::inventory::list_adjustments).post(handlers::inventory::create_adjustment),
    );

    let pos_routes = Router::new()
        .route("/checkout", post(handlers::pos::checkout))
        .route("/invoices", get(handlers::pos::list_invoices));

    let purchase_routes = Router::new()
        .route(
            "/",
            get(handlers::purchases::list_purchases).post(handlers::purchases::create_purchase),
        )
        .route(
            "/{id}",
            put(handlers::purchases::update_purchase).delete(handlers::purchases::delete_purchase),
        )
        .route("/{id}/receive", put(handlers::purchases::receive_purchase))
        .route("/{id}/cancel", put(handlers::purchases::cancel_purchase));

    let quotation_routes = Router::new()
        .route(
            "/",
            get(handlers::quotations::list_quotations).post(handlers::quotations::create_quotation),
        )
        .route(
            "/{id}",
            put(handlers::quotations::update_quotation)
                .delete(handlers::quotations::delete_quotation),
        )
        .route("/{id}/status", put(handlers::quotations::update_quotation_status));

    let expense_routes = Router::new()
        .route(
            "/",
            get(handlers::finance::list_expenses).post(handlers::finance::create_expense),
        )
        .route(
            "/{id}",
            put(handlers::finance::update_expense).delete(handlers::finance::delete_expense),
        );

    let offer_routes = Router::new()
        .route(
            "/",
            get(handlers::offers::list_offers).post(handlers::offers::create_offer),
        )
        .route(
            "/{id}",
            put(handlers::offers::update_offer).delete(handlers::offers::delete_offer),
        );

    let zbill_routes = Router::new().route(
        "/",
        get(handlers::finance::list_zbills).post(handlers::finance::generate_zbill),
    );

    let role_routes = Router::new()
        .route(
            "/",
            get(handlers::rbac::list_roles).post(handlers::rbac::create_role),
        )
        .route("/permissions", get(handlers::rbac::list_permissions))
        .route(
            "/{id}",
            put(handlers::rbac::update_role).delete(handlers::rbac::delete_role),
        );

    let settings_routes = Router::new().route(
        "/",
        get(handlers::settings::get_settings).put(handlers::settings::update_settings),
    );

    // Tudo abaixo exige Bearer token válido
    let protected = Router::new()
        .nest("/auth", user_routes)
        .nest("/products", product_routes)
        .nest("/units", unit_routes)
        .nest("/categories", category_routes)
        .nest("/warehouses", warehouse_routes)
        .nest("/adjustments", adjustment_routes)
        .nest("/pos", pos_routes)
        .nest("/purchases", purchase_routes)
        .nest("/quotations", quotation_routes)
        .nest("/expenses", expense_routes)
        .nest("/offers", offer_routes)
        .nest("/zbills", zbill_routes)
        .nest("/roles", role_routes)
        .nest("/settings", settings_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let api = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/auth", public_auth_routes)
        .merge(protected);

    // Combina tudo no router principal
    Router::new().nest("/api", api).with_state(app_state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Origem CORS inválida ignorada");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Falha ao escutar o sinal de encerramento: {:?}", e);
        return;
    }
    tracing::info!("Sinal de encerramento recebido, finalizando requisições em andamento...");
}
