// src/main.rs

use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new().expect("Falha ao inicializar o estado da aplicação.");
    let bind_addr = app_state.bind_addr.clone();

    let inventory_routes = Router::new()
        .route(
            "/items",
            post(handlers::stock::create_item).get(handlers::stock::get_all_items),
        )
        .route(
            "/items/{id}",
            get(handlers::stock::get_item).delete(handlers::stock::delete_item),
        )
        .route("/adjust", post(handlers::stock::adjust_stock))
        .route("/movements", get(handlers::stock::get_movements));

    let recipe_routes = Router::new()
        .route(
            "/",
            post(handlers::recipes::create_recipe).get(handlers::recipes::get_all_recipes),
        )
        .route(
            "/{id}",
            put(handlers::recipes::update_recipe).delete(handlers::recipes::delete_recipe),
        );

    let sales_routes = Router::new()
        .route("/", get(handlers::sales::get_all_sales))
        .route("/simulate", post(handlers::sales::simulate_sale));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/inventory", inventory_routes)
        .nest("/api/recipes", recipe_routes)
        .nest("/api/sales", sales_routes)
        .with_state(app_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()));

    // Inicia o servidor
    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
