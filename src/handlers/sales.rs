// src/handlers/sales.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, middleware::tenancy::TenantContext};

// ---
// Payload: SimulateSale
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulateSalePayload {
    pub recipe_id: Uuid,

    /// Número de porções vendidas.
    #[validate(range(min = 1, message = "A quantidade da venda deve ser positiva."))]
    pub quantity: i32,
}

// ---
// Handler: simulate_sale
// ---
// Tudo ou nada: ou todos os ingredientes são baixados e a venda é
// registrada, ou nada muda.
#[utoipa::path(
    post,
    path = "/api/sales/simulate",
    tag = "sales",
    request_body = SimulateSalePayload,
    responses(
        (status = 201, description = "Venda registrada, ingredientes baixados", body = crate::models::recipe::Sale),
        (status = 404, description = "Prato não encontrado"),
        (status = 422, description = "Estoque insuficiente (lista todas as faltas)"),
    ),
)]
pub async fn simulate_sale(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<SimulateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let sale = app_state
        .sale_service
        .simulate(tenant.0, payload.recipe_id, payload.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

// ---
// Handler: get_all_sales
// ---
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "sales",
    responses((status = 200, description = "Vendas simuladas, mais recente primeiro", body = [crate::models::recipe::Sale])),
)]
pub async fn get_all_sales(
    State(app_state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sale_service.list(tenant.0).await?;
    Ok((StatusCode::OK, Json(sales)))
}
