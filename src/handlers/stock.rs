// src/handlers/stock.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::{error::AppError, units},
    config::AppState,
    middleware::tenancy::TenantContext,
    models::stock::NewStockItem,
};

// ---
// Validação Customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: CreateItem
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub category: String,

    /// Unidade canônica de armazenamento (ex: "Kg", "L", "Unid").
    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    pub unit: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)] // Se o JSON não tiver esse campo, assume 0
    pub current_quantity: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub min_quantity: Decimal,

    pub max_quantity: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub cost: Decimal,

    #[serde(default)]
    pub auto_reorder: bool,
    pub reorder_point: Option<Decimal>,
    pub reorder_quantity: Option<Decimal>,
}

// ---
// Handler: create_item
// ---
#[utoipa::path(
    post,
    path = "/api/inventory/items",
    tag = "inventory",
    request_body = CreateItemPayload,
    responses(
        (status = 201, description = "Item registrado (com movimentação de estoque inicial)", body = crate::models::stock::StockItem),
        (status = 400, description = "Campos inválidos"),
    ),
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let new_item = app_state
        .stock_service
        .register(
            tenant.0,
            NewStockItem {
                name: payload.name,
                category: payload.category,
                unit: payload.unit,
                current_quantity: payload.current_quantity,
                min_quantity: payload.min_quantity,
                max_quantity: payload.max_quantity,
                cost: payload.cost,
                auto_reorder: payload.auto_reorder,
                reorder_point: payload.reorder_point,
                reorder_quantity: payload.reorder_quantity,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(new_item)))
}

// ---
// Handler: get_all_items
// ---
#[utoipa::path(
    get,
    path = "/api/inventory/items",
    tag = "inventory",
    responses((status = 200, description = "Itens do tenant, ordenados por nome", body = [crate::models::stock::StockItem])),
)]
pub async fn get_all_items(
    State(app_state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state.stock_service.list_items(tenant.0).await?;
    Ok((StatusCode::OK, Json(items)))
}

// ---
// Query: unidade de exibição
// ---
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemQuery {
    /// Converte as quantidades para esta unidade de exibição
    /// (ex: "g" para um item armazenado em "Kg").
    pub unit: Option<String>,
}

// ---
// Handler: get_item
// ---
#[utoipa::path(
    get,
    path = "/api/inventory/items/{id}",
    tag = "inventory",
    params(("id" = Uuid, Path, description = "Id do item de estoque"), ItemQuery),
    responses(
        (status = 200, body = crate::models::stock::StockItem),
        (status = 404, description = "Item não encontrado"),
    ),
)]
pub async fn get_item(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Query(query): Query<ItemQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut item = app_state.stock_service.get_item(tenant.0, id).await?;

    // Conversão só na resposta; o que está gravado continua canônico.
    if let Some(unit) = query.unit {
        item.current_quantity = units::to_display(item.current_quantity, &item.unit, &unit);
        item.min_quantity = units::to_display(item.min_quantity, &item.unit, &unit);
        item.max_quantity = item
            .max_quantity
            .map(|q| units::to_display(q, &item.unit, &unit));
        item.unit = unit;
    }

    Ok((StatusCode::OK, Json(item)))
}

// ---
// Handler: delete_item
// ---
// Remoção incondicional: receitas que referenciam o item não são checadas.
#[utoipa::path(
    delete,
    path = "/api/inventory/items/{id}",
    tag = "inventory",
    params(("id" = Uuid, Path, description = "Id do item de estoque")),
    responses(
        (status = 204, description = "Item removido"),
        (status = 404, description = "Item não encontrado"),
    ),
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.stock_service.remove(tenant.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Payload: AdjustStock (entrada, saída ou ajuste de contagem)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockPayload {
    pub item_id: Uuid,

    /// Positivo = entrada, negativo = saída, na unidade canônica do item
    /// (ou na unidade de `unit`, se informada).
    pub delta: Decimal,

    #[validate(length(min = 1, message = "O motivo é obrigatório."))]
    pub reason: String,

    /// true = movimentação de AJUSTE (contagem física), independente do
    /// sinal do delta.
    #[serde(default)]
    pub adjustment: bool,

    /// Identificador do ator; padrão "system".
    pub actor: Option<String>,

    /// Unidade de exibição do delta (ex: "g" para um item em "Kg").
    pub unit: Option<String>,
}

// ---
// Handler: adjust_stock
// ---
#[utoipa::path(
    post,
    path = "/api/inventory/adjust",
    tag = "inventory",
    request_body = AdjustStockPayload,
    responses(
        (status = 200, description = "Saldo e status atualizados", body = crate::models::stock::StockItem),
        (status = 400, description = "Delta inválido ou saldo ficaria negativo"),
        (status = 404, description = "Item não encontrado"),
    ),
)]
pub async fn adjust_stock(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<AdjustStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated_item = app_state
        .stock_service
        .adjust_quantity(
            tenant.0,
            payload.item_id,
            payload.delta,
            payload.adjustment,
            &payload.reason,
            payload.actor.as_deref().unwrap_or("system"),
            payload.unit.as_deref(),
        )
        .await?;

    // Retorna o novo saldo para o frontend atualizar a tela.
    Ok((StatusCode::OK, Json(updated_item)))
}

// ---
// Query: filtro do histórico
// ---
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct MovementsQuery {
    /// Quando presente, filtra o histórico por produto.
    pub product_id: Option<Uuid>,
}

// ---
// Handler: get_movements
// ---
#[utoipa::path(
    get,
    path = "/api/inventory/movements",
    tag = "inventory",
    params(MovementsQuery),
    responses((status = 200, description = "Histórico, mais recente primeiro", body = [crate::models::stock::StockMovement])),
)]
pub async fn get_movements(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<MovementsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let movements = match query.product_id {
        Some(product_id) => {
            app_state
                .movement_service
                .list_by_product(tenant.0, product_id)
                .await?
        }
        None => app_state.movement_service.list_all(tenant.0).await?,
    };
    Ok((StatusCode::OK, Json(movements)))
}
