// src/handlers/recipes.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::TenantContext,
    models::recipe::{NewRecipe, NewRecipeIngredient, RecipePatch},
};

// ---
// Payload: ingrediente (entrada)
// ---
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientPayload {
    pub product_id: Uuid,
    /// Quantidade por UMA porção. Pode vir numa unidade de exibição.
    pub quantity: Decimal,
    /// Unidade de exibição (ex: "g"); omitida = unidade canônica do item.
    pub unit: Option<String>,
}

impl IngredientPayload {
    fn into_new(self) -> NewRecipeIngredient {
        NewRecipeIngredient {
            product_id: self.product_id,
            quantity: self.quantity,
            unit: self.unit,
        }
    }
}

// ---
// Payload: CreateRecipe
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipePayload {
    #[validate(length(min = 1, message = "O nome do prato é obrigatório."))]
    pub dish_name: String,

    pub menu_item_id: Option<String>,

    #[validate(range(min = 1, message = "O número de porções deve ser positivo."))]
    pub servings: i32,

    #[validate(length(min = 1, message = "A receita precisa de pelo menos um ingrediente."))]
    pub ingredients: Vec<IngredientPayload>,
}

// ---
// Handler: create_recipe
// ---
#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipePayload,
    responses(
        (status = 201, description = "Receita criada com custo congelado", body = crate::models::recipe::Recipe),
        (status = 400, description = "Campos inválidos ou ingrediente inexistente"),
        (status = 422, description = "Estoque atual abaixo da quantidade por porção"),
    ),
)]
pub async fn create_recipe(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateRecipePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let recipe = app_state
        .recipe_service
        .create(
            tenant.0,
            NewRecipe {
                dish_name: payload.dish_name,
                menu_item_id: payload.menu_item_id,
                servings: payload.servings,
                ingredients: payload
                    .ingredients
                    .into_iter()
                    .map(IngredientPayload::into_new)
                    .collect(),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

// ---
// Handler: get_all_recipes
// ---
#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    responses((status = 200, description = "Receitas do tenant", body = [crate::models::recipe::Recipe])),
)]
pub async fn get_all_recipes(
    State(app_state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let recipes = app_state.recipe_service.list(tenant.0).await?;
    Ok((StatusCode::OK, Json(recipes)))
}

// ---
// Payload: UpdateRecipe (patch parcial)
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipePayload {
    pub dish_name: Option<String>,
    pub menu_item_id: Option<String>,
    pub servings: Option<i32>,
    pub ingredients: Option<Vec<IngredientPayload>>,
}

// ---
// Handler: update_recipe
// ---
#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Id da receita")),
    request_body = UpdateRecipePayload,
    responses(
        (status = 200, description = "Receita atualizada, custo recalculado", body = crate::models::recipe::Recipe),
        (status = 404, description = "Receita não encontrada"),
        (status = 422, description = "Estoque atual abaixo da quantidade por porção"),
    ),
)]
pub async fn update_recipe(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRecipePayload>,
) -> Result<impl IntoResponse, AppError> {
    let recipe = app_state
        .recipe_service
        .update(
            tenant.0,
            id,
            RecipePatch {
                dish_name: payload.dish_name,
                menu_item_id: payload.menu_item_id,
                servings: payload.servings,
                ingredients: payload.ingredients.map(|ingredients| {
                    ingredients.into_iter().map(IngredientPayload::into_new).collect()
                }),
            },
        )
        .await?;

    Ok((StatusCode::OK, Json(recipe)))
}

// ---
// Handler: delete_recipe
// ---
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Id da receita")),
    responses(
        (status = 204, description = "Receita removida (sem cascata)"),
        (status = 404, description = "Receita não encontrada"),
    ),
)]
pub async fn delete_recipe(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.recipe_service.delete(tenant.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
