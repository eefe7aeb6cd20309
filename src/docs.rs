// src/docs.rs

use utoipa::OpenApi;

use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- INVENTORY ---
        handlers::stock::create_item,
        handlers::stock::get_all_items,
        handlers::stock::get_item,
        handlers::stock::delete_item,
        handlers::stock::adjust_stock,
        handlers::stock::get_movements,

        // --- RECIPES ---
        handlers::recipes::create_recipe,
        handlers::recipes::get_all_recipes,
        handlers::recipes::update_recipe,
        handlers::recipes::delete_recipe,

        // --- SALES ---
        handlers::sales::simulate_sale,
        handlers::sales::get_all_sales,
    ),
    components(schemas(
        models::stock::StockItem,
        models::stock::StockStatus,
        models::stock::StockMovement,
        models::stock::MovementType,
        models::recipe::Recipe,
        models::recipe::RecipeIngredient,
        models::recipe::Sale,
        common::error::StockShortage,
        handlers::stock::CreateItemPayload,
        handlers::stock::AdjustStockPayload,
        handlers::recipes::CreateRecipePayload,
        handlers::recipes::UpdateRecipePayload,
        handlers::recipes::IngredientPayload,
        handlers::sales::SimulateSalePayload,
    )),
    tags(
        (name = "inventory", description = "Itens de estoque e histórico de movimentações"),
        (name = "recipes", description = "Fichas técnicas (prato → ingredientes)"),
        (name = "sales", description = "Simulação de vendas com baixa de estoque"),
    ),
    info(
        title = "Estoque Backend",
        description = "Núcleo de consistência estoque/receitas do back-office. \
            Todas as rotas exigem o cabeçalho X-Tenant-ID.",
    ),
)]
pub struct ApiDoc;
