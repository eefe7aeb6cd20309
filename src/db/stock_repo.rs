// src/db/stock_repo.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        recipe::{Recipe, Sale},
        stock::{StockItem, StockMovement},
    },
};

/// Gateway de persistência. O núcleo não guarda estado global próprio:
/// ele opera sobre o que o gateway devolve, chamada a chamada, sempre no
/// escopo de um tenant (restaurante).
///
/// Os services é que atribuem ids e timestamps e derivam o status; o
/// gateway só grava e lê.
#[async_trait]
pub trait StockRepository: Send + Sync {
    // --- Itens de estoque ---
    async fn create_stock_item(&self, tenant_id: Uuid, item: StockItem)
    -> Result<StockItem, AppError>;
    async fn update_stock_item(&self, tenant_id: Uuid, item: StockItem)
    -> Result<StockItem, AppError>;
    async fn delete_stock_item(&self, tenant_id: Uuid, item_id: Uuid) -> Result<(), AppError>;
    async fn get_stock_item(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<StockItem>, AppError>;
    async fn list_stock_items(&self, tenant_id: Uuid) -> Result<Vec<StockItem>, AppError>;

    // --- Movimentações (append-only) ---
    async fn create_movement(
        &self,
        tenant_id: Uuid,
        movement: StockMovement,
    ) -> Result<StockMovement, AppError>;
    /// Mais recentes primeiro. `product_id = None` lista tudo.
    async fn list_movements(
        &self,
        tenant_id: Uuid,
        product_id: Option<Uuid>,
    ) -> Result<Vec<StockMovement>, AppError>;

    // --- Receitas ---
    async fn create_recipe(&self, tenant_id: Uuid, recipe: Recipe) -> Result<Recipe, AppError>;
    async fn update_recipe(&self, tenant_id: Uuid, recipe: Recipe) -> Result<Recipe, AppError>;
    async fn delete_recipe(&self, tenant_id: Uuid, recipe_id: Uuid) -> Result<(), AppError>;
    async fn get_recipe(
        &self,
        tenant_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<Option<Recipe>, AppError>;
    async fn list_recipes(&self, tenant_id: Uuid) -> Result<Vec<Recipe>, AppError>;

    // --- Vendas ---
    async fn create_sale(&self, tenant_id: Uuid, sale: Sale) -> Result<Sale, AppError>;
    async fn list_sales(&self, tenant_id: Uuid) -> Result<Vec<Sale>, AppError>;
}
