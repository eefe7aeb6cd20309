// src/db/memory_repo.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::StockRepository,
    models::{
        recipe::{Recipe, Sale},
        stock::{StockItem, StockMovement},
    },
};

// Estado de um tenant. Movimentações e vendas são listas append-only;
// a leitura devolve na ordem inversa (mais recente primeiro).
#[derive(Default)]
struct TenantState {
    items: HashMap<Uuid, StockItem>,
    movements: Vec<StockMovement>,
    recipes: HashMap<Uuid, Recipe>,
    sales: Vec<Sale>,
}

/// Implementação em memória do gateway. É o backing store entregue com o
/// serviço e também o dublê dos testes; um banco real entra por trás do
/// mesmo trait.
#[derive(Default)]
pub struct InMemoryRepository {
    state: RwLock<HashMap<Uuid, TenantState>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StockRepository for InMemoryRepository {
    // --- Itens de estoque ---

    async fn create_stock_item(
        &self,
        tenant_id: Uuid,
        item: StockItem,
    ) -> Result<StockItem, AppError> {
        let mut state = self.state.write().await;
        let tenant = state.entry(tenant_id).or_default();
        tenant.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_stock_item(
        &self,
        tenant_id: Uuid,
        item: StockItem,
    ) -> Result<StockItem, AppError> {
        let mut state = self.state.write().await;
        let tenant = state.entry(tenant_id).or_default();
        if !tenant.items.contains_key(&item.id) {
            return Err(AppError::StockItemNotFound);
        }
        tenant.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn delete_stock_item(&self, tenant_id: Uuid, item_id: Uuid) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let tenant = state.entry(tenant_id).or_default();
        tenant
            .items
            .remove(&item_id)
            .map(|_| ())
            .ok_or(AppError::StockItemNotFound)
    }

    async fn get_stock_item(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<StockItem>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .get(&tenant_id)
            .and_then(|tenant| tenant.items.get(&item_id))
            .cloned())
    }

    async fn list_stock_items(&self, tenant_id: Uuid) -> Result<Vec<StockItem>, AppError> {
        let state = self.state.read().await;
        let mut items: Vec<StockItem> = state
            .get(&tenant_id)
            .map(|tenant| tenant.items.values().cloned().collect())
            .unwrap_or_default();
        // Mesma ordenação das listagens do banco: por nome.
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    // --- Movimentações ---

    async fn create_movement(
        &self,
        tenant_id: Uuid,
        movement: StockMovement,
    ) -> Result<StockMovement, AppError> {
        let mut state = self.state.write().await;
        let tenant = state.entry(tenant_id).or_default();
        tenant.movements.push(movement.clone());
        Ok(movement)
    }

    async fn list_movements(
        &self,
        tenant_id: Uuid,
        product_id: Option<Uuid>,
    ) -> Result<Vec<StockMovement>, AppError> {
        let state = self.state.read().await;
        let movements = state
            .get(&tenant_id)
            .map(|tenant| {
                tenant
                    .movements
                    .iter()
                    .rev()
                    .filter(|m| product_id.is_none_or(|id| m.product_id == id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(movements)
    }

    // --- Receitas ---

    async fn create_recipe(&self, tenant_id: Uuid, recipe: Recipe) -> Result<Recipe, AppError> {
        let mut state = self.state.write().await;
        let tenant = state.entry(tenant_id).or_default();
        tenant.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    async fn update_recipe(&self, tenant_id: Uuid, recipe: Recipe) -> Result<Recipe, AppError> {
        let mut state = self.state.write().await;
        let tenant = state.entry(tenant_id).or_default();
        if !tenant.recipes.contains_key(&recipe.id) {
            return Err(AppError::RecipeNotFound);
        }
        tenant.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    async fn delete_recipe(&self, tenant_id: Uuid, recipe_id: Uuid) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let tenant = state.entry(tenant_id).or_default();
        tenant
            .recipes
            .remove(&recipe_id)
            .map(|_| ())
            .ok_or(AppError::RecipeNotFound)
    }

    async fn get_recipe(
        &self,
        tenant_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<Option<Recipe>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .get(&tenant_id)
            .and_then(|tenant| tenant.recipes.get(&recipe_id))
            .cloned())
    }

    async fn list_recipes(&self, tenant_id: Uuid) -> Result<Vec<Recipe>, AppError> {
        let state = self.state.read().await;
        let mut recipes: Vec<Recipe> = state
            .get(&tenant_id)
            .map(|tenant| tenant.recipes.values().cloned().collect())
            .unwrap_or_default();
        recipes.sort_by(|a, b| a.dish_name.cmp(&b.dish_name));
        Ok(recipes)
    }

    // --- Vendas ---

    async fn create_sale(&self, tenant_id: Uuid, sale: Sale) -> Result<Sale, AppError> {
        let mut state = self.state.write().await;
        let tenant = state.entry(tenant_id).or_default();
        tenant.sales.push(sale.clone());
        Ok(sale)
    }

    async fn list_sales(&self, tenant_id: Uuid) -> Result<Vec<Sale>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .get(&tenant_id)
            .map(|tenant| tenant.sales.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stock::{MovementType, StockStatus, derive_status};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn item(tenant_id: Uuid, name: &str) -> StockItem {
        let quantity = Decimal::from(10);
        let min = Decimal::from(2);
        StockItem {
            id: Uuid::new_v4(),
            tenant_id,
            name: name.to_string(),
            category: "Carnes".to_string(),
            unit: "Kg".to_string(),
            current_quantity: quantity,
            min_quantity: min,
            max_quantity: None,
            cost: Decimal::ZERO,
            status: derive_status(quantity, min),
            auto_reorder: false,
            reorder_point: None,
            reorder_quantity: None,
            last_entry: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn tenants_nao_enxergam_linhas_um_do_outro() {
        let repo = InMemoryRepository::new();
        let tenant_a = Uuid::new_v4();
        let tenant_b = Uuid::new_v4();

        let created = repo.create_stock_item(tenant_a, item(tenant_a, "Sal")).await.unwrap();

        assert_eq!(repo.list_stock_items(tenant_a).await.unwrap().len(), 1);
        assert!(repo.list_stock_items(tenant_b).await.unwrap().is_empty());
        assert!(repo.get_stock_item(tenant_b, created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn listagem_de_itens_ordena_por_nome() {
        let repo = InMemoryRepository::new();
        let tenant = Uuid::new_v4();
        repo.create_stock_item(tenant, item(tenant, "Tomate")).await.unwrap();
        repo.create_stock_item(tenant, item(tenant, "Alho")).await.unwrap();

        let names: Vec<String> = repo
            .list_stock_items(tenant)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Alho", "Tomate"]);
    }

    #[tokio::test]
    async fn movimentacoes_saem_da_mais_recente_para_a_mais_antiga() {
        let repo = InMemoryRepository::new();
        let tenant = Uuid::new_v4();
        let product_id = Uuid::new_v4();

        for reason in ["primeira", "segunda"] {
            let movement = StockMovement {
                id: Uuid::new_v4(),
                tenant_id: tenant,
                product_id,
                product_name: "Sal".to_string(),
                movement_type: MovementType::Entry,
                quantity: Decimal::ONE,
                unit: "Kg".to_string(),
                date: Utc::now(),
                reason: reason.to_string(),
                user: "system".to_string(),
                cost: None,
            };
            repo.create_movement(tenant, movement).await.unwrap();
        }

        let listed = repo.list_movements(tenant, None).await.unwrap();
        assert_eq!(listed[0].reason, "segunda");
        assert_eq!(listed[1].reason, "primeira");
    }

    #[tokio::test]
    async fn atualizar_item_inexistente_falha() {
        let repo = InMemoryRepository::new();
        let tenant = Uuid::new_v4();
        let ghost = item(tenant, "Fantasma");
        let result = repo.update_stock_item(tenant, ghost).await;
        assert!(matches!(result, Err(AppError::StockItemNotFound)));
    }

    #[tokio::test]
    async fn status_gravado_confere_com_a_derivacao() {
        let repo = InMemoryRepository::new();
        let tenant = Uuid::new_v4();
        let created = repo.create_stock_item(tenant, item(tenant, "Sal")).await.unwrap();
        assert_eq!(created.status, StockStatus::Ok);
    }
}
