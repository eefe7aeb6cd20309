// src/services/recipe_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{
        error::{AppError, StockShortage},
        units,
    },
    db::StockRepository,
    models::recipe::{NewRecipe, NewRecipeIngredient, Recipe, RecipeIngredient, RecipePatch},
    services::StockService,
};

/// Fichas técnicas: prato → lista ordenada de (ingrediente, quantidade por
/// porção). O custo gravado é um snapshot do momento do salvamento; mudar
/// o custo de um item do estoque depois NÃO reescreve receitas existentes.
#[derive(Clone)]
pub struct RecipeService {
    repo: Arc<dyn StockRepository>,
    stock: StockService,
}

impl RecipeService {
    pub fn new(repo: Arc<dyn StockRepository>, stock: StockService) -> Self {
        Self { repo, stock }
    }

    // Resolve cada ingrediente no estoque, converte a quantidade para a
    // unidade canônica do item e soma o custo. A checagem de
    // disponibilidade aqui é de SANIDADE de cadastro (quantidade por
    // porção vs. saldo atual), não uma reserva de venda.
    async fn resolve_ingredients(
        &self,
        tenant_id: Uuid,
        ingredients: &[NewRecipeIngredient],
    ) -> Result<(Vec<RecipeIngredient>, Decimal), AppError> {
        if ingredients.is_empty() {
            return Err(AppError::InvalidInput(
                "A receita precisa de pelo menos um ingrediente.".to_string(),
            ));
        }

        let mut resolved = Vec::with_capacity(ingredients.len());
        let mut cost = Decimal::ZERO;
        let mut shortages = Vec::new();

        for ingredient in ingredients {
            if ingredient.quantity <= Decimal::ZERO {
                return Err(AppError::InvalidInput(
                    "A quantidade de cada ingrediente deve ser positiva.".to_string(),
                ));
            }

            let item = self
                .stock
                .find_item(tenant_id, ingredient.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::InvalidInput(format!(
                        "Ingrediente não encontrado no estoque: {}.",
                        ingredient.product_id
                    ))
                })?;

            let quantity = match &ingredient.unit {
                Some(unit) => units::to_canonical(ingredient.quantity, &item.unit, unit),
                None => ingredient.quantity,
            };

            if item.current_quantity < quantity {
                shortages.push(StockShortage {
                    product_id: item.id,
                    product_name: item.name.clone(),
                    required: quantity,
                    available: item.current_quantity,
                });
            }

            cost += quantity * item.cost;
            resolved.push(RecipeIngredient {
                product_id: item.id,
                product_name: item.name,
                quantity,
                unit: item.unit,
            });
        }

        if !shortages.is_empty() {
            return Err(AppError::InsufficientStock(shortages));
        }

        Ok((resolved, cost))
    }

    pub async fn create(&self, tenant_id: Uuid, new_recipe: NewRecipe) -> Result<Recipe, AppError> {
        if new_recipe.dish_name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "O nome do prato é obrigatório.".to_string(),
            ));
        }
        if new_recipe.servings <= 0 {
            return Err(AppError::InvalidInput(
                "O número de porções deve ser positivo.".to_string(),
            ));
        }

        let (ingredients, cost) =
            self.resolve_ingredients(tenant_id, &new_recipe.ingredients).await?;

        let now = Utc::now();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            tenant_id,
            dish_name: new_recipe.dish_name,
            menu_item_id: new_recipe.menu_item_id,
            ingredients,
            servings: new_recipe.servings,
            cost,
            created_at: now,
            updated_at: now,
        };

        let recipe = self.repo.create_recipe(tenant_id, recipe).await?;
        tracing::info!("Receita criada: {} ({})", recipe.dish_name, recipe.id);
        Ok(recipe)
    }

    /// Mesmas validações do create; o custo é recalculado a partir dos
    /// custos CORRENTES dos ingredientes, mesmo quando a lista não muda.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        recipe_id: Uuid,
        patch: RecipePatch,
    ) -> Result<Recipe, AppError> {
        let mut recipe = self
            .repo
            .get_recipe(tenant_id, recipe_id)
            .await?
            .ok_or(AppError::RecipeNotFound)?;

        if let Some(dish_name) = patch.dish_name {
            if dish_name.trim().is_empty() {
                return Err(AppError::InvalidInput(
                    "O nome do prato é obrigatório.".to_string(),
                ));
            }
            recipe.dish_name = dish_name;
        }
        if let Some(menu_item_id) = patch.menu_item_id {
            recipe.menu_item_id = Some(menu_item_id);
        }
        if let Some(servings) = patch.servings {
            if servings <= 0 {
                return Err(AppError::InvalidInput(
                    "O número de porções deve ser positivo.".to_string(),
                ));
            }
            recipe.servings = servings;
        }

        // Lista efetiva: a nova, ou a atual reconvertida (as quantidades
        // gravadas já estão na unidade canônica).
        let effective: Vec<NewRecipeIngredient> = match patch.ingredients {
            Some(ingredients) => ingredients,
            None => recipe
                .ingredients
                .iter()
                .map(|i| NewRecipeIngredient {
                    product_id: i.product_id,
                    quantity: i.quantity,
                    unit: None,
                })
                .collect(),
        };

        let (ingredients, cost) = self.resolve_ingredients(tenant_id, &effective).await?;
        recipe.ingredients = ingredients;
        recipe.cost = cost;
        recipe.updated_at = Utc::now();

        self.repo.update_recipe(tenant_id, recipe).await
    }

    /// Sem cascata: vendas já registradas mantêm o recipe_id órfão.
    pub async fn delete(&self, tenant_id: Uuid, recipe_id: Uuid) -> Result<(), AppError> {
        self.repo.delete_recipe(tenant_id, recipe_id).await?;
        tracing::info!("Receita removida: {}", recipe_id);
        Ok(())
    }

    pub async fn get(&self, tenant_id: Uuid, recipe_id: Uuid) -> Result<Recipe, AppError> {
        self.repo
            .get_recipe(tenant_id, recipe_id)
            .await?
            .ok_or(AppError::RecipeNotFound)
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<Recipe>, AppError> {
        self.repo.list_recipes(tenant_id).await
    }
}
