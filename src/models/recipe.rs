// src/models/recipe.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Ingrediente de Receita ---
// O nome é um snapshot do item no momento do salvamento (mesma regra do
// histórico de movimentações).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    pub product_id: Uuid,
    pub product_name: String,
    /// Quantidade por UMA porção, na unidade canônica do item.
    pub quantity: Decimal,
    pub unit: String,
}

// --- 2. Receita (Ficha Técnica) ---
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub dish_name: String,
    /// Referência opcional ao item do cardápio (sistema externo).
    pub menu_item_id: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
    pub servings: i32,
    /// Custo = Σ(quantidade do ingrediente × custo unitário do item),
    /// congelado no último salvamento. NÃO acompanha mudanças de custo
    /// posteriores do estoque.
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Entrada do registro de receitas. A quantidade pode vir numa unidade de
// exibição (g, ml); o service converte para a canônica do item.
#[derive(Debug, Clone)]
pub struct NewRecipeIngredient {
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub unit: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub dish_name: String,
    pub menu_item_id: Option<String>,
    pub servings: i32,
    pub ingredients: Vec<NewRecipeIngredient>,
}

// Patch de atualização: campos ausentes mantêm o valor atual. O custo é
// SEMPRE recalculado a partir dos custos correntes dos itens.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub dish_name: Option<String>,
    pub menu_item_id: Option<String>,
    pub servings: Option<i32>,
    pub ingredients: Option<Vec<NewRecipeIngredient>>,
}

// --- 3. Venda (registro de simulação) ---
// Criada apenas como efeito de uma simulação de venda bem-sucedida.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub recipe_id: Uuid,
    pub dish_name: String,
    pub quantity: i32,
    pub date: DateTime<Utc>,
    /// total = custo da receita × quantidade.
    pub total: Decimal,
}
