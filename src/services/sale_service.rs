// src/services/sale_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{
        error::{AppError, StockShortage},
        row_lock::RowLockManager,
    },
    db::StockRepository,
    models::recipe::Sale,
    services::StockService,
};

/// Simulador de venda: resolve a receita, valida TODOS os ingredientes e
/// só então aplica as baixas — tudo ou nada.
///
/// A validação e a aplicação acontecem com os locks de TODAS as linhas de
/// ingredientes em mãos (adquiridos em ordem de id). Sem isso, duas vendas
/// concorrentes poderiam ambas passar na checagem antes de qualquer baixa
/// e deixar o saldo negativo.
#[derive(Clone)]
pub struct SaleService {
    repo: Arc<dyn StockRepository>,
    stock: StockService,
    locks: Arc<RowLockManager>,
}

impl SaleService {
    pub fn new(
        repo: Arc<dyn StockRepository>,
        stock: StockService,
        locks: Arc<RowLockManager>,
    ) -> Self {
        Self { repo, stock, locks }
    }

    pub async fn simulate(
        &self,
        tenant_id: Uuid,
        recipe_id: Uuid,
        quantity: i32,
    ) -> Result<Sale, AppError> {
        // 0. Validação de entrada.
        if quantity <= 0 {
            return Err(AppError::InvalidInput(
                "A quantidade da venda deve ser positiva.".to_string(),
            ));
        }

        // 1. Resolve a receita.
        let recipe = self
            .repo
            .get_recipe(tenant_id, recipe_id)
            .await?
            .ok_or(AppError::RecipeNotFound)?;

        // 2. Trava as linhas de todos os ingredientes. Daqui até o fim da
        // função nenhuma outra venda/ajuste toca nesses itens.
        let ingredient_ids: Vec<Uuid> =
            recipe.ingredients.iter().map(|i| i.product_id).collect();
        let _rows = self.locks.acquire_many(tenant_id, ingredient_ids).await;

        // 3. Checagem: acumula TODAS as faltas, nunca só a primeira.
        let sale_quantity = Decimal::from(quantity);
        let mut shortages = Vec::new();
        for ingredient in &recipe.ingredients {
            let required = ingredient.quantity * sale_quantity;
            let available = self
                .stock
                .find_item(tenant_id, ingredient.product_id)
                .await?
                .map(|item| item.current_quantity)
                // Item removido do estoque: conta como falta total.
                .unwrap_or(Decimal::ZERO);

            if available < required {
                shortages.push(StockShortage {
                    product_id: ingredient.product_id,
                    product_name: ingredient.product_name.clone(),
                    required,
                    available,
                });
            }
        }
        if !shortages.is_empty() {
            tracing::warn!(
                "Venda de '{}' ({}x) rejeitada: {} ingrediente(s) em falta",
                recipe.dish_name,
                quantity,
                shortages.len()
            );
            return Err(AppError::InsufficientStock(shortages));
        }

        // 4. Aplicação: baixa cada ingrediente pelo razão do estoque, que
        // re-deriva o status e grava uma movimentação de saída por item.
        let reason = format!("Venda - {} ({}x)", recipe.dish_name, quantity);
        for ingredient in &recipe.ingredients {
            let required = ingredient.quantity * sale_quantity;
            self.stock
                .apply_adjustment(
                    tenant_id,
                    ingredient.product_id,
                    -required,
                    false,
                    &reason,
                    "system",
                    None,
                )
                .await?;
        }

        // 5. Registra a venda.
        let sale = Sale {
            id: Uuid::new_v4(),
            tenant_id,
            recipe_id: recipe.id,
            dish_name: recipe.dish_name.clone(),
            quantity,
            date: Utc::now(),
            total: recipe.cost * sale_quantity,
        };
        let sale = self.repo.create_sale(tenant_id, sale).await?;

        tracing::info!(
            "Venda simulada: {} ({}x), total {}",
            recipe.dish_name,
            quantity,
            sale.total
        );
        Ok(sale)
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<Sale>, AppError> {
        self.repo.list_sales(tenant_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::row_lock::RowLockManager;
    use crate::db::InMemoryRepository;
    use crate::models::recipe::{NewRecipe, NewRecipeIngredient};
    use crate::models::stock::{MovementType, NewStockItem, StockStatus};
    use crate::services::{MovementService, RecipeService};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    struct Ctx {
        stock: StockService,
        movements: MovementService,
        recipes: RecipeService,
        sales: SaleService,
        tenant: Uuid,
    }

    fn setup() -> Ctx {
        let repo: Arc<dyn StockRepository> = Arc::new(InMemoryRepository::new());
        let locks = Arc::new(RowLockManager::new());
        let movements = MovementService::new(repo.clone());
        let stock = StockService::new(repo.clone(), movements.clone(), locks.clone());
        let recipes = RecipeService::new(repo.clone(), stock.clone());
        let sales = SaleService::new(repo, stock.clone(), locks);
        Ctx { stock, movements, recipes, sales, tenant: Uuid::new_v4() }
    }

    async fn register_item(ctx: &Ctx, name: &str, quantity: &str, min: &str, cost: &str) -> Uuid {
        ctx.stock
            .register(
                ctx.tenant,
                NewStockItem {
                    name: name.to_string(),
                    category: "Cozinha".to_string(),
                    unit: "Kg".to_string(),
                    current_quantity: dec(quantity),
                    min_quantity: dec(min),
                    max_quantity: None,
                    cost: dec(cost),
                    auto_reorder: false,
                    reorder_point: None,
                    reorder_quantity: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn ingredient(product_id: Uuid, quantity: &str) -> NewRecipeIngredient {
        NewRecipeIngredient { product_id, quantity: dec(quantity), unit: None }
    }

    // Cenário B do produto: Carne 0.2Kg + Batata 0.15Kg por porção;
    // estoque Carne=8, Batata=15. Vender 40 consome a carne exatamente.
    async fn scenario_b(ctx: &Ctx) -> (Uuid, Uuid, Uuid) {
        let carne = register_item(ctx, "Carne de Vaca", "8", "5", "40").await;
        let batata = register_item(ctx, "Batata", "15", "3", "5").await;
        let recipe = ctx
            .recipes
            .create(
                ctx.tenant,
                NewRecipe {
                    dish_name: "Bife com Batata".to_string(),
                    menu_item_id: None,
                    servings: 1,
                    ingredients: vec![ingredient(carne, "0.2"), ingredient(batata, "0.15")],
                },
            )
            .await
            .unwrap();
        (carne, batata, recipe.id)
    }

    #[tokio::test]
    async fn venda_exata_zera_o_estoque_e_deixa_critico() {
        let ctx = setup();
        let (carne, batata, recipe_id) = scenario_b(&ctx).await;

        let sale = ctx.sales.simulate(ctx.tenant, recipe_id, 40).await.unwrap();

        let carne_item = ctx.stock.get_item(ctx.tenant, carne).await.unwrap();
        assert_eq!(carne_item.current_quantity, Decimal::ZERO);
        assert_eq!(carne_item.status, StockStatus::Critical);

        let batata_item = ctx.stock.get_item(ctx.tenant, batata).await.unwrap();
        assert_eq!(batata_item.current_quantity, dec("9")); // 15 - 0.15×40

        // total = custo da receita (0.2×40 + 0.15×5 = 8.75) × 40
        assert_eq!(sale.total, dec("350"));
        assert_eq!(sale.quantity, 40);
    }

    // Cenário C: 41 porções pedem 8.2Kg de carne > 8 disponíveis.
    #[tokio::test]
    async fn falta_em_um_ingrediente_rejeita_tudo() {
        let ctx = setup();
        let (carne, batata, recipe_id) = scenario_b(&ctx).await;

        let result = ctx.sales.simulate(ctx.tenant, recipe_id, 41).await;
        match result {
            Err(AppError::InsufficientStock(shortages)) => {
                assert_eq!(shortages.len(), 1);
                assert_eq!(shortages[0].product_name, "Carne de Vaca");
                assert_eq!(shortages[0].required, dec("8.2"));
                assert_eq!(shortages[0].available, dec("8"));
            }
            other => panic!("esperava InsufficientStock, veio {other:?}"),
        }

        // Nada mudou: nem saldo, nem movimentações, nem venda.
        assert_eq!(
            ctx.stock.get_item(ctx.tenant, carne).await.unwrap().current_quantity,
            dec("8")
        );
        assert_eq!(
            ctx.stock.get_item(ctx.tenant, batata).await.unwrap().current_quantity,
            dec("15")
        );
        let history = ctx.movements.list_all(ctx.tenant).await.unwrap();
        assert_eq!(history.len(), 2); // só os dois "Estoque inicial"
        assert!(ctx.sales.list(ctx.tenant).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lista_todas_as_faltas_de_uma_vez() {
        let ctx = setup();
        let (_, _, recipe_id) = scenario_b(&ctx).await;

        let result = ctx.sales.simulate(ctx.tenant, recipe_id, 200).await;
        match result {
            Err(AppError::InsufficientStock(shortages)) => {
                let names: Vec<&str> =
                    shortages.iter().map(|s| s.product_name.as_str()).collect();
                assert_eq!(names, vec!["Carne de Vaca", "Batata"]);
            }
            other => panic!("esperava InsufficientStock, veio {other:?}"),
        }
    }

    #[tokio::test]
    async fn sucesso_gera_uma_movimentacao_por_ingrediente_e_uma_venda() {
        let ctx = setup();
        let (carne, _, recipe_id) = scenario_b(&ctx).await;

        ctx.sales.simulate(ctx.tenant, recipe_id, 10).await.unwrap();

        let exits: Vec<_> = ctx
            .movements
            .list_all(ctx.tenant)
            .await
            .unwrap()
            .into_iter()
            .filter(|m| m.movement_type == MovementType::Exit)
            .collect();
        assert_eq!(exits.len(), 2);
        assert!(exits.iter().all(|m| m.user == "system"));
        assert!(exits.iter().all(|m| m.reason == "Venda - Bife com Batata (10x)"));

        let carne_exit = exits.iter().find(|m| m.product_id == carne).unwrap();
        assert_eq!(carne_exit.quantity, dec("2")); // 0.2 × 10

        assert_eq!(ctx.sales.list(ctx.tenant).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn receita_inexistente_falha() {
        let ctx = setup();
        let result = ctx.sales.simulate(ctx.tenant, Uuid::new_v4(), 1).await;
        assert!(matches!(result, Err(AppError::RecipeNotFound)));
    }

    #[tokio::test]
    async fn quantidade_nao_positiva_falha() {
        let ctx = setup();
        let (_, _, recipe_id) = scenario_b(&ctx).await;
        let result = ctx.sales.simulate(ctx.tenant, recipe_id, 0).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn ingrediente_removido_conta_como_falta_total() {
        let ctx = setup();
        let (carne, _, recipe_id) = scenario_b(&ctx).await;
        ctx.stock.remove(ctx.tenant, carne).await.unwrap();

        let result = ctx.sales.simulate(ctx.tenant, recipe_id, 1).await;
        match result {
            Err(AppError::InsufficientStock(shortages)) => {
                assert_eq!(shortages[0].product_name, "Carne de Vaca");
                assert_eq!(shortages[0].available, Decimal::ZERO);
            }
            other => panic!("esperava InsufficientStock, veio {other:?}"),
        }
    }

    // A exigência de concorrência: duas vendas sobre o mesmo ingrediente
    // nunca passam AMBAS na checagem. Com estoque para uma venda só, uma
    // comete e a outra recebe falta — o saldo jamais fica negativo.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn vendas_concorrentes_nao_estouram_o_estoque() {
        let ctx = setup();
        let carne = register_item(&ctx, "Carne de Vaca", "1", "0.2", "40").await;
        let recipe = ctx
            .recipes
            .create(
                ctx.tenant,
                NewRecipe {
                    dish_name: "Bife".to_string(),
                    menu_item_id: None,
                    servings: 1,
                    ingredients: vec![ingredient(carne, "1")],
                },
            )
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let sales = ctx.sales.clone();
            let tenant = ctx.tenant;
            let recipe_id = recipe.id;
            handles.push(tokio::spawn(async move {
                sales.simulate(tenant, recipe_id, 1).await
            }));
        }

        let mut committed = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => committed += 1,
                Err(AppError::InsufficientStock(_)) => rejected += 1,
                Err(other) => panic!("erro inesperado: {other:?}"),
            }
        }

        assert_eq!(committed, 1);
        assert_eq!(rejected, 7);

        let item = ctx.stock.get_item(ctx.tenant, carne).await.unwrap();
        assert_eq!(item.current_quantity, Decimal::ZERO);
        assert_eq!(ctx.sales.list(ctx.tenant).await.unwrap().len(), 1);
    }
}
