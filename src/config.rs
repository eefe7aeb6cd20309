// src/config.rs

use std::env;
use std::sync::Arc;

use crate::{
    common::row_lock::RowLockManager,
    db::{InMemoryRepository, StockRepository},
    services::{MovementService, RecipeService, SaleService, StockService},
};

#[derive(Clone)]
pub struct AppState {
    pub stock_service: StockService,
    pub movement_service: MovementService,
    pub recipe_service: RecipeService,
    pub sale_service: SaleService,
    pub bind_addr: String,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        // --- Monta o gráfico de dependências ---
        // O gateway em memória é o backing store entregue; um banco real
        // entra aqui por trás do mesmo trait, sem tocar nos services.
        let repo: Arc<dyn StockRepository> = Arc::new(InMemoryRepository::new());
        // Um único gerenciador de locks, compartilhado entre o razão do
        // estoque e o simulador de venda.
        let locks = Arc::new(RowLockManager::new());

        let movement_service = MovementService::new(repo.clone());
        let stock_service =
            StockService::new(repo.clone(), movement_service.clone(), locks.clone());
        let recipe_service = RecipeService::new(repo.clone(), stock_service.clone());
        let sale_service = SaleService::new(repo, stock_service.clone(), locks);

        Ok(Self {
            stock_service,
            movement_service,
            recipe_service,
            sale_service,
            bind_addr,
        })
    }
}
