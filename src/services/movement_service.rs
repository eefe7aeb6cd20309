// src/services/movement_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::StockRepository,
    models::stock::{NewMovement, StockMovement},
};

/// Trilha de auditoria. Toda mudança de quantidade passa por aqui e vira
/// um registro imutável; nada além de gravar e listar.
#[derive(Clone)]
pub struct MovementService {
    repo: Arc<dyn StockRepository>,
}

impl MovementService {
    pub fn new(repo: Arc<dyn StockRepository>) -> Self {
        Self { repo }
    }

    /// Atribui id e timestamp e grava. As regras de negócio já foram
    /// validadas pelo chamador; aqui só vale quantidade positiva e um
    /// produto que resolva. O nome e a unidade do produto são copiados
    /// neste momento (snapshot), não no momento da leitura.
    pub async fn record(
        &self,
        tenant_id: Uuid,
        new_movement: NewMovement,
    ) -> Result<StockMovement, AppError> {
        if new_movement.quantity <= Decimal::ZERO {
            return Err(AppError::InvalidInput(
                "A quantidade da movimentação deve ser positiva.".to_string(),
            ));
        }

        let item = self
            .repo
            .get_stock_item(tenant_id, new_movement.product_id)
            .await?
            .ok_or(AppError::StockItemNotFound)?;

        let movement = StockMovement {
            id: Uuid::new_v4(),
            tenant_id,
            product_id: new_movement.product_id,
            product_name: item.name,
            movement_type: new_movement.movement_type,
            quantity: new_movement.quantity,
            unit: item.unit,
            date: Utc::now(),
            reason: new_movement.reason,
            user: new_movement.user,
            cost: new_movement.cost,
        };

        self.repo.create_movement(tenant_id, movement).await
    }

    pub async fn list_all(&self, tenant_id: Uuid) -> Result<Vec<StockMovement>, AppError> {
        self.repo.list_movements(tenant_id, None).await
    }

    pub async fn list_by_product(
        &self,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<StockMovement>, AppError> {
        self.repo.list_movements(tenant_id, Some(product_id)).await
    }
}
