// src/services/stock_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, row_lock::RowLockManager, units},
    db::StockRepository,
    models::stock::{MovementType, NewMovement, NewStockItem, StockItem, derive_status},
    services::MovementService,
};

/// O dono da quantidade em mãos. Toda mutação de `current_quantity` passa
/// por aqui, para que o status seja re-derivado junto e o histórico receba
/// a movimentação correspondente.
#[derive(Clone)]
pub struct StockService {
    repo: Arc<dyn StockRepository>,
    movements: MovementService,
    locks: Arc<RowLockManager>,
}

fn require_non_negative(value: Decimal, field: &str) -> Result<(), AppError> {
    if value.is_sign_negative() {
        return Err(AppError::InvalidInput(format!(
            "O campo '{field}' não pode ser negativo."
        )));
    }
    Ok(())
}

fn require_not_blank(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!(
            "O campo '{field}' é obrigatório."
        )));
    }
    Ok(())
}

impl StockService {
    pub fn new(
        repo: Arc<dyn StockRepository>,
        movements: MovementService,
        locks: Arc<RowLockManager>,
    ) -> Self {
        Self { repo, movements, locks }
    }

    // --- REGISTRO ---
    /// Cria o item com o status já derivado e grava a movimentação de
    /// "Estoque inicial" quando há quantidade inicial (movimentações são
    /// estritamente positivas, então quantidade zero não gera registro).
    pub async fn register(
        &self,
        tenant_id: Uuid,
        new_item: NewStockItem,
    ) -> Result<StockItem, AppError> {
        require_not_blank(&new_item.name, "name")?;
        require_not_blank(&new_item.category, "category")?;
        require_not_blank(&new_item.unit, "unit")?;
        require_non_negative(new_item.current_quantity, "currentQuantity")?;
        require_non_negative(new_item.min_quantity, "minQuantity")?;
        require_non_negative(new_item.cost, "cost")?;
        if let Some(max_quantity) = new_item.max_quantity {
            require_non_negative(max_quantity, "maxQuantity")?;
        }
        if let Some(reorder_point) = new_item.reorder_point {
            require_non_negative(reorder_point, "reorderPoint")?;
        }
        if let Some(reorder_quantity) = new_item.reorder_quantity {
            require_non_negative(reorder_quantity, "reorderQuantity")?;
        }

        let now = Utc::now();
        let item = StockItem {
            id: Uuid::new_v4(),
            tenant_id,
            name: new_item.name,
            category: new_item.category,
            unit: new_item.unit,
            current_quantity: new_item.current_quantity,
            min_quantity: new_item.min_quantity,
            max_quantity: new_item.max_quantity,
            cost: new_item.cost,
            status: derive_status(new_item.current_quantity, new_item.min_quantity),
            auto_reorder: new_item.auto_reorder,
            reorder_point: new_item.reorder_point,
            reorder_quantity: new_item.reorder_quantity,
            last_entry: (new_item.current_quantity > Decimal::ZERO).then_some(now),
            created_at: now,
            updated_at: now,
        };

        let item = self.repo.create_stock_item(tenant_id, item).await?;

        if item.current_quantity > Decimal::ZERO {
            self.movements
                .record(
                    tenant_id,
                    NewMovement {
                        product_id: item.id,
                        movement_type: MovementType::Entry,
                        quantity: item.current_quantity,
                        reason: "Estoque inicial".to_string(),
                        user: "system".to_string(),
                        cost: Some(item.current_quantity * item.cost),
                    },
                )
                .await?;
        }

        tracing::info!("Item de estoque registrado: {} ({})", item.name, item.id);
        Ok(item)
    }

    // --- AJUSTE DE QUANTIDADE ---
    /// Entrada (delta > 0), saída (delta < 0) ou ajuste explícito.
    /// O delta pode vir numa unidade de exibição (g, ml); é convertido
    /// para a unidade canônica do item antes de aplicar.
    pub async fn adjust_quantity(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
        delta: Decimal,
        as_adjustment: bool,
        reason: &str,
        actor: &str,
        display_unit: Option<&str>,
    ) -> Result<StockItem, AppError> {
        let _row = self.locks.acquire(tenant_id, item_id).await;
        self.apply_adjustment(tenant_id, item_id, delta, as_adjustment, reason, actor, display_unit)
            .await
    }

    /// Núcleo do ajuste, SEM travar a linha: o chamador já precisa estar
    /// segurando o lock do item (o simulador de venda trava o conjunto
    /// inteiro de ingredientes antes de chegar aqui).
    pub(crate) async fn apply_adjustment(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
        delta: Decimal,
        as_adjustment: bool,
        reason: &str,
        actor: &str,
        display_unit: Option<&str>,
    ) -> Result<StockItem, AppError> {
        let mut item = self
            .repo
            .get_stock_item(tenant_id, item_id)
            .await?
            .ok_or(AppError::StockItemNotFound)?;

        let delta = match display_unit {
            Some(unit) => units::to_canonical(delta, &item.unit, unit),
            None => delta,
        };

        if delta.is_zero() {
            return Err(AppError::InvalidInput(
                "O delta do ajuste não pode ser zero.".to_string(),
            ));
        }

        let new_quantity = item.current_quantity + delta;
        if new_quantity.is_sign_negative() {
            return Err(AppError::InvalidInput(format!(
                "Estoque de '{}' não pode ficar negativo (atual: {}, delta: {}).",
                item.name, item.current_quantity, delta
            )));
        }

        let now = Utc::now();
        item.current_quantity = new_quantity;
        item.status = derive_status(item.current_quantity, item.min_quantity);
        if delta > Decimal::ZERO {
            item.last_entry = Some(now);
        }
        item.updated_at = now;

        let item = self.repo.update_stock_item(tenant_id, item).await?;

        let movement_type = if as_adjustment {
            MovementType::Adjust
        } else if delta > Decimal::ZERO {
            MovementType::Entry
        } else {
            MovementType::Exit
        };

        self.movements
            .record(
                tenant_id,
                NewMovement {
                    product_id: item.id,
                    movement_type,
                    quantity: delta.abs(),
                    reason: reason.to_string(),
                    user: actor.to_string(),
                    cost: Some(delta.abs() * item.cost),
                },
            )
            .await?;

        tracing::info!(
            "Ajuste aplicado em '{}': delta {}, novo saldo {} ({:?})",
            item.name,
            delta,
            item.current_quantity,
            item.status
        );
        Ok(item)
    }

    // --- REMOÇÃO ---
    /// Remoção incondicional: receitas que referenciam o item NÃO são
    /// verificadas (comportamento observado do produto; a simulação de
    /// venda passa a listar o ingrediente como em falta).
    pub async fn remove(&self, tenant_id: Uuid, item_id: Uuid) -> Result<(), AppError> {
        let _row = self.locks.acquire(tenant_id, item_id).await;
        self.repo.delete_stock_item(tenant_id, item_id).await?;
        tracing::info!("Item de estoque removido: {}", item_id);
        Ok(())
    }

    // --- LEITURAS ---

    pub async fn get_item(&self, tenant_id: Uuid, item_id: Uuid) -> Result<StockItem, AppError> {
        self.find_item(tenant_id, item_id)
            .await?
            .ok_or(AppError::StockItemNotFound)
    }

    /// Versão sem erro de não-encontrado, para quem trata a ausência
    /// como regra de negócio (registro de receitas, simulação de venda).
    pub async fn find_item(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<StockItem>, AppError> {
        self.repo.get_stock_item(tenant_id, item_id).await
    }

    pub async fn list_items(&self, tenant_id: Uuid) -> Result<Vec<StockItem>, AppError> {
        self.repo.list_stock_items(tenant_id).await
    }
}
