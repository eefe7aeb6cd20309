// src/models/stock.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Status do Estoque ---
// Classificação derivada da quantidade em relação ao mínimo.
// Nunca é aceita do chamador: é sempre recalculada via `derive_status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Ok,       // Vira "OK"
    Low,      // Vira "LOW"
    Critical, // Vira "CRITICAL"
}

/// Deriva o status a partir de (quantidade atual, quantidade mínima).
/// Função pura: é reavaliada em TODA mutação de quantidade, para que o
/// status armazenado nunca divirja da quantidade.
pub fn derive_status(current_quantity: Decimal, min_quantity: Decimal) -> StockStatus {
    // Crítico: metade do mínimo ou menos.
    let critical_floor = min_quantity * Decimal::new(5, 1); // 0.5
    if current_quantity <= critical_floor {
        StockStatus::Critical
    } else if current_quantity <= min_quantity {
        StockStatus::Low
    } else {
        StockStatus::Ok
    }
}

// --- 2. Item de Estoque ---
// Quantidade e status são de propriedade exclusiva do StockService;
// toda mutação passa por lá.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub category: String,
    /// Unidade canônica de armazenamento (ex: "Kg", "L", "Unid").
    pub unit: String,
    pub current_quantity: Decimal,
    pub min_quantity: Decimal,
    pub max_quantity: Option<Decimal>,
    /// Custo unitário. Padrão 0 quando não informado.
    pub cost: Decimal,
    pub status: StockStatus,
    // Reposição automática: informativo, não aplicado pelo núcleo.
    pub auto_reorder: bool,
    pub reorder_point: Option<Decimal>,
    pub reorder_quantity: Option<Decimal>,
    /// Data da última ENTRADA de quantidade.
    pub last_entry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados de registro de um novo item (antes de ganhar id/status).
#[derive(Debug, Clone)]
pub struct NewStockItem {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub current_quantity: Decimal,
    pub min_quantity: Decimal,
    pub max_quantity: Option<Decimal>,
    pub cost: Decimal,
    pub auto_reorder: bool,
    pub reorder_point: Option<Decimal>,
    pub reorder_quantity: Option<Decimal>,
}

// --- 3. Movimentações de Estoque (Histórico) ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Entry,  // Vira "ENTRY" (entrada)
    Exit,   // Vira "EXIT" (saída)
    Adjust, // Vira "ADJUST" (ajuste)
}

/// Registro imutável de auditoria. O nome do produto é um snapshot
/// desnormalizado: renomear o produto não reescreve o histórico.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    /// Sempre positiva, na unidade canônica do item.
    pub quantity: Decimal,
    pub unit: String,
    pub date: DateTime<Utc>,
    pub reason: String,
    /// Identificador do ator (usuário ou "system").
    pub user: String,
    /// Impacto monetário (quantidade × custo unitário), quando conhecido.
    pub cost: Option<Decimal>,
}

// Entrada do recorder: nome/unidade são copiados do item no momento da
// gravação, não vêm do chamador.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub product_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub reason: String,
    pub user: String,
    pub cost: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn status_acima_do_minimo_fica_ok() {
        assert_eq!(derive_status(dec("15"), dec("5")), StockStatus::Ok);
    }

    #[test]
    fn status_no_minimo_fica_low() {
        assert_eq!(derive_status(dec("5"), dec("5")), StockStatus::Low);
    }

    #[test]
    fn status_na_metade_do_minimo_fica_critical() {
        assert_eq!(derive_status(dec("2.5"), dec("5")), StockStatus::Critical);
        assert_eq!(derive_status(dec("2"), dec("5")), StockStatus::Critical);
    }

    #[test]
    fn status_com_estoque_zerado_fica_critical() {
        assert_eq!(derive_status(dec("0"), dec("5")), StockStatus::Critical);
    }

    proptest! {
        // A tabela do status é uma função pura de (atual, mínimo).
        #[test]
        fn prop_tabela_de_status(
            current in 0i64..=100_000i64,
            min in 0i64..=10_000i64,
        ) {
            let current = Decimal::new(current, 2);
            let min = Decimal::new(min, 2);
            let status = derive_status(current, min);

            if current > min {
                prop_assert_eq!(status, StockStatus::Ok);
            } else if current > min * Decimal::new(5, 1) {
                prop_assert_eq!(status, StockStatus::Low);
            } else {
                prop_assert_eq!(status, StockStatus::Critical);
            }
        }
    }
}
