use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Um ingrediente em falta: quanto era necessário vs. quanto há disponível.
/// O nome é o snapshot do produto, para a mensagem ficar estável mesmo que
/// o item seja renomeado depois.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockShortage {
    pub product_id: Uuid,
    pub product_name: String,
    pub required: Decimal,
    pub available: Decimal,
}

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Taxonomia: validação / não-encontrado / estoque insuficiente são todos
// recuperáveis pelo chamador; só o erro interno vira 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validação de regra de negócio feita dentro dos services
    // (quantidade negativa, campo em branco, delta zero...).
    #[error("{0}")]
    InvalidInput(String),

    #[error("Item de estoque não encontrado")]
    StockItemNotFound,

    #[error("Prato não encontrado")]
    RecipeNotFound,

    // Lista TODOS os ingredientes em falta, nunca só o primeiro.
    #[error("Estoque insuficiente")]
    InsufficientStock(Vec<StockShortage>),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvalidInput(message) => {
                let body = Json(json!({ "error": message }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Corpo estruturado: o frontend mostra cada ingrediente em falta.
            AppError::InsufficientStock(shortages) => {
                let names: Vec<&str> =
                    shortages.iter().map(|s| s.product_name.as_str()).collect();
                let body = Json(json!({
                    "error": format!("Estoque insuficiente: {}", names.join(", ")),
                    "shortages": shortages,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }

            AppError::StockItemNotFound => {
                (StatusCode::NOT_FOUND, "Item de estoque não encontrado.")
            }
            AppError::RecipeNotFound => (StatusCode::NOT_FOUND, "Prato não encontrado."),

            // O `tracing` loga a mensagem detalhada; o cliente recebe o genérico.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
