// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::common::error::AppError;

// O nome do nosso cabeçalho HTTP customizado
const TENANT_ID_HEADER: &str = "x-tenant-id";

// Extrator do tenant (restaurante) que a requisição quer acessar.
// Autenticação e autorização são responsabilidade de uma camada externa;
// aqui só garantimos que TODA operação chega com um escopo de tenant.
#[derive(Debug, Clone)]
pub struct TenantContext(pub Uuid);

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    // AppError já implementa IntoResponse, então serve de rejeição.
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts.headers.get(TENANT_ID_HEADER).ok_or_else(|| {
            AppError::InvalidInput("O cabeçalho X-Tenant-ID é obrigatório.".to_string())
        })?;

        let value_str = header_value.to_str().map_err(|_| {
            AppError::InvalidInput(
                "Cabeçalho X-Tenant-ID contém caracteres inválidos.".to_string(),
            )
        })?;

        let tenant_id = Uuid::parse_str(value_str).map_err(|_| {
            AppError::InvalidInput("Cabeçalho X-Tenant-ID inválido (não é um UUID).".to_string())
        })?;

        Ok(TenantContext(tenant_id))
    }
}
