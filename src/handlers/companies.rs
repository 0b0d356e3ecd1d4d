// src/handlers/companies.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, read_degrade},
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{CanManageCompanies, RequireCapability},
    },
    models::company::{Company, CompanyPayload},
};

// GET /api/companies
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Companies",
    responses(
        (status = 200, description = "Firmas e acentas do hotel, por nome", body = Vec<Company>),
        (status = 401, description = "Não autenticado"),
        (status = 402, description = "Trial/assinatura vencidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Company>>, AppError> {
    let result = app_state.company_service.list(user.hotel_id).await;
    let companies = read_degrade::or_empty(result, "firmas")?;
    Ok(Json(companies))
}

// POST /api/companies
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "Companies",
    request_body = CompanyPayload,
    responses(
        (status = 201, description = "Firma cadastrada", body = Company),
        (status = 403, description = "Somente admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanManageCompanies>,
    Json(payload): Json<CompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let company = app_state
        .company_service
        .create(
            user.hotel_id,
            &payload.name,
            payload.company_type,
            payload.contact_person.as_deref(),
            payload.phone.as_deref(),
            payload.email.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(company)))
}

// PUT /api/companies/{id}
#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    tag = "Companies",
    request_body = CompanyPayload,
    params(("id" = Uuid, Path, description = "ID da firma")),
    responses(
        (status = 200, description = "Firma atualizada", body = Company),
        (status = 404, description = "Firma inexistente ou de outro hotel")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanManageCompanies>,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<CompanyPayload>,
) -> Result<Json<Company>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let company = app_state
        .company_service
        .update(
            company_id,
            user.hotel_id,
            &payload.name,
            payload.company_type,
            payload.contact_person.as_deref(),
            payload.phone.as_deref(),
            payload.email.as_deref(),
        )
        .await?;

    Ok(Json(company))
}

// DELETE /api/companies/{id}
#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    tag = "Companies",
    params(("id" = Uuid, Path, description = "ID da firma")),
    responses(
        (status = 204, description = "Firma removida junto com as ofertas dela"),
        (status = 404, description = "Firma inexistente ou de outro hotel")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_company(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanManageCompanies>,
    Path(company_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state
        .company_service
        .delete(company_id, user.hotel_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
