// src/handlers/offers.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, read_degrade},
    config::AppState,
    db::offer_repo::OfferFilters,
    middleware::{
        auth::CurrentUser,
        rbac::{CanDeleteOffers, RequireCapability},
    },
    models::offer::{
        CreateOfferPayload, Note, NoteWithAuthor, NotePayload, Offer, OfferWithDetails,
        UpdateOfferPayload,
    },
    services::offer_service::export_filename,
};

// GET /api/offers
#[utoipa::path(
    get,
    path = "/api/offers",
    tag = "Offers",
    params(
        ("status" = Option<String>, Query, description = "Filtra por status do funil"),
        ("companyId" = Option<Uuid>, Query, description = "Filtra por firma"),
        ("agentId" = Option<Uuid>, Query, description = "Filtra por vendedor (ignorado para sales)")
    ),
    responses(
        (status = 200, description = "Ofertas visíveis ao papel, por data de follow-up", body = Vec<OfferWithDetails>),
        (status = 402, description = "Trial/assinatura vencidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_offers(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filters): Query<OfferFilters>,
) -> Result<Json<Vec<OfferWithDetails>>, AppError> {
    let result = app_state.offer_service.list(&user, filters).await;
    let offers = read_degrade::or_empty(result, "ofertas")?;
    Ok(Json(offers))
}

// POST /api/offers
#[utoipa::path(
    post,
    path = "/api/offers",
    tag = "Offers",
    request_body = CreateOfferPayload,
    responses(
        (status = 201, description = "Oferta criada com o solicitante como vendedor", body = OfferWithDetails),
        (status = 404, description = "Firma inexistente ou de outro hotel")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_offer(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateOfferPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let offer = app_state.offer_service.create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

// PUT /api/offers/{id}
#[utoipa::path(
    put,
    path = "/api/offers/{id}",
    tag = "Offers",
    request_body = UpdateOfferPayload,
    params(("id" = Uuid, Path, description = "ID da oferta")),
    responses(
        (status = 200, description = "Oferta sobrescrita com os campos do payload", body = Offer),
        (status = 403, description = "Sales tentando editar oferta de outro vendedor"),
        (status = 404, description = "Oferta inexistente ou de outro hotel")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_offer(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(offer_id): Path<Uuid>,
    Json(payload): Json<UpdateOfferPayload>,
) -> Result<Json<Offer>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let offer = app_state
        .offer_service
        .update(&user, offer_id, payload)
        .await?;
    Ok(Json(offer))
}

// DELETE /api/offers/{id}
#[utoipa::path(
    delete,
    path = "/api/offers/{id}",
    tag = "Offers",
    params(("id" = Uuid, Path, description = "ID da oferta")),
    responses(
        (status = 204, description = "Oferta e notas removidas"),
        (status = 403, description = "Somente admin"),
        (status = 404, description = "Oferta inexistente ou de outro hotel")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_offer(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanDeleteOffers>,
    Path(offer_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.offer_service.delete(&user, offer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/offers/{id}/notes
#[utoipa::path(
    get,
    path = "/api/offers/{id}/notes",
    tag = "Offers",
    params(("id" = Uuid, Path, description = "ID da oferta")),
    responses(
        (status = 200, description = "Notas da oferta, mais recentes primeiro", body = Vec<NoteWithAuthor>),
        (status = 404, description = "Oferta inexistente ou de outro hotel")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_notes(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(offer_id): Path<Uuid>,
) -> Result<Json<Vec<NoteWithAuthor>>, AppError> {
    let result = app_state.offer_service.list_notes(&user, offer_id).await;
    let notes = read_degrade::or_empty(result, "notas")?;
    Ok(Json(notes))
}

// POST /api/offers/{id}/notes
#[utoipa::path(
    post,
    path = "/api/offers/{id}/notes",
    tag = "Offers",
    request_body = NotePayload,
    params(("id" = Uuid, Path, description = "ID da oferta")),
    responses(
        (status = 201, description = "Nota registrada", body = Note),
        (status = 404, description = "Oferta inexistente ou de outro hotel")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_note(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(offer_id): Path<Uuid>,
    Json(payload): Json<NotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let note = app_state
        .offer_service
        .add_note(&user, offer_id, &payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

// GET /api/offers/export/csv
#[utoipa::path(
    get,
    path = "/api/offers/export/csv",
    tag = "Offers",
    responses(
        (status = 200, description = "CSV com BOM UTF-8, escopado pelo papel", content_type = "text/csv"),
        (status = 402, description = "Trial/assinatura vencidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_csv(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let csv = app_state.offer_service.export_csv(&user).await?;
    let filename = export_filename(Utc::now().date_naive());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}
