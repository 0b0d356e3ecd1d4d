// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{CanManageUsers, RequireCapability},
    },
    models::auth::{
        InviteResponse, InviteUserPayload, MessageResponse, UpdateUserPayload, User,
        UserStatusPayload,
    },
};

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Usuários do hotel, dos mais antigos aos mais novos", body = Vec<User>),
        (status = 403, description = "Somente admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanManageUsers>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = app_state.user_service.list(user.hotel_id).await?;
    Ok(Json(users))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = InviteUserPayload,
    responses(
        (status = 201, description = "Convite criado; a senha temporária volta na resposta", body = InviteResponse),
        (status = 403, description = "Cota de assentos esgotada"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn invite_user(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanManageUsers>,
    Json(payload): Json<InviteUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (_, temp_password) = app_state
        .user_service
        .invite(&user, &payload.name, &payload.email, payload.role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            success: true,
            message: "Kullanıcı davet edildi".to_string(),
            temp_password,
        }),
    ))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    request_body = UpdateUserPayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário atualizado; campos ausentes ficam como estão", body = User),
        (status = 403, description = "Tentativa de trocar o próprio papel"),
        (status = 404, description = "Usuário inexistente ou de outro hotel")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanManageUsers>,
    Path(target_id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let updated = app_state
        .user_service
        .update(&user, target_id, payload.name, payload.email, payload.role)
        .await?;
    Ok(Json(updated))
}

// PATCH /api/users/{id}/status
#[utoipa::path(
    patch,
    path = "/api/users/{id}/status",
    tag = "Users",
    request_body = UserStatusPayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Flag de acesso atualizada", body = MessageResponse),
        (status = 403, description = "Tentativa de desativar a própria conta"),
        (status = 404, description = "Usuário inexistente ou de outro hotel")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_user_status(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanManageUsers>,
    Path(target_id): Path<Uuid>,
    Json(payload): Json<UserStatusPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state
        .user_service
        .set_active(&user, target_id, payload.active)
        .await?;

    let message = if payload.active {
        "Kullanıcı aktif edildi"
    } else {
        "Kullanıcı deaktive edildi"
    };
    Ok(Json(MessageResponse::ok(message)))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário removido; as ofertas dele caem junto"),
        (status = 403, description = "Tentativa de apagar a própria conta"),
        (status = 404, description = "Usuário inexistente ou de outro hotel")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanManageUsers>,
    Path(target_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.user_service.delete(&user, target_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
