// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{CanManageBilling, RequireCapability},
    },
    models::auth::{
        AuthResponse, ChangePasswordPayload, ExtraUsersResponse, ForgotPasswordPayload,
        LoginPayload, MessageResponse, PurchaseExtraUsersPayload, RegisterPayload,
        ResetPasswordPayload, SubscribePayload, User,
    },
    models::tenancy::HotelInfo,
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = 200, description = "Hotel criado com trial de 7 dias; devolve token e perfil do admin", body = AuthResponse),
        (status = 409, description = "E-mail já cadastrado"),
        (status = 429, description = "Janela de registros esgotada")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state.auth_service.register(payload).await?;
    Ok(Json(response))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token de 24h e perfil", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas"),
        (status = 429, description = "Muitas tentativas falhas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(response))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Perfil do usuário autenticado", body = User),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

// POST /api/auth/change-password
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = "Auth",
    request_body = ChangePasswordPayload,
    responses(
        (status = 200, description = "Senha trocada", body = MessageResponse),
        (status = 401, description = "Senha atual incorreta")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .auth_service
        .change_password(&user, &payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::ok("Şifreniz başarıyla değiştirildi")))
}

// POST /api/auth/forgot-password
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordPayload,
    responses(
        (status = 200, description = "Mesma resposta exista ou não a conta", body = MessageResponse),
        (status = 429, description = "Janela de e-mails esgotada")
    )
)]
pub async fn forgot_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.auth_service.forgot_password(&payload.email).await?;

    Ok(Json(MessageResponse::ok(
        "Eğer bu e-posta adresi sistemde kayıtlıysa, şifre sıfırlama linki gönderildi.",
    )))
}

// POST /api/auth/reset-password
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Auth",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Senha redefinida; o token fica usado", body = MessageResponse),
        (status = 400, description = "Token desconhecido, usado ou vencido")
    )
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .auth_service
        .reset_password(&payload.token, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::ok(
        "Şifreniz başarıyla güncellendi. Giriş yapabilirsiniz.",
    )))
}

// GET /api/auth/hotel-info
#[utoipa::path(
    get,
    path = "/api/auth/hotel-info",
    tag = "Subscription",
    responses(
        (status = 200, description = "Hotel com a contagem de assentos ocupados", body = HotelInfo),
        (status = 403, description = "Somente admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn hotel_info(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanManageBilling>,
) -> Result<Json<HotelInfo>, AppError> {
    let info = app_state
        .subscription_service
        .hotel_info(user.hotel_id)
        .await?;
    Ok(Json(info))
}

// POST /api/auth/subscribe
#[utoipa::path(
    post,
    path = "/api/auth/subscribe",
    tag = "Subscription",
    request_body = SubscribePayload,
    responses(
        (status = 200, description = "Janela de assinatura gravada", body = MessageResponse),
        (status = 403, description = "Somente admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn subscribe(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanManageBilling>,
    Json(payload): Json<SubscribePayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .subscription_service
        .subscribe(user.hotel_id, payload.subscription_ends_at, payload.extra_users)
        .await?;

    Ok(Json(MessageResponse::ok("Abonelik başarıyla oluşturuldu")))
}

// POST /api/auth/purchase-extra-users
#[utoipa::path(
    post,
    path = "/api/auth/purchase-extra-users",
    tag = "Subscription",
    request_body = PurchaseExtraUsersPayload,
    responses(
        (status = 200, description = "Assentos somados ao pacote do hotel", body = ExtraUsersResponse),
        (status = 403, description = "Somente admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn purchase_extra_users(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanManageBilling>,
    Json(payload): Json<PurchaseExtraUsersPayload>,
) -> Result<Json<ExtraUsersResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let hotel = app_state
        .subscription_service
        .purchase_extra_users(user.hotel_id, payload.extra_users)
        .await?;

    Ok(Json(ExtraUsersResponse {
        success: true,
        message: "Ek kullanıcılar başarıyla eklendi".to_string(),
        new_extra_users: hotel.extra_users,
    }))
}
