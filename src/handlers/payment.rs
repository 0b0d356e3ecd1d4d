// src/handlers/payment.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{CanManageBilling, RequireCapability},
    },
    models::payment::{
        CalculatePricePayload, CreateSubscriptionPayload, PaymentReceipt, PaymentWithUser,
        PriceQuote,
    },
    services::payment_service,
};

// POST /api/payment/calculate
#[utoipa::path(
    post,
    path = "/api/payment/calculate",
    tag = "Payment",
    request_body = CalculatePricePayload,
    responses(
        (status = 200, description = "Orçamento com base, KDV de 20% e total em TRY", body = PriceQuote),
        (status = 403, description = "Somente admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn calculate_price(
    _guard: RequireCapability<CanManageBilling>,
    Json(payload): Json<CalculatePricePayload>,
) -> Result<Json<PriceQuote>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let quote = payment_service::quote(payload.package_type, payload.extra_users);
    Ok(Json(quote))
}

// POST /api/payment/create-subscription
#[utoipa::path(
    post,
    path = "/api/payment/create-subscription",
    tag = "Payment",
    request_body = CreateSubscriptionPayload,
    responses(
        (status = 200, description = "Cobrança aprovada; assinatura/assentos aplicados e linha no ledger", body = PaymentReceipt),
        (status = 400, description = "Gateway recusou a cobrança"),
        (status = 403, description = "Somente admin"),
        (status = 429, description = "Janela de pagamentos esgotada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_subscription(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanManageBilling>,
    Json(payload): Json<CreateSubscriptionPayload>,
) -> Result<Json<PaymentReceipt>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let receipt = app_state
        .payment_service
        .create_subscription(&user, payload.package_type, payload.extra_users)
        .await?;
    Ok(Json(receipt))
}

// GET /api/payment/history
#[utoipa::path(
    get,
    path = "/api/payment/history",
    tag = "Payment",
    responses(
        (status = 200, description = "Ledger do hotel com o nome de quem pagou, mais recente primeiro", body = Vec<PaymentWithUser>),
        (status = 403, description = "Somente admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn history(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanManageBilling>,
) -> Result<Json<Vec<PaymentWithUser>>, AppError> {
    let payments = app_state.payment_service.history(user.hotel_id).await?;
    Ok(Json(payments))
}
