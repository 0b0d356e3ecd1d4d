// src/middleware/subscription.rs

use axum::{extract::State, middleware::Next, response::Response};

use crate::{common::error::AppError, config::AppState, models::auth::User};

// O portão de assinatura. Roda DEPOIS do auth_guard nas rotas de dados de
// negócio: se o trial venceu e não há assinatura ativa, devolve 402 com a
// flag que manda o frontend para a tela de pagamento.
//
// Rotas de autenticação, de consulta da própria assinatura e de pagamento
// ficam fora do portão: o cliente precisa delas justamente para regularizar.
pub async fn subscription_guard(
    State(app_state): State<AppState>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .ok_or(AppError::InvalidToken)?;

    app_state
        .subscription_service
        .assert_active(user.hotel_id)
        .await?;

    Ok(next.run(request).await)
}
