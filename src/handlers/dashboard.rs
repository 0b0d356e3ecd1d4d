// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError, config::AppState, middleware::auth::CurrentUser,
    models::dashboard::DashboardStats,
};

// GET /api/dashboard/stats
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Follow-ups de hoje, atrasados e a quebra do mês, no escopo do papel", body = DashboardStats),
        (status = 402, description = "Trial/assinatura vencidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn stats(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = app_state.dashboard_service.stats(&user).await?;
    Ok(Json(stats))
}
