// src/handlers/reports.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{CanViewReports, RequireCapability},
    },
    models::report::{PeriodReport, ReportPeriod},
};

// GET /api/reports/{period}
#[utoipa::path(
    get,
    path = "/api/reports/{period}",
    tag = "Reports",
    params(("period" = String, Path, description = "weekly, monthly ou yearly")),
    responses(
        (status = 200, description = "Relatório consolidado do período corrente", body = PeriodReport),
        (status = 403, description = "Somente admin e müdür"),
        (status = 404, description = "Período desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn period_report(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanViewReports>,
    Path(period): Path<String>,
) -> Result<Json<PeriodReport>, AppError> {
    let period =
        ReportPeriod::parse(&period).ok_or(AppError::NotFound("Geçersiz rapor türü."))?;

    let report = app_state
        .report_service
        .generate(user.hotel_id, period)
        .await?;
    Ok(Json(report))
}
