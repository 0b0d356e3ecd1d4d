// src/handlers/director.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{CanViewDirectorPanel, RequireCapability},
    },
    models::dashboard::{
        AgentPerformance, DirectorKpis, FollowUpDiscipline, LostReasonEntry, MonthlyRevenueEntry,
        PipelineDistribution,
    },
};

#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    pub year: Option<i32>,
}

// GET /api/dashboard/director/kpi
#[utoipa::path(
    get,
    path = "/api/dashboard/director/kpi",
    tag = "Director",
    responses(
        (status = 200, description = "KPIs consolidados do hotel", body = DirectorKpis),
        (status = 403, description = "Somente o diretor de vendas")
    ),
    security(("api_jwt" = []))
)]
pub async fn kpi(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanViewDirectorPanel>,
) -> Result<Json<DirectorKpis>, AppError> {
    let kpis = app_state
        .dashboard_service
        .director_kpis(user.hotel_id)
        .await?;
    Ok(Json(kpis))
}

// GET /api/dashboard/director/pipeline
#[utoipa::path(
    get,
    path = "/api/dashboard/director/pipeline",
    tag = "Director",
    responses(
        (status = 200, description = "Funil com os cinco status, zerados quando vazios", body = PipelineDistribution),
        (status = 403, description = "Somente o diretor de vendas")
    ),
    security(("api_jwt" = []))
)]
pub async fn pipeline(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanViewDirectorPanel>,
) -> Result<Json<PipelineDistribution>, AppError> {
    let distribution = app_state.dashboard_service.pipeline(user.hotel_id).await?;
    Ok(Json(distribution))
}

// GET /api/dashboard/director/revenue
#[utoipa::path(
    get,
    path = "/api/dashboard/director/revenue",
    tag = "Director",
    params(("year" = Option<i32>, Query, description = "Ano; corrente quando omitido")),
    responses(
        (status = 200, description = "Receita aprovada mês a mês, 12 entradas com meses em turco", body = Vec<MonthlyRevenueEntry>),
        (status = 403, description = "Somente o diretor de vendas")
    ),
    security(("api_jwt" = []))
)]
pub async fn revenue(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanViewDirectorPanel>,
    Query(query): Query<RevenueQuery>,
) -> Result<Json<Vec<MonthlyRevenueEntry>>, AppError> {
    let revenue = app_state
        .dashboard_service
        .monthly_revenue(user.hotel_id, query.year)
        .await?;
    Ok(Json(revenue))
}

// GET /api/dashboard/director/agents
#[utoipa::path(
    get,
    path = "/api/dashboard/director/agents",
    tag = "Director",
    responses(
        (status = 200, description = "Performance individual de sales e managers", body = Vec<AgentPerformance>),
        (status = 403, description = "Somente o diretor de vendas")
    ),
    security(("api_jwt" = []))
)]
pub async fn agents(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanViewDirectorPanel>,
) -> Result<Json<Vec<AgentPerformance>>, AppError> {
    let performance = app_state
        .dashboard_service
        .agent_performance(user.hotel_id)
        .await?;
    Ok(Json(performance))
}

// GET /api/dashboard/director/lost-reasons
#[utoipa::path(
    get,
    path = "/api/dashboard/director/lost-reasons",
    tag = "Director",
    responses(
        (status = 200, description = "Motivos de perda do mais frequente ao menos", body = Vec<LostReasonEntry>),
        (status = 403, description = "Somente o diretor de vendas")
    ),
    security(("api_jwt" = []))
)]
pub async fn lost_reasons(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanViewDirectorPanel>,
) -> Result<Json<Vec<LostReasonEntry>>, AppError> {
    let reasons = app_state
        .dashboard_service
        .lost_reasons(user.hotel_id)
        .await?;
    Ok(Json(reasons))
}

// GET /api/dashboard/director/followup-discipline
#[utoipa::path(
    get,
    path = "/api/dashboard/director/followup-discipline",
    tag = "Director",
    responses(
        (status = 200, description = "Percentual de ofertas abertas com follow-up em dia", body = FollowUpDiscipline),
        (status = 403, description = "Somente o diretor de vendas")
    ),
    security(("api_jwt" = []))
)]
pub async fn followup_discipline(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    _guard: RequireCapability<CanViewDirectorPanel>,
) -> Result<Json<FollowUpDiscipline>, AppError> {
    let discipline = app_state
        .dashboard_service
        .followup_discipline(user.hotel_id)
        .await?;
    Ok(Json(discipline))
}
