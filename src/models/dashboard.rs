// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::offer::OfferStatus;

// 1. Resumo do vendedor (os cards do topo)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_followups: i64,   // Follow-ups marcados para hoje
    pub overdue_followups: i64, // Follow-ups atrasados de ofertas abertas
    pub monthly_stats: Vec<MonthlyStatusEntry>,
}

// Quebra por status das ofertas criadas no mês corrente
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatusEntry {
    pub status: OfferStatus,
    pub count: i64,
    pub total: Decimal,
}

// 2. KPIs da diretoria
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectorKpis {
    pub total_pipeline_value: Decimal, // Soma das ofertas abertas
    pub approved_revenue: Decimal,     // Soma das aprovadas
    pub win_rate: f64,                 // approved / (approved + lost), em %
    pub overdue_follow_ups: i64,
    pub average_closing_days: f64,
}

// 3. Funil: contagem por status, sempre com os cinco estados presentes
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDistribution {
    pub sent: i64,
    pub waiting: i64,
    pub revised: i64,
    pub approved: i64,
    pub lost: i64,
}

// 4. Receita aprovada mês a mês do ano corrente (12 entradas, meses em turco)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenueEntry {
    pub month: String,
    pub amount: Decimal,
}

// 5. Tabela de performance por vendedor (sales e managers; admins ficam de fora)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentPerformance {
    pub user_id: Uuid,
    pub name: String,
    pub offers: i64,
    pub approved: i64,
    pub win_rate: f64,
    pub revenue: Decimal,
    pub avg_close_days: f64,
}

// 6. Motivos de perda, do mais frequente ao menos
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LostReasonEntry {
    pub reason: String,
    pub count: i64,
}

// 7. Disciplina de follow-up sobre as ofertas abertas
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpDiscipline {
    pub on_time: i64, // % arredondada de ofertas com follow-up em dia
    pub late: i64,
}
