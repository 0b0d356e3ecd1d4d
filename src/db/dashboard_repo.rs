// src/db/dashboard_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::dashboard::{DashboardStats, LostReasonEntry, MonthlyStatusEntry},
    models::report::StatusCount,
};

// Valores crus dos KPIs da diretoria. O serviço calcula win rate e arredonda.
#[derive(Debug, sqlx::FromRow)]
pub struct DirectorKpiRow {
    pub pipeline_value: Decimal,
    pub approved_revenue: Decimal,
    pub approved_count: i64,
    pub lost_count: i64,
    pub overdue_follow_ups: i64,
    pub avg_closing_days: Option<f64>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct AgentPerformanceRow {
    pub user_id: Uuid,
    pub name: String,
    pub offers: i64,
    pub approved: i64,
    pub revenue: Decimal,
    pub avg_closing_days: Option<f64>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct MonthRevenueRow {
    pub month_num: i32,
    pub total: Decimal,
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Resumo do vendedor. Quando agent_id vem preenchido (papel sales),
    // só as ofertas do próprio vendedor entram na conta.
    pub async fn stats(
        &self,
        hotel_id: Uuid,
        agent_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<DashboardStats, AppError> {
        // Transação para um snapshot consistente dos três números
        let mut tx = self.pool.begin().await?;

        // Follow-ups de hoje contam em qualquer status; só os atrasados
        // excluem ofertas já fechadas
        let today_followups: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM offers
            WHERE hotel_id = $1
              AND ($2::uuid IS NULL OR agent_id = $2)
              AND follow_up_date = $3
            "#,
        )
        .bind(hotel_id)
        .bind(agent_id)
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;

        let overdue_followups: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM offers
            WHERE hotel_id = $1
              AND ($2::uuid IS NULL OR agent_id = $2)
              AND follow_up_date < $3
              AND status NOT IN ('approved', 'lost')
            "#,
        )
        .bind(hotel_id)
        .bind(agent_id)
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;

        let monthly_stats = sqlx::query_as::<_, MonthlyStatusEntry>(
            r#"
            SELECT status, COUNT(*) AS count, COALESCE(SUM(amount), 0) AS total
            FROM offers
            WHERE hotel_id = $1
              AND ($2::uuid IS NULL OR agent_id = $2)
              AND date_trunc('month', created_at) = date_trunc('month', NOW())
            GROUP BY status
            "#,
        )
        .bind(hotel_id)
        .bind(agent_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardStats {
            today_followups,
            overdue_followups,
            monthly_stats,
        })
    }

    // --- VISÕES DA DIRETORIA (sempre o hotel inteiro) ---

    pub async fn director_kpis(&self, hotel_id: Uuid) -> Result<DirectorKpiRow, AppError> {
        let row = sqlx::query_as::<_, DirectorKpiRow>(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE status IN ('sent', 'waiting', 'revised')), 0)
                    AS pipeline_value,
                COALESCE(SUM(amount) FILTER (WHERE status = 'approved'), 0)
                    AS approved_revenue,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved_count,
                COUNT(*) FILTER (WHERE status = 'lost') AS lost_count,
                COUNT(*) FILTER (
                    WHERE status NOT IN ('approved', 'lost') AND follow_up_date < CURRENT_DATE
                ) AS overdue_follow_ups,
                (AVG(FLOOR(EXTRACT(EPOCH FROM (NOW() - created_at)) / 86400))
                    FILTER (WHERE status = 'approved'))::float8 AS avg_closing_days
            FROM offers
            WHERE hotel_id = $1
            "#,
        )
        .bind(hotel_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn pipeline_counts(&self, hotel_id: Uuid) -> Result<Vec<StatusCount>, AppError> {
        let rows = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM offers WHERE hotel_id = $1 GROUP BY status",
        )
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Receita aprovada por mês de criação, dentro do ano pedido
    pub async fn monthly_revenue(
        &self,
        hotel_id: Uuid,
        year: i32,
    ) -> Result<Vec<MonthRevenueRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthRevenueRow>(
            r#"
            SELECT EXTRACT(MONTH FROM created_at)::int AS month_num,
                   COALESCE(SUM(amount), 0) AS total
            FROM offers
            WHERE hotel_id = $1
              AND status = 'approved'
              AND EXTRACT(YEAR FROM created_at)::int = $2
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(hotel_id)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Tabela da equipe comercial (vendedores e müdürler).
    // LEFT JOIN: quem ainda não tem ofertas aparece zerado.
    pub async fn agent_performance(
        &self,
        hotel_id: Uuid,
    ) -> Result<Vec<AgentPerformanceRow>, AppError> {
        let rows = sqlx::query_as::<_, AgentPerformanceRow>(
            r#"
            SELECT
                u.id AS user_id,
                u.name,
                COUNT(o.id) AS offers,
                COUNT(o.id) FILTER (WHERE o.status = 'approved') AS approved,
                COALESCE(SUM(o.amount) FILTER (WHERE o.status = 'approved'), 0) AS revenue,
                (AVG(FLOOR(EXTRACT(EPOCH FROM (NOW() - o.created_at)) / 86400))
                    FILTER (WHERE o.status = 'approved'))::float8 AS avg_closing_days
            FROM users u
            LEFT JOIN offers o ON o.agent_id = u.id
            WHERE u.hotel_id = $1 AND u.role IN ('sales', 'manager')
            GROUP BY u.id, u.name
            ORDER BY revenue DESC
            "#,
        )
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Motivos de perda. NULL e string vazia caem no balde "Belirtilmemiş".
    pub async fn lost_reasons(&self, hotel_id: Uuid) -> Result<Vec<LostReasonEntry>, AppError> {
        let rows = sqlx::query_as::<_, LostReasonEntry>(
            r#"
            SELECT COALESCE(NULLIF(lost_reason, ''), 'Belirtilmemiş') AS reason,
                   COUNT(*) AS count
            FROM offers
            WHERE hotel_id = $1 AND status = 'lost'
            GROUP BY 1
            ORDER BY count DESC
            "#,
        )
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Ofertas abertas com follow-up em dia vs. atrasado
    pub async fn followup_counts(
        &self,
        hotel_id: Uuid,
        today: NaiveDate,
    ) -> Result<(i64, i64), AppError> {
        let counts: (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE follow_up_date >= $2),
                COUNT(*) FILTER (WHERE follow_up_date < $2)
            FROM offers
            WHERE hotel_id = $1 AND status NOT IN ('approved', 'lost')
            "#,
        )
        .bind(hotel_id)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }
}
