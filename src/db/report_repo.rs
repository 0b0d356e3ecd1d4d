// src/db/report_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::report::{CurrencyAverage, CurrencyTotal, StatusCount, TopAgentEntry, TopCompanyEntry},
};

// Totais simples do período
#[derive(Debug, sqlx::FromRow)]
pub struct ReportTotalsRow {
    pub total_offers: i64,
    pub approved_offers: i64,
    pub pending_offers: i64,
    pub lost_offers: i64,
    pub total_guests: i64,
    pub total_rooms: i64,
}

// Tudo que o relatório de período precisa, lido num único snapshot
#[derive(Debug)]
pub struct ReportData {
    pub totals: ReportTotalsRow,
    pub revenue_by_currency: Vec<CurrencyTotal>,
    pub potential_revenue_by_currency: Vec<CurrencyTotal>,
    pub avg_offer_value_by_currency: Vec<CurrencyAverage>,
    pub status_breakdown: Vec<StatusCount>,
    pub top_agents: Vec<TopAgentEntry>,
    pub top_companies: Vec<TopCompanyEntry>,
}

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Janela semiaberta: created_at em [start, end). Uma oferta criada no
    // instante exato da virada pertence ao período seguinte, nunca aos dois.
    pub async fn collect(
        &self,
        hotel_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ReportData, AppError> {
        let mut tx = self.pool.begin().await?;

        let totals = sqlx::query_as::<_, ReportTotalsRow>(
            r#"
            SELECT
                COUNT(*) AS total_offers,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved_offers,
                COUNT(*) FILTER (WHERE status IN ('sent', 'waiting', 'revised')) AS pending_offers,
                COUNT(*) FILTER (WHERE status = 'lost') AS lost_offers,
                COALESCE(SUM(guest_count) FILTER (WHERE status = 'approved'), 0)::bigint
                    AS total_guests,
                COALESCE(SUM(room_count) FILTER (WHERE status = 'approved'), 0)::bigint
                    AS total_rooms
            FROM offers
            WHERE hotel_id = $1 AND created_at >= $2 AND created_at < $3
            "#,
        )
        .bind(hotel_id)
        .bind(start)
        .bind(end)
        .fetch_one(&mut *tx)
        .await?;

        // Receita confirmada (só aprovadas), separada por moeda
        let revenue_by_currency = sqlx::query_as::<_, CurrencyTotal>(
            r#"
            SELECT currency, COALESCE(SUM(amount), 0) AS total_revenue
            FROM offers
            WHERE hotel_id = $1 AND created_at >= $2 AND created_at < $3
              AND status = 'approved'
            GROUP BY currency
            ORDER BY total_revenue DESC
            "#,
        )
        .bind(hotel_id)
        .bind(start)
        .bind(end)
        .fetch_all(&mut *tx)
        .await?;

        let potential_revenue_by_currency = sqlx::query_as::<_, CurrencyTotal>(
            r#"
            SELECT currency, COALESCE(SUM(amount), 0) AS total_revenue
            FROM offers
            WHERE hotel_id = $1 AND created_at >= $2 AND created_at < $3
              AND status IN ('sent', 'waiting', 'revised')
            GROUP BY currency
            ORDER BY total_revenue DESC
            "#,
        )
        .bind(hotel_id)
        .bind(start)
        .bind(end)
        .fetch_all(&mut *tx)
        .await?;

        // Ticket médio sobre TODAS as ofertas do período, não só as aprovadas
        let avg_offer_value_by_currency = sqlx::query_as::<_, CurrencyAverage>(
            r#"
            SELECT currency, COALESCE(ROUND(AVG(amount), 2), 0) AS avg_value
            FROM offers
            WHERE hotel_id = $1 AND created_at >= $2 AND created_at < $3
            GROUP BY currency
            ORDER BY avg_value DESC
            "#,
        )
        .bind(hotel_id)
        .bind(start)
        .bind(end)
        .fetch_all(&mut *tx)
        .await?;

        let status_breakdown = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM offers
            WHERE hotel_id = $1 AND created_at >= $2 AND created_at < $3
            GROUP BY status
            "#,
        )
        .bind(hotel_id)
        .bind(start)
        .bind(end)
        .fetch_all(&mut *tx)
        .await?;

        let top_agents = sqlx::query_as::<_, TopAgentEntry>(
            r#"
            SELECT u.name AS agent_name,
                   COUNT(*) AS total_count,
                   COUNT(*) FILTER (WHERE o.status = 'approved') AS approved_count
            FROM offers o
            JOIN users u ON u.id = o.agent_id
            WHERE o.hotel_id = $1 AND o.created_at >= $2 AND o.created_at < $3
            GROUP BY u.id, u.name
            ORDER BY approved_count DESC, total_count DESC
            LIMIT 5
            "#,
        )
        .bind(hotel_id)
        .bind(start)
        .bind(end)
        .fetch_all(&mut *tx)
        .await?;

        let top_companies = sqlx::query_as::<_, TopCompanyEntry>(
            r#"
            SELECT c.name AS company_name,
                   COUNT(*) AS offer_count,
                   COUNT(*) FILTER (WHERE o.status = 'approved') AS approved_count
            FROM offers o
            JOIN companies c ON c.id = o.company_id
            WHERE o.hotel_id = $1 AND o.created_at >= $2 AND o.created_at < $3
            GROUP BY c.id, c.name
            ORDER BY offer_count DESC
            LIMIT 5
            "#,
        )
        .bind(hotel_id)
        .bind(start)
        .bind(end)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ReportData {
            totals,
            revenue_by_currency,
            potential_revenue_by_currency,
            avg_offer_value_by_currency,
            status_breakdown,
            top_agents,
            top_companies,
        })
    }
}
