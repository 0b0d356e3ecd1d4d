// src/db/tenancy_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::tenancy::{Hotel, HotelInfo};

// Linha do job de lembrete: hotel + o admin que recebe o e-mail
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrialReminderRow {
    pub hotel_id: Uuid,
    pub hotel_name: String,
    pub trial_ends_at: DateTime<Utc>,
    pub admin_email: String,
    pub admin_name: String,
}

// O repositório do tenant: tabela 'hotels' e as janelas de trial/assinatura
#[derive(Clone)]
pub struct HotelRepository {
    pool: PgPool,
}

impl HotelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_hotel<'e, E>(
        &self,
        executor: E,
        name: &str,
        trial_ends_at: DateTime<Utc>,
    ) -> Result<Hotel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let hotel = sqlx::query_as::<_, Hotel>(
            "INSERT INTO hotels (name, trial_ends_at) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(trial_ends_at)
        .fetch_one(executor)
        .await?;
        Ok(hotel)
    }

    pub async fn find_by_id(&self, hotel_id: Uuid) -> Result<Option<Hotel>, AppError> {
        let maybe_hotel = sqlx::query_as::<_, Hotel>("SELECT * FROM hotels WHERE id = $1")
            .bind(hotel_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_hotel)
    }

    // Tranca a linha do hotel dentro de uma transação. Serializa operações
    // concorrentes sobre o mesmo tenant (quota de assentos, compra de extras).
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        hotel_id: Uuid,
    ) -> Result<Option<Hotel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_hotel =
            sqlx::query_as::<_, Hotel>("SELECT * FROM hotels WHERE id = $1 FOR UPDATE")
                .bind(hotel_id)
                .fetch_optional(executor)
                .await?;
        Ok(maybe_hotel)
    }

    // Hotel + contagem de assentos ocupados, para a tela de assinatura
    pub async fn info(&self, hotel_id: Uuid) -> Result<Option<HotelInfo>, AppError> {
        let maybe_info = sqlx::query_as::<_, HotelInfo>(
            r#"
            SELECT
                h.id, h.name, h.included_users, h.extra_users,
                h.trial_ends_at, h.subscription_ends_at, h.created_at,
                (SELECT COUNT(*) FROM users u WHERE u.hotel_id = h.id) AS total_users
            FROM hotels h
            WHERE h.id = $1
            "#,
        )
        .bind(hotel_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_info)
    }

    // Pagamento anual aprovado: a janela REINICIA a partir de agora,
    // não soma ao período restante.
    pub async fn activate_subscription<'e, E>(
        &self,
        executor: E,
        hotel_id: Uuid,
        ends_at: DateTime<Utc>,
    ) -> Result<Hotel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let hotel = sqlx::query_as::<_, Hotel>(
            "UPDATE hotels SET subscription_ends_at = $1 WHERE id = $2 RETURNING *",
        )
        .bind(ends_at)
        .bind(hotel_id)
        .fetch_one(executor)
        .await?;
        Ok(hotel)
    }

    // Escrita absoluta, usada pela rota direta de assinatura
    pub async fn set_extra_users<'e, E>(
        &self,
        executor: E,
        hotel_id: Uuid,
        count: i32,
    ) -> Result<Hotel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let hotel = sqlx::query_as::<_, Hotel>(
            "UPDATE hotels SET extra_users = $1 WHERE id = $2 RETURNING *",
        )
        .bind(count)
        .bind(hotel_id)
        .fetch_one(executor)
        .await?;
        Ok(hotel)
    }

    pub async fn add_extra_users<'e, E>(
        &self,
        executor: E,
        hotel_id: Uuid,
        count: i32,
    ) -> Result<Hotel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let hotel = sqlx::query_as::<_, Hotel>(
            "UPDATE hotels SET extra_users = extra_users + $1 WHERE id = $2 RETURNING *",
        )
        .bind(count)
        .bind(hotel_id)
        .fetch_one(executor)
        .await?;
        Ok(hotel)
    }

    // --- CONSULTAS DO JOB DE LEMBRETE ---

    // Hotéis em trial que expiram dentro de [start, end), ainda sem assinatura
    pub async fn trials_ending_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TrialReminderRow>, AppError> {
        let rows = sqlx::query_as::<_, TrialReminderRow>(
            r#"
            SELECT h.id AS hotel_id, h.name AS hotel_name, h.trial_ends_at,
                   u.email AS admin_email, u.name AS admin_name
            FROM hotels h
            JOIN users u ON u.hotel_id = h.id AND u.role = 'admin'
            WHERE h.subscription_ends_at IS NULL
              AND h.trial_ends_at IS NOT NULL
              AND h.trial_ends_at >= $1
              AND h.trial_ends_at < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Hotéis cujo trial já venceu e seguem sem assinatura
    pub async fn trials_ended(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<TrialReminderRow>, AppError> {
        let rows = sqlx::query_as::<_, TrialReminderRow>(
            r#"
            SELECT h.id AS hotel_id, h.name AS hotel_name, h.trial_ends_at,
                   u.email AS admin_email, u.name AS admin_name
            FROM hotels h
            JOIN users u ON u.hotel_id = h.id AND u.role = 'admin'
            WHERE h.subscription_ends_at IS NULL
              AND h.trial_ends_at IS NOT NULL
              AND h.trial_ends_at < $1
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
