// src/db/offer_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::offer::{
    Currency, Note, NoteWithAuthor, Offer, OfferStatus, OfferWithDetails,
};

// Filtros opcionais da listagem (vêm da query string)
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferFilters {
    pub status: Option<OfferStatus>,
    pub company_id: Option<Uuid>,
    pub agent_id: Option<Uuid>,
}

const OFFER_DETAIL_COLUMNS: &str = r#"
    o.id, o.hotel_id, o.company_id, o.agent_id, o.title, o.status, o.lost_reason,
    o.price, o.amount, o.currency,
    o.check_in_date, o.check_out_date, o.guest_count, o.room_count, o.meeting_room,
    o.follow_up_date, o.approved_at, o.created_at,
    c.name AS company_name, u.name AS agent_name
"#;

#[derive(Clone)]
pub struct OfferRepository {
    pool: PgPool,
}

impl OfferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Listagem com joins e filtros dinâmicos. A cláusula WHERE cresce conforme
    // os filtros presentes, com os binds na mesma ordem dos placeholders.
    // Ordenada pela data de follow-up: o que precisa de ação aparece primeiro.
    pub async fn list(
        &self,
        hotel_id: Uuid,
        filters: &OfferFilters,
    ) -> Result<Vec<OfferWithDetails>, AppError> {
        let mut sql = format!(
            r#"
            SELECT {OFFER_DETAIL_COLUMNS}
            FROM offers o
            JOIN companies c ON c.id = o.company_id
            JOIN users u ON u.id = o.agent_id
            WHERE o.hotel_id = $1
            "#
        );

        let mut next_param = 2;
        if filters.status.is_some() {
            sql.push_str(&format!(" AND o.status = ${next_param}"));
            next_param += 1;
        }
        if filters.company_id.is_some() {
            sql.push_str(&format!(" AND o.company_id = ${next_param}"));
            next_param += 1;
        }
        if filters.agent_id.is_some() {
            sql.push_str(&format!(" AND o.agent_id = ${next_param}"));
        }
        sql.push_str(" ORDER BY o.follow_up_date ASC");

        let mut query = sqlx::query_as::<_, OfferWithDetails>(&sql).bind(hotel_id);
        if let Some(status) = filters.status {
            query = query.bind(status);
        }
        if let Some(company_id) = filters.company_id {
            query = query.bind(company_id);
        }
        if let Some(agent_id) = filters.agent_id {
            query = query.bind(agent_id);
        }

        let offers = query.fetch_all(&self.pool).await?;
        Ok(offers)
    }

    // Listagem completa para o CSV, da oferta mais nova para a mais antiga
    pub async fn list_for_export(
        &self,
        hotel_id: Uuid,
        agent_id: Option<Uuid>,
    ) -> Result<Vec<OfferWithDetails>, AppError> {
        let mut sql = format!(
            r#"
            SELECT {OFFER_DETAIL_COLUMNS}
            FROM offers o
            JOIN companies c ON c.id = o.company_id
            JOIN users u ON u.id = o.agent_id
            WHERE o.hotel_id = $1
            "#
        );
        if agent_id.is_some() {
            sql.push_str(" AND o.agent_id = $2");
        }
        sql.push_str(" ORDER BY o.created_at DESC");

        let mut query = sqlx::query_as::<_, OfferWithDetails>(&sql).bind(hotel_id);
        if let Some(agent_id) = agent_id {
            query = query.bind(agent_id);
        }

        let offers = query.fetch_all(&self.pool).await?;
        Ok(offers)
    }

    pub async fn find_in_hotel(&self, id: Uuid, hotel_id: Uuid) -> Result<Option<Offer>, AppError> {
        let maybe_offer =
            sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE id = $1 AND hotel_id = $2")
                .bind(id)
                .bind(hotel_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_offer)
    }

    pub async fn find_with_details(
        &self,
        id: Uuid,
        hotel_id: Uuid,
    ) -> Result<Option<OfferWithDetails>, AppError> {
        let sql = format!(
            r#"
            SELECT {OFFER_DETAIL_COLUMNS}
            FROM offers o
            JOIN companies c ON c.id = o.company_id
            JOIN users u ON u.id = o.agent_id
            WHERE o.id = $1 AND o.hotel_id = $2
            "#
        );
        let maybe_offer = sqlx::query_as::<_, OfferWithDetails>(&sql)
            .bind(id)
            .bind(hotel_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_offer)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        hotel_id: Uuid,
        company_id: Uuid,
        agent_id: Uuid,
        title: &str,
        status: OfferStatus,
        price: Option<&str>,
        amount: Option<Decimal>,
        currency: Currency,
        check_in_date: Option<NaiveDate>,
        check_out_date: Option<NaiveDate>,
        guest_count: Option<i32>,
        room_count: Option<i32>,
        meeting_room: Option<&str>,
        follow_up_date: NaiveDate,
    ) -> Result<Offer, AppError> {
        let offer = sqlx::query_as::<_, Offer>(
            r#"
            INSERT INTO offers (
                hotel_id, company_id, agent_id, title, status,
                price, amount, currency,
                check_in_date, check_out_date, guest_count, room_count, meeting_room,
                follow_up_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(hotel_id)
        .bind(company_id)
        .bind(agent_id)
        .bind(title)
        .bind(status)
        .bind(price)
        .bind(amount)
        .bind(currency)
        .bind(check_in_date)
        .bind(check_out_date)
        .bind(guest_count)
        .bind(room_count)
        .bind(meeting_room)
        .bind(follow_up_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(offer)
    }

    // Grava a oferta já com os campos resolvidos pelo serviço.
    // Título, firma e agent_id nunca mudam depois da criação.
    pub async fn update(&self, offer: &Offer) -> Result<Option<Offer>, AppError> {
        let maybe_offer = sqlx::query_as::<_, Offer>(
            r#"
            UPDATE offers SET
                status = $1, follow_up_date = $2,
                price = $3, amount = $4, currency = $5,
                check_in_date = $6, check_out_date = $7,
                guest_count = $8, room_count = $9, meeting_room = $10,
                lost_reason = $11, approved_at = $12
            WHERE id = $13 AND hotel_id = $14
            RETURNING *
            "#,
        )
        .bind(offer.status)
        .bind(offer.follow_up_date)
        .bind(offer.price.as_deref())
        .bind(offer.amount)
        .bind(offer.currency)
        .bind(offer.check_in_date)
        .bind(offer.check_out_date)
        .bind(offer.guest_count)
        .bind(offer.room_count)
        .bind(offer.meeting_room.as_deref())
        .bind(offer.lost_reason.as_deref())
        .bind(offer.approved_at)
        .bind(offer.id)
        .bind(offer.hotel_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_offer)
    }

    pub async fn delete(&self, id: Uuid, hotel_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM offers WHERE id = $1 AND hotel_id = $2")
            .bind(id)
            .bind(hotel_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // --- NOTAS ---

    pub async fn add_note(
        &self,
        offer_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<Note, AppError> {
        let note = sqlx::query_as::<_, Note>(
            "INSERT INTO notes (offer_id, user_id, content) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(offer_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(note)
    }

    // Notas da oferta, da mais recente para a mais antiga
    pub async fn list_notes(&self, offer_id: Uuid) -> Result<Vec<NoteWithAuthor>, AppError> {
        let notes = sqlx::query_as::<_, NoteWithAuthor>(
            r#"
            SELECT n.id, n.offer_id, n.user_id, n.content, n.created_at,
                   u.name AS user_name
            FROM notes n
            JOIN users u ON u.id = n.user_id
            WHERE n.offer_id = $1
            ORDER BY n.created_at DESC
            "#,
        )
        .bind(offer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }
}
