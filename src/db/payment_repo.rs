// src/db/payment_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::offer::Currency;
use crate::models::payment::{PackageType, Payment, PaymentStatus, PaymentWithUser};

// Repositório do registro de cobranças. Só insere e lê: o histórico
// financeiro nunca é alterado nem apagado pela aplicação.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        hotel_id: Uuid,
        user_id: Uuid,
        payment_id: &str,
        conversation_id: &str,
        amount: Decimal,
        currency: Currency,
        package_type: PackageType,
        extra_users: i32,
        status: PaymentStatus,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                hotel_id, user_id, payment_id, conversation_id,
                amount, currency, package_type, extra_users, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(hotel_id)
        .bind(user_id)
        .bind(payment_id)
        .bind(conversation_id)
        .bind(amount)
        .bind(currency)
        .bind(package_type)
        .bind(extra_users)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(payment)
    }

    // Histórico do hotel, mais recente primeiro. LEFT JOIN: a linha do ledger
    // sobrevive mesmo se o usuário que pagou for removido.
    pub async fn history(&self, hotel_id: Uuid) -> Result<Vec<PaymentWithUser>, AppError> {
        let payments = sqlx::query_as::<_, PaymentWithUser>(
            r#"
            SELECT p.id, p.hotel_id, p.user_id, p.payment_id, p.conversation_id,
                   p.amount, p.currency, p.package_type, p.extra_users, p.status,
                   p.payment_date, p.refund_date,
                   u.name AS user_name
            FROM payments p
            LEFT JOIN users u ON u.id = p.user_id
            WHERE p.hotel_id = $1
            ORDER BY p.payment_date DESC
            "#,
        )
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }
}
