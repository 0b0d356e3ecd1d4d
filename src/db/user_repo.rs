// src/db/user_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::auth::{PasswordReset, Role, User};

// O repositório de usuários, responsável pelas tabelas 'users' e 'password_resets'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail (global: e-mail é único no sistema inteiro)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca escopada pelo tenant: usuário de outro hotel "não existe"
    pub async fn find_in_hotel(&self, id: Uuid, hotel_id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND hotel_id = $2")
                .bind(id)
                .bind(hotel_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_user)
    }

    pub async fn list_by_hotel(&self, hotel_id: Uuid) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE hotel_id = $1 ORDER BY created_at ASC",
        )
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    // Cria um novo usuário. Aceita executor para participar de transações
    // (registro de hotel, convite com checagem de quota).
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        hotel_id: Uuid,
        email: &str,
        password_hash: &str,
        name: &str,
        role: Role,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (hotel_id, email, password_hash, name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(hotel_id)
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    // Atualização administrativa (nome, e-mail, papel), escopada pelo tenant
    pub async fn update_user(
        &self,
        user_id: Uuid,
        hotel_id: Uuid,
        name: &str,
        email: &str,
        role: Role,
    ) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET name = $1, email = $2, role = $3
            WHERE id = $4 AND hotel_id = $5
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(role)
        .bind(user_id)
        .bind(hotel_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    pub async fn count_in_hotel<'e, E>(&self, executor: E, hotel_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE hotel_id = $1")
            .bind(hotel_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    pub async fn update_password<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Liga/desliga o acesso sem apagar o histórico do vendedor
    pub async fn set_active(
        &self,
        user_id: Uuid,
        hotel_id: Uuid,
        active: bool,
    ) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            "UPDATE users SET active = $1 WHERE id = $2 AND hotel_id = $3 RETURNING *",
        )
        .bind(active)
        .bind(user_id)
        .bind(hotel_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn delete(&self, user_id: Uuid, hotel_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND hotel_id = $2")
            .bind(user_id)
            .bind(hotel_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // --- TOKENS DE RESET DE SENHA ---

    pub async fn create_password_reset(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordReset, AppError> {
        let reset = sqlx::query_as::<_, PasswordReset>(
            r#"
            INSERT INTO password_resets (user_id, token, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(reset)
    }

    // Consome o token de forma atômica: o UPDATE condicional garante o uso único
    // mesmo com dois resets concorrentes segurando o mesmo token.
    pub async fn claim_password_reset<'e, E>(
        &self,
        executor: E,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordReset>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let claimed = sqlx::query_as::<_, PasswordReset>(
            r#"
            UPDATE password_resets
            SET used = TRUE
            WHERE token = $1 AND used = FALSE AND expires_at > $2
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(executor)
        .await?;
        Ok(claimed)
    }
}
