// src/db/company_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::company::{Company, CompanyType};

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_hotel(&self, hotel_id: Uuid) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE hotel_id = $1 ORDER BY name ASC",
        )
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    pub async fn find_in_hotel(
        &self,
        id: Uuid,
        hotel_id: Uuid,
    ) -> Result<Option<Company>, AppError> {
        let maybe_company =
            sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1 AND hotel_id = $2")
                .bind(id)
                .bind(hotel_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_company)
    }

    pub async fn create(
        &self,
        hotel_id: Uuid,
        name: &str,
        company_type: CompanyType,
        contact_person: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Company, AppError> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (hotel_id, name, type, contact_person, phone, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(hotel_id)
        .bind(name)
        .bind(company_type)
        .bind(contact_person)
        .bind(phone)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(company)
    }

    // UPDATE escopado pelo tenant: retorna None se a firma for de outro hotel
    pub async fn update(
        &self,
        id: Uuid,
        hotel_id: Uuid,
        name: &str,
        company_type: CompanyType,
        contact_person: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<Company>, AppError> {
        let maybe_company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = $1, type = $2, contact_person = $3, phone = $4, email = $5
            WHERE id = $6 AND hotel_id = $7
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(company_type)
        .bind(contact_person)
        .bind(phone)
        .bind(email)
        .bind(id)
        .bind(hotel_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_company)
    }

    pub async fn delete(&self, id: Uuid, hotel_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1 AND hotel_id = $2")
            .bind(id)
            .bind(hotel_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
