// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Mapeia o CREATE TYPE company_type do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "company_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CompanyType {
    Agency,  // Acenta
    Company, // Firma
}

impl Default for CompanyType {
    fn default() -> Self {
        CompanyType::Company
    }
}

// Cliente do hotel: acenta ou firma corporativa
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub company_type: CompanyType,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Mesmo shape para criação e edição
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPayload {
    #[validate(length(min = 1, message = "Firma adı boş olamaz."))]
    pub name: String,
    #[serde(rename = "type", default)]
    pub company_type: CompanyType,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Geçerli bir e-posta adresi girin."))]
    pub email: Option<String>,
}
