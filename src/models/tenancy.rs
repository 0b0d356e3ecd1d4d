// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// Hotel (O Tenant)
// ---
// A conta principal. Todos os dados de negócio pertencem a um hotel,
// e as janelas de trial/assinatura vivem aqui.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,

    // Assentos: 4 inclusos no plano base + extras comprados
    pub included_users: i32,
    pub extra_users: i32,

    pub trial_ends_at: Option<DateTime<Utc>>,
    pub subscription_ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Hotel + contagem de usuários, para a tela de assinatura
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotelInfo {
    pub id: Uuid,
    pub name: String,
    pub included_users: i32,
    pub extra_users: i32,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub subscription_ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub total_users: i64,
}
