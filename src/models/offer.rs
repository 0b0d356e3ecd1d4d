// src/models/offer.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

// Mapeia o CREATE TYPE offer_status do banco.
// 'approved' e 'lost' são estados terminais do funil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "offer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Sent,     // Gönderildi
    Waiting,  // Beklemede
    Revised,  // Revize
    Approved, // Onaylandı
    Lost,     // Kaybedildi
}

impl OfferStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OfferStatus::Approved | OfferStatus::Lost)
    }

    // Valor cru gravado no banco, usado também no CSV
    pub fn as_str(self) -> &'static str {
        match self {
            OfferStatus::Sent => "sent",
            OfferStatus::Waiting => "waiting",
            OfferStatus::Revised => "revised",
            OfferStatus::Approved => "approved",
            OfferStatus::Lost => "lost",
        }
    }
}

// Mapeia o CREATE TYPE currency_code do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "currency_code", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Try,
    Eur,
    Usd,
}

impl Currency {
    pub fn as_str(self) -> &'static str {
        match self {
            Currency::Try => "TRY",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Try
    }
}

// --- OFERTA (O item do funil) ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub company_id: Uuid,
    pub agent_id: Uuid,

    // Categoria livre da proposta: Konaklama, Toplantı, Düğün...
    pub title: String,
    pub status: OfferStatus,
    pub lost_reason: Option<String>,

    pub price: Option<String>,   // String de exibição ("125.000 TL")
    pub amount: Option<Decimal>, // Valor numérico agregável
    pub currency: Currency,

    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub guest_count: Option<i32>,
    pub room_count: Option<i32>,
    pub meeting_room: Option<String>,

    // Data combinada para recontatar o cliente. Obrigatória: é o coração do radar.
    pub follow_up_date: NaiveDate,

    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Oferta com os nomes resolvidos de firma e vendedor (shape das listagens)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferWithDetails {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub company_id: Uuid,
    pub agent_id: Uuid,
    pub title: String,
    pub status: OfferStatus,
    pub lost_reason: Option<String>,
    pub price: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Currency,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub guest_count: Option<i32>,
    pub room_count: Option<i32>,
    pub meeting_room: Option<String>,
    pub follow_up_date: NaiveDate,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,

    pub company_name: String,
    pub agent_name: String,
}

// --- PAYLOADS ---

// O título, a firma e o vendedor ficam fixos depois da criação;
// por isso só aparecem aqui.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferPayload {
    pub company_id: Uuid,
    #[validate(length(min = 1, message = "Teklif türü boş olamaz."))]
    pub title: String,
    #[serde(default = "default_status")]
    pub status: OfferStatus,
    pub price: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Currency,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub guest_count: Option<i32>,
    pub room_count: Option<i32>,
    pub meeting_room: Option<String>,
    pub follow_up_date: NaiveDate,
}

fn default_status() -> OfferStatus {
    OfferStatus::Sent
}

// Atualização por sobrescrita: cada campo abaixo passa a valer o que veio
// no payload (ausente = NULL), nunca há mescla com o valor anterior.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfferPayload {
    pub status: OfferStatus,
    pub follow_up_date: NaiveDate,
    pub price: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Currency,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub guest_count: Option<i32>,
    pub room_count: Option<i32>,
    pub meeting_room: Option<String>,
    pub lost_reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    #[validate(length(min = 1, message = "Not içeriği boş olamaz."))]
    pub content: String,
}

// --- NOTAS ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteWithAuthor {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
}
