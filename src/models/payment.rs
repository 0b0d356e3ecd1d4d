// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::offer::Currency;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "package_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    Yearly,     // Plano anual (4 assentos inclusos)
    ExtraUsers, // Assentos adicionais
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    Refunded,
}

// --- LEDGER ---

// Uma linha do registro de cobranças. Append-only.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub user_id: Option<Uuid>,
    pub payment_id: String, // Identificador no gateway externo
    pub conversation_id: Option<String>,
    pub amount: Decimal,
    pub currency: Currency,
    pub package_type: PackageType,
    pub extra_users: i32,
    pub status: PaymentStatus,
    pub payment_date: DateTime<Utc>,
    pub refund_date: Option<DateTime<Utc>>,
}

// Linha do histórico com o nome de quem pagou
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWithUser {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub user_id: Option<Uuid>,
    pub payment_id: String,
    pub conversation_id: Option<String>,
    pub amount: Decimal,
    pub currency: Currency,
    pub package_type: PackageType,
    pub extra_users: i32,
    pub status: PaymentStatus,
    pub payment_date: DateTime<Utc>,
    pub refund_date: Option<DateTime<Utc>>,
    pub user_name: Option<String>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculatePricePayload {
    pub package_type: PackageType,
    #[serde(default)]
    pub extra_users: i32,
}

// Dados do cartão seguem direto para o gateway, nunca são persistidos
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionPayload {
    pub package_type: PackageType,
    #[serde(default)]
    pub extra_users: i32,
    pub card_holder_name: Option<String>,
    pub card_number: Option<String>,
    pub expire_month: Option<String>,
    pub expire_year: Option<String>,
    pub cvc: Option<String>,
    pub user_phone: Option<String>,
    pub user_address: Option<String>,
    pub user_city: Option<String>,
}

// --- RESPOSTAS ---

// Orçamento calculado no servidor (o preço nunca vem do cliente).
// Valores como strings com 2 casas, prontos para exibição.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub item_name: String,
    pub base_price: String,
    pub kdv: String,
    pub total: String,
    pub currency: Currency,
}

// Resposta de uma cobrança bem-sucedida
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub success: bool,
    pub message: String,
    pub demo: bool,
    pub payment_id: String,
    pub subscription_ends_at: Option<DateTime<Utc>>,
}
