// src/models/report.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::offer::{Currency, OfferStatus};

// Período pedido na URL: /reports/{period}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Weekly,
    Monthly,
    Yearly,
}

impl ReportPeriod {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "weekly" => Some(ReportPeriod::Weekly),
            "monthly" => Some(ReportPeriod::Monthly),
            "yearly" => Some(ReportPeriod::Yearly),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportPeriod::Weekly => "weekly",
            ReportPeriod::Monthly => "monthly",
            ReportPeriod::Yearly => "yearly",
        }
    }
}

// --- LINHAS AGREGADAS ---

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyTotal {
    pub currency: Currency,
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyAverage {
    pub currency: Currency,
    pub avg_value: Decimal,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: OfferStatus,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopAgentEntry {
    pub agent_name: String,
    pub total_count: i64,
    pub approved_count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopCompanyEntry {
    pub company_name: String,
    pub offer_count: i64,
    pub approved_count: i64,
}

// --- O RELATÓRIO ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

// Relatório consolidado de um período (ofertas com created_at em [start, end))
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub period: String,
    pub date_range: DateRange,

    pub total_offers: i64,
    pub approved_offers: i64,
    pub pending_offers: i64, // Abertas: sent + waiting + revised
    pub lost_offers: i64,

    pub revenue_by_currency: Vec<CurrencyTotal>,           // Aprovadas
    pub potential_revenue_by_currency: Vec<CurrencyTotal>, // Abertas
    pub avg_offer_value_by_currency: Vec<CurrencyAverage>,

    pub status_breakdown: Vec<StatusCount>,
    pub top_agents: Vec<TopAgentEntry>,
    pub top_companies: Vec<TopCompanyEntry>,

    pub total_guests: i64,
    pub total_rooms: i64,
}
