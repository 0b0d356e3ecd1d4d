// src/services/payment_service.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::{HotelRepository, PaymentRepository};
use crate::models::auth::User;
use crate::models::offer::Currency;
use crate::models::payment::{
    PackageType, PaymentReceipt, PaymentStatus, PaymentWithUser, PriceQuote,
};
use crate::services::subscription_service::SUBSCRIPTION_DAYS;

// Preços do plano em TL, sem KDV
const YEARLY_BASE_PRICE: i64 = 1990;
const EXTRA_USER_PRICE: i64 = 350;

// KDV de 20% sobre tudo
fn kdv_rate() -> Decimal {
    Decimal::new(20, 2)
}

// Valor monetário como string com duas casas, pronto para exibição
fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

// Preço base e nome do item de um pacote. O preço NUNCA vem do cliente.
fn price_parts(package_type: PackageType, extra_users: i32) -> (Decimal, String) {
    match package_type {
        PackageType::Yearly => (
            Decimal::from(YEARLY_BASE_PRICE),
            "Yıllık Abonelik (4 kullanıcı dahil)".to_string(),
        ),
        PackageType::ExtraUsers => (
            Decimal::from(EXTRA_USER_PRICE) * Decimal::from(extra_users),
            format!("Ek Kullanıcı ({extra_users} kişi)"),
        ),
    }
}

// Orçamento calculado no servidor: base, KDV e total em TRY
pub fn quote(package_type: PackageType, extra_users: i32) -> PriceQuote {
    let (base, item_name) = price_parts(package_type, extra_users);
    let kdv = base * kdv_rate();
    let total = base + kdv;

    PriceQuote {
        item_name,
        base_price: money(base),
        kdv: money(kdv),
        total: money(total),
        currency: Currency::Try,
    }
}

// --- GATEWAY ---

#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub conversation_id: String,
    pub item_name: String,
    pub total: Decimal,
    pub currency: Currency,
    pub buyer_email: String,
    pub buyer_name: String,
}

#[derive(Debug, Clone)]
pub struct ChargeOutcome {
    pub payment_id: String,
}

// Contrato mínimo com o provedor de pagamento. A cobrança acontece ANTES
// de qualquer escrita no banco: se o gateway recusar, nada muda aqui.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: &ChargeRequest) -> Result<ChargeOutcome, AppError>;
    fn is_demo(&self) -> bool;
}

// Gateway simulado. Aprova qualquer cobrança e devolve um id DEMO-{millis}.
pub struct DemoGateway;

#[async_trait]
impl PaymentGateway for DemoGateway {
    async fn charge(&self, request: &ChargeRequest) -> Result<ChargeOutcome, AppError> {
        tracing::info!(
            "💳 DEMO - Cobrança simulada: {} {:?} ({})",
            money(request.total),
            request.currency,
            request.item_name
        );

        Ok(ChargeOutcome {
            payment_id: format!("DEMO-{}", Utc::now().timestamp_millis()),
        })
    }

    fn is_demo(&self) -> bool {
        true
    }
}

// --- SERVIÇO ---

#[derive(Clone)]
pub struct PaymentService {
    pool: PgPool,
    payment_repo: PaymentRepository,
    hotel_repo: HotelRepository,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentService {
    pub fn new(
        pool: PgPool,
        payment_repo: PaymentRepository,
        hotel_repo: HotelRepository,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            pool,
            payment_repo,
            hotel_repo,
            gateway,
        }
    }

    // Cobra o pacote e, se o gateway aprovar, aplica o efeito na assinatura
    // e registra a linha no ledger, tudo na mesma transação.
    pub async fn create_subscription(
        &self,
        user: &User,
        package_type: PackageType,
        extra_users: i32,
    ) -> Result<PaymentReceipt, AppError> {
        let hotel = self
            .hotel_repo
            .find_by_id(user.hotel_id)
            .await?
            .ok_or(AppError::NotFound("Otel bulunamadı."))?;

        let (base, item_name) = price_parts(package_type, extra_users);
        let total = base + base * kdv_rate();
        let conversation_id = format!("SUB-{}-{}", hotel.id, Utc::now().timestamp_millis());

        let outcome = self
            .gateway
            .charge(&ChargeRequest {
                conversation_id: conversation_id.clone(),
                item_name,
                total,
                currency: Currency::Try,
                buyer_email: user.email.clone(),
                buyer_name: user.name.clone(),
            })
            .await?;

        let mut tx = self.pool.begin().await?;

        // Relê com lock: compras concorrentes do mesmo hotel entram em fila
        self.hotel_repo
            .find_by_id_for_update(&mut *tx, hotel.id)
            .await?
            .ok_or(AppError::NotFound("Otel bulunamadı."))?;

        let subscription_ends_at = match package_type {
            PackageType::Yearly => {
                let ends_at = Utc::now() + Duration::days(SUBSCRIPTION_DAYS);
                self.hotel_repo
                    .activate_subscription(&mut *tx, hotel.id, ends_at)
                    .await?;
                Some(ends_at)
            }
            PackageType::ExtraUsers => {
                self.hotel_repo
                    .add_extra_users(&mut *tx, hotel.id, extra_users)
                    .await?;
                None
            }
        };

        self.payment_repo
            .insert(
                &mut *tx,
                hotel.id,
                user.id,
                &outcome.payment_id,
                &conversation_id,
                total.round_dp(2),
                Currency::Try,
                package_type,
                extra_users,
                PaymentStatus::Success,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "✅ Pagamento registrado: hotel={} pacote={:?} id={}",
            hotel.id,
            package_type,
            outcome.payment_id
        );

        Ok(PaymentReceipt {
            success: true,
            message: "Ödeme başarılı".to_string(),
            demo: self.gateway.is_demo(),
            payment_id: outcome.payment_id,
            subscription_ends_at,
        })
    }

    pub async fn history(&self, hotel_id: Uuid) -> Result<Vec<PaymentWithUser>, AppError> {
        self.payment_repo.history(hotel_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anual_custa_1990_mais_kdv() {
        let q = quote(PackageType::Yearly, 0);

        assert_eq!(q.item_name, "Yıllık Abonelik (4 kullanıcı dahil)");
        assert_eq!(q.base_price, "1990.00");
        assert_eq!(q.kdv, "398.00");
        assert_eq!(q.total, "2388.00");
        assert_eq!(q.currency, Currency::Try);
    }

    #[test]
    fn extras_custam_350_por_assento() {
        let q = quote(PackageType::ExtraUsers, 3);

        assert_eq!(q.item_name, "Ek Kullanıcı (3 kişi)");
        assert_eq!(q.base_price, "1050.00");
        assert_eq!(q.kdv, "210.00");
        assert_eq!(q.total, "1260.00");
    }

    #[test]
    fn zero_extras_orcam_zero() {
        let q = quote(PackageType::ExtraUsers, 0);

        assert_eq!(q.base_price, "0.00");
        assert_eq!(q.total, "0.00");
    }

    #[test]
    fn valores_sempre_saem_com_duas_casas() {
        assert_eq!(money(Decimal::from(1990)), "1990.00");
        assert_eq!(money(Decimal::new(3985, 1)), "398.50");
        assert_eq!(money(Decimal::new(123456, 3)), "123.46");
    }
}
