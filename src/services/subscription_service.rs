// src/services/subscription_service.rs

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::HotelRepository,
    models::tenancy::{Hotel, HotelInfo},
};

pub const SUBSCRIPTION_DAYS: i64 = 365;

// Estado de acesso do tenant. Avaliado por requisição guardada,
// nunca gravado: as duas datas do hotel são a fonte da verdade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    ActiveTrial,
    ActiveSubscription,
    Expired,
}

impl SubscriptionState {
    pub fn allows_access(self) -> bool {
        !matches!(self, SubscriptionState::Expired)
    }
}

// As janelas são independentes: trial vencido + assinatura vigente
// continua sendo acesso liberado.
pub fn evaluate(
    trial_ends_at: Option<DateTime<Utc>>,
    subscription_ends_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> SubscriptionState {
    if trial_ends_at.is_some_and(|t| now < t) {
        return SubscriptionState::ActiveTrial;
    }
    if subscription_ends_at.is_some_and(|s| now < s) {
        return SubscriptionState::ActiveSubscription;
    }
    SubscriptionState::Expired
}

#[derive(Clone)]
pub struct SubscriptionService {
    hotel_repo: HotelRepository,
    pool: PgPool,
}

impl SubscriptionService {
    pub fn new(hotel_repo: HotelRepository, pool: PgPool) -> Self {
        Self { hotel_repo, pool }
    }

    // Usado pelo portão de assinatura em toda rota de dados de negócio
    pub async fn assert_active(&self, hotel_id: Uuid) -> Result<(), AppError> {
        let hotel = self
            .hotel_repo
            .find_by_id(hotel_id)
            .await?
            .ok_or(AppError::NotFound("Otel bulunamadı."))?;

        let state = evaluate(hotel.trial_ends_at, hotel.subscription_ends_at, Utc::now());
        if !state.allows_access() {
            return Err(AppError::SubscriptionExpired);
        }
        Ok(())
    }

    pub async fn hotel_info(&self, hotel_id: Uuid) -> Result<HotelInfo, AppError> {
        self.hotel_repo
            .info(hotel_id)
            .await?
            .ok_or(AppError::NotFound("Otel bulunamadı."))
    }

    // Escrita direta das janelas, sem passar pelo gateway de pagamento.
    // Sem data explícita, assume um ano a partir de agora. O contador de
    // extras é ABSOLUTO aqui (substitui), diferente da compra incremental.
    pub async fn subscribe(
        &self,
        hotel_id: Uuid,
        subscription_ends_at: Option<DateTime<Utc>>,
        extra_users: i32,
    ) -> Result<Hotel, AppError> {
        let ends_at =
            subscription_ends_at.unwrap_or_else(|| Utc::now() + Duration::days(SUBSCRIPTION_DAYS));

        let mut tx = self.pool.begin().await?;

        self.hotel_repo
            .activate_subscription(&mut *tx, hotel_id, ends_at)
            .await?;
        let hotel = self
            .hotel_repo
            .set_extra_users(&mut *tx, hotel_id, extra_users)
            .await?;

        tx.commit().await?;
        tracing::info!("📅 Assinatura do hotel {} ativa até {}", hotel_id, ends_at);
        Ok(hotel)
    }

    pub async fn purchase_extra_users(
        &self,
        hotel_id: Uuid,
        count: i32,
    ) -> Result<Hotel, AppError> {
        let hotel = self
            .hotel_repo
            .add_extra_users(&self.pool, hotel_id, count)
            .await?;
        tracing::info!("👥 Hotel {} agora com {} assentos extras", hotel_id, hotel.extra_users);
        Ok(hotel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn trial_vigente_libera_acesso() {
        let now = at(2025, 6, 10);
        let state = evaluate(Some(at(2025, 6, 15)), None, now);
        assert_eq!(state, SubscriptionState::ActiveTrial);
        assert!(state.allows_access());
    }

    #[test]
    fn trial_vencido_sem_assinatura_bloqueia() {
        let now = at(2025, 6, 20);
        let state = evaluate(Some(at(2025, 6, 15)), None, now);
        assert_eq!(state, SubscriptionState::Expired);
        assert!(!state.allows_access());
    }

    #[test]
    fn assinatura_vigente_vale_mesmo_com_trial_vencido() {
        let now = at(2025, 6, 20);
        let state = evaluate(Some(at(2025, 6, 15)), Some(at(2026, 6, 15)), now);
        assert_eq!(state, SubscriptionState::ActiveSubscription);
        assert!(state.allows_access());
    }

    #[test]
    fn assinatura_vencida_bloqueia() {
        let now = at(2026, 7, 1);
        let state = evaluate(Some(at(2025, 6, 15)), Some(at(2026, 6, 15)), now);
        assert_eq!(state, SubscriptionState::Expired);
    }

    #[test]
    fn sem_nenhuma_janela_bloqueia() {
        let state = evaluate(None, None, at(2025, 1, 1));
        assert_eq!(state, SubscriptionState::Expired);
    }

    #[test]
    fn limite_exato_da_janela_ja_e_expirado() {
        let boundary = at(2025, 6, 15);
        // now == trial_ends_at: a condição exige now < fim
        assert_eq!(evaluate(Some(boundary), None, boundary), SubscriptionState::Expired);
        assert_eq!(
            evaluate(None, Some(boundary), boundary),
            SubscriptionState::Expired
        );
    }
}
