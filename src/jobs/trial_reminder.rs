use chrono::{Duration, Utc};

use crate::db::tenancy_repo::HotelRepository;
use crate::services::email_service::Mailer;

// Lembretes de trial: avisa os admins dos hotéis cujo período de teste
// está acabando (próximas 24h) ou já acabou, sempre sem assinatura ativa.
// Erros de e-mail individuais não interrompem o restante da varredura.

pub async fn check_trials_ending(hotel_repo: &HotelRepository, mailer: &Mailer) {
    let now = Utc::now();
    let rows = match hotel_repo.trials_ending_between(now, now + Duration::hours(24)).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("❌ Falha ao buscar trials expirando: {:?}", e);
            return;
        }
    };

    if rows.is_empty() {
        tracing::info!("⏰ Nenhum trial expirando nas próximas 24h");
        return;
    }

    tracing::info!("⏰ {} trial(s) expirando nas próximas 24h", rows.len());
    for row in rows {
        match mailer.send_trial_ending(&row.admin_email, &row.hotel_name).await {
            Ok(()) => tracing::info!("📧 Aviso de trial expirando enviado: {}", row.admin_email),
            Err(e) => tracing::warn!(
                "⚠️ Falha ao avisar {} ({}): {:?}",
                row.admin_email,
                row.hotel_name,
                e
            ),
        }
    }
}

pub async fn check_trials_ended(hotel_repo: &HotelRepository, mailer: &Mailer) {
    let now = Utc::now();
    let rows = match hotel_repo.trials_ended(now).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("❌ Falha ao buscar trials vencidos: {:?}", e);
            return;
        }
    };

    if rows.is_empty() {
        return;
    }

    tracing::info!("⏰ {} hotel(is) com trial vencido e sem assinatura", rows.len());
    for row in rows {
        match mailer.send_trial_ended(&row.admin_email, &row.hotel_name).await {
            Ok(()) => tracing::info!("📧 Aviso de trial vencido enviado: {}", row.admin_email),
            Err(e) => tracing::warn!(
                "⚠️ Falha ao avisar {} ({}): {:?}",
                row.admin_email,
                row.hotel_name,
                e
            ),
        }
    }
}

pub async fn run_daily_checks(hotel_repo: &HotelRepository, mailer: &Mailer) {
    tracing::info!("🔄 Rodando verificações diárias de trial...");
    check_trials_ending(hotel_repo, mailer).await;
    check_trials_ended(hotel_repo, mailer).await;
    tracing::info!("✅ Verificações diárias concluídas");
}
