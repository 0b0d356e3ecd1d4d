use std::time::Duration;

use crate::db::tenancy_repo::HotelRepository;
use crate::jobs::trial_reminder;
use crate::services::email_service::Mailer;

const DAILY: Duration = Duration::from_secs(24 * 60 * 60);

// Agendador dos jobs periódicos. O primeiro tick do interval dispara
// imediatamente, então a varredura roda já na subida do servidor.
pub fn start(hotel_repo: HotelRepository, mailer: Mailer) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(DAILY);
        tracing::info!("⏰ Agendador iniciado (verificações de trial a cada 24h)");
        loop {
            ticker.tick().await;
            trial_reminder::run_daily_checks(&hotel_repo, &mailer).await;
        }
    });
}
