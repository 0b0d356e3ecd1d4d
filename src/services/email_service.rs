// src/services/email_service.rs

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::common::error::AppError;

// Transporte SMTP e os e-mails do produto. Sem EMAIL_USER configurado
// (ou com a conta demo), entra em modo demo: o e-mail vira uma linha de
// log e a operação segue normalmente.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
    app_url: String,
    payment_url: String,
}

const DEMO_ACCOUNT: &str = "demo@satisradar.com";

impl Mailer {
    pub fn from_env() -> Self {
        let from = std::env::var("EMAIL_FROM")
            .unwrap_or_else(|_| "Satış Radar <noreply@satisradar.com>".to_string());
        let app_url =
            std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let payment_url = std::env::var("PAYMENT_URL")
            .unwrap_or_else(|_| "http://localhost:3000/subscription".to_string());

        let email_user = std::env::var("EMAIL_USER").ok();
        let transport = match email_user {
            Some(user) if user != DEMO_ACCOUNT => {
                let host = std::env::var("EMAIL_HOST")
                    .unwrap_or_else(|_| "smtp.gmail.com".to_string());
                let port: u16 = std::env::var("EMAIL_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587);
                let pass = std::env::var("EMAIL_PASS").unwrap_or_default();

                match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host) {
                    Ok(builder) => {
                        tracing::info!("📧 SMTP configurado: {}:{}", host, port);
                        Some(
                            builder
                                .port(port)
                                .credentials(Credentials::new(user, pass))
                                .build(),
                        )
                    }
                    Err(e) => {
                        tracing::warn!("📧 SMTP inválido ({}), caindo para modo demo: {}", host, e);
                        None
                    }
                }
            }
            _ => {
                tracing::info!("📧 SMTP não configurado, e-mails em modo demo (log)");
                None
            }
        };

        Self {
            transport,
            from,
            app_url,
            payment_url,
        }
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), AppError> {
        let Some(transport) = &self.transport else {
            tracing::info!("📧 [DEMO] para={} assunto={}", to, subject);
            tracing::debug!("📧 [DEMO] corpo: {}", body);
            return Ok(());
        };

        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| AppError::EmailError(format!("remetente inválido: {e}")))?;
        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::EmailError(format!("destinatário inválido: {e}")))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .body(body)
            .map_err(|e| AppError::EmailError(e.to_string()))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::EmailError(e.to_string()))?;

        Ok(())
    }

    // --- OS E-MAILS DO PRODUTO (conteúdo em turco) ---

    pub async fn send_welcome(
        &self,
        to: &str,
        name: &str,
        hotel_name: &str,
    ) -> Result<(), AppError> {
        let subject = format!("{hotel_name} - Satış Radar'a Hoş Geldiniz! 🎉");
        let body = format!(
            "Merhaba {name},\n\n\
             Satış Radar'a hoş geldiniz! 🎉\n\n\
             {hotel_name} için 7 günlük ücretsiz deneme süreniz başladı.\n\n\
             Hemen başlayın:\n\
             - Follow-up'larınızı ekleyin ve takip edin\n\
             - Firma ve acenta bilgilerinizi kaydedin\n\
             - Ekip üyelerinizi davet edin (4 kullanıcı dahil)\n\
             - Raporlarınızı görüntüleyin\n\n\
             Hemen başlamak için: {}\n\n\
             Yardıma mı ihtiyacınız var? Bize destek@satisradar.com adresinden ulaşabilirsiniz.\n\n\
             İyi satışlar dileriz,\nSatış Radar Ekibi",
            self.app_url
        );
        self.send(to, &subject, body).await
    }

    pub async fn send_user_invite(
        &self,
        to: &str,
        name: &str,
        hotel_name: &str,
        inviter_name: &str,
        temp_password: &str,
    ) -> Result<(), AppError> {
        let subject = format!("{hotel_name} - Satış Radar'a Davet Edildiniz");
        let body = format!(
            "Merhaba {name},\n\n\
             {inviter_name} sizi {hotel_name} ekibine Satış Radar'a davet etti! 🎉\n\n\
             Giriş Bilgileriniz:\n\
             E-posta: {to}\n\
             Geçici Şifre: {temp_password}\n\n\
             ⚠️ İlk girişinizde şifrenizi değiştirmenizi öneririz.\n\n\
             Giriş yapmak için: {}/login\n\n\
             Sorularınız için: destek@satisradar.com\n\n\
             İyi satışlar dileriz,\nSatış Radar Ekibi",
            self.app_url
        );
        self.send(to, &subject, body).await
    }

    pub async fn send_password_reset(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> Result<(), AppError> {
        let reset_url = format!("{}/reset-password?token={}", self.app_url, token);
        let body = format!(
            "Merhaba {name},\n\n\
             Şifre sıfırlama talebiniz alındı. Aşağıdaki linke tıklayarak yeni \
             şifrenizi oluşturabilirsiniz.\n\n{reset_url}\n\n\
             ⚠️ Bu link 1 saat geçerlidir. Eğer şifre sıfırlama talebinde \
             bulunmadıysanız, bu e-postayı görmezden gelebilirsiniz.\n\n\
             İyi satışlar dileriz,\nSatış Radar Ekibi"
        );
        self.send(to, "Satış Radar - Şifre Sıfırlama", body).await
    }

    pub async fn send_trial_ending(&self, to: &str, hotel_name: &str) -> Result<(), AppError> {
        let subject = format!("{hotel_name} - Satış Radar Deneme Süreniz Sona Eriyor");
        let body = format!(
            "Merhaba {hotel_name} ekibi,\n\n\
             Satış Radar 7 günlük deneme süreniz bugün sona eriyor ⏳\n\n\
             Deneme boyunca:\n\
             - Follow-up'larınızı tek ekranda yönettiniz\n\
             - Tekliflerinizi ve gelir potansiyelinizi takip ettiniz\n\
             - Ekibinizin performansını raporladınız\n\n\
             Kullanmaya devam etmek için yıllık aboneliğinizi şimdi kolayca başlatabilirsiniz.\n\n\
             🔹 Yıllık Paket: 1.990 TL + KDV (4 kullanıcı dahil)\n\
             🔹 Ek Kullanıcı: 350 TL + KDV / yıl\n\n\
             👉 Aboneliği başlatmak için: {}\n\n\
             Herhangi bir sorunuz olursa bize dilediğiniz zaman ulaşabilirsiniz.\n\n\
             İyi satışlar dileriz,\nSatış Radar Ekibi",
            self.payment_url
        );
        self.send(to, &subject, body).await
    }

    pub async fn send_trial_ended(&self, to: &str, hotel_name: &str) -> Result<(), AppError> {
        let subject = format!("{hotel_name} - Satış Radar Deneme Süreniz Sona Erdi");
        let body = format!(
            "Merhaba {hotel_name} ekibi,\n\n\
             Satış Radar 7 günlük deneme süreniz sona erdi.\n\n\
             Satış süreçlerinizi dijitalleştirmeye devam etmek için aboneliğinizi \
             başlatabilirsiniz.\n\n\
             🔹 Yıllık Paket: 1.990 TL + KDV (4 kullanıcı dahil)\n\
             🔹 Ek Kullanıcı: 350 TL + KDV / yıl\n\n\
             Aboneliği başlatmak için: {}\n\n\
             Sorularınız için: destek@satisradar.com\n\n\
             İyi satışlar dileriz,\nSatış Radar Ekibi",
            self.payment_url
        );
        self.send(to, &subject, body).await
    }
}
