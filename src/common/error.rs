use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As mensagens voltadas ao usuário são em turco (idioma do produto).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Token de reset inválido ou expirado")]
    ResetTokenInvalid,

    #[error("Conta desativada")]
    AccountDeactivated,

    // A mensagem varia conforme a regra violada (papel, dono, autoproteção)
    #[error("{0}")]
    Forbidden(&'static str),

    // Recurso inexistente OU de outro hotel: a resposta é a mesma
    // para não vazar a existência de dados de outros tenants.
    #[error("{0}")]
    NotFound(&'static str),

    #[error("Trial encerrado e sem assinatura ativa")]
    SubscriptionExpired,

    #[error("Limite de usuários atingido")]
    QuotaExceeded { limit: i32 },

    #[error("Pagamento recusado: {0}")]
    PaymentFailed(String),

    #[error("Limite de requisições excedido")]
    RateLimited(&'static str),

    #[error("Falha ao enviar e-mail: {0}")]
    EmailError(String),

    // Variante para erros de banco de dados (exemplo com sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo por campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Geçersiz veya eksik alanlar var.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            // 402 com a flag que o frontend usa para abrir a tela de assinatura.
            AppError::SubscriptionExpired => {
                let body = Json(json!({
                    "error": "Abonelik gerekli",
                    "message": "Deneme süreniz doldu. Devam etmek için abonelik satın alın.",
                    "trialEnded": true,
                }));
                return (StatusCode::PAYMENT_REQUIRED, body).into_response();
            }
            AppError::QuotaExceeded { limit } => {
                tracing::warn!("Convite bloqueado: limite de {limit} assentos atingido");
                let body = Json(json!({
                    "error": "Kullanıcı limitine ulaştınız",
                    "message": "Paketinize ek kullanıcı ekleyebilirsiniz",
                }));
                return (StatusCode::FORBIDDEN, body).into_response();
            }
            AppError::PaymentFailed(reason) => {
                let body = Json(json!({ "error": format!("Ödeme başarısız: {reason}") }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Bu e-posta adresi zaten kullanılıyor."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Geçersiz e-posta veya şifre."),
            AppError::ResetTokenInvalid => (StatusCode::BAD_REQUEST, "Geçersiz veya süresi dolmuş token."),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Geçersiz veya eksik kimlik doğrulama bilgisi."),
            AppError::AccountDeactivated => (
                StatusCode::FORBIDDEN,
                "Hesabınız deaktive edilmiş. Lütfen yöneticinizle iletişime geçin.",
            ),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::RateLimited(message) => (StatusCode::TOO_MANY_REQUESTS, message),
            AppError::EmailError(ref reason) => {
                tracing::error!("Falha no envio de e-mail: {}", reason);
                (StatusCode::INTERNAL_SERVER_ERROR, "E-posta gönderilemedi.")
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Beklenmeyen bir hata oluştu.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
