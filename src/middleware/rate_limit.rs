// src/middleware/rate_limit.rs

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, State},
    middleware::Next,
    response::Response,
};
use parking_lot::RwLock;

use crate::{common::error::AppError, config::AppState};

// Janela deslizante por chave (endereço do cliente). Guarda os instantes das
// requisições dentro da janela; o que sair da janela é descartado na leitura.
pub struct SlidingWindow {
    window: Duration,
    max_hits: usize,
    hits: RwLock<HashMap<String, Vec<Instant>>>,
}

impl SlidingWindow {
    pub fn new(window: Duration, max_hits: usize) -> Self {
        Self {
            window,
            max_hits,
            hits: RwLock::new(HashMap::new()),
        }
    }

    // Registra uma tentativa. Retorna false quando a janela está cheia.
    pub fn try_acquire(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.write();
        let entries = hits.entry(key.to_string()).or_default();

        entries.retain(|t| now.duration_since(*t) < self.window);

        if entries.len() >= self.max_hits {
            return false;
        }
        entries.push(now);
        true
    }

    // Remove a tentativa mais recente. Usado no login: só as tentativas
    // FALHAS contam para o limite.
    pub fn forgive(&self, key: &str) {
        let mut hits = self.hits.write();
        if let Some(entries) = hits.get_mut(key) {
            entries.pop();
            if entries.is_empty() {
                hits.remove(key);
            }
        }
    }
}

// As cinco janelas do serviço, compartilhadas via Arc no AppState
#[derive(Clone)]
pub struct RateLimiters {
    pub general: Arc<SlidingWindow>,
    pub login: Arc<SlidingWindow>,
    pub register: Arc<SlidingWindow>,
    pub payment: Arc<SlidingWindow>,
    pub email: Arc<SlidingWindow>,
}

impl RateLimiters {
    pub fn new() -> Self {
        Self {
            general: Arc::new(SlidingWindow::new(Duration::from_secs(15 * 60), 100)),
            login: Arc::new(SlidingWindow::new(Duration::from_secs(15 * 60), 5)),
            register: Arc::new(SlidingWindow::new(Duration::from_secs(60 * 60), 3)),
            payment: Arc::new(SlidingWindow::new(Duration::from_secs(60 * 60), 10)),
            email: Arc::new(SlidingWindow::new(Duration::from_secs(60 * 60), 20)),
        }
    }
}

impl Default for RateLimiters {
    fn default() -> Self {
        Self::new()
    }
}

// Chave da janela: o endereço remoto da conexão
fn client_key(request: &axum::http::Request<axum::body::Body>) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

// --- OS MIDDLEWARES ---

pub async fn general_limit(
    State(app_state): State<AppState>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request);
    if !app_state.rate_limiters.general.try_acquire(&key) {
        return Err(AppError::RateLimited(
            "Çok fazla istek gönderdiniz. Lütfen daha sonra tekrar deneyin.",
        ));
    }
    Ok(next.run(request).await)
}

// Conta a tentativa antes de rodar o handler e perdoa se o login passou:
// só sequências de falhas derrubam a chave.
pub async fn login_limit(
    State(app_state): State<AppState>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request);
    if !app_state.rate_limiters.login.try_acquire(&key) {
        return Err(AppError::RateLimited(
            "Çok fazla başarısız giriş denemesi. 15 dakika sonra tekrar deneyin.",
        ));
    }

    let response = next.run(request).await;
    if response.status().is_success() {
        app_state.rate_limiters.login.forgive(&key);
    }
    Ok(response)
}

pub async fn register_limit(
    State(app_state): State<AppState>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request);
    if !app_state.rate_limiters.register.try_acquire(&key) {
        return Err(AppError::RateLimited(
            "Çok fazla kayıt denemesi. 1 saat sonra tekrar deneyin.",
        ));
    }
    Ok(next.run(request).await)
}

pub async fn payment_limit(
    State(app_state): State<AppState>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request);
    if !app_state.rate_limiters.payment.try_acquire(&key) {
        return Err(AppError::RateLimited(
            "Çok fazla ödeme denemesi. Lütfen daha sonra tekrar deneyin.",
        ));
    }
    Ok(next.run(request).await)
}

pub async fn email_limit(
    State(app_state): State<AppState>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request);
    if !app_state.rate_limiters.email.try_acquire(&key) {
        return Err(AppError::RateLimited(
            "Çok fazla e-posta isteği. Lütfen daha sonra tekrar deneyin.",
        ));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn janela_bloqueia_no_limite() {
        let window = SlidingWindow::new(Duration::from_secs(60), 3);

        assert!(window.try_acquire("10.0.0.1"));
        assert!(window.try_acquire("10.0.0.1"));
        assert!(window.try_acquire("10.0.0.1"));
        assert!(!window.try_acquire("10.0.0.1"));
    }

    #[test]
    fn chaves_diferentes_nao_interferem() {
        let window = SlidingWindow::new(Duration::from_secs(60), 1);

        assert!(window.try_acquire("10.0.0.1"));
        assert!(!window.try_acquire("10.0.0.1"));
        assert!(window.try_acquire("10.0.0.2"));
    }

    #[test]
    fn perdoar_devolve_um_espaco_na_janela() {
        let window = SlidingWindow::new(Duration::from_secs(60), 2);

        assert!(window.try_acquire("10.0.0.1"));
        assert!(window.try_acquire("10.0.0.1"));
        assert!(!window.try_acquire("10.0.0.1"));

        window.forgive("10.0.0.1");
        assert!(window.try_acquire("10.0.0.1"));
    }

    #[test]
    fn janela_expirada_libera_a_chave() {
        let window = SlidingWindow::new(Duration::from_millis(20), 1);

        assert!(window.try_acquire("10.0.0.1"));
        assert!(!window.try_acquire("10.0.0.1"));

        std::thread::sleep(Duration::from_millis(30));
        assert!(window.try_acquire("10.0.0.1"));
    }
}
