// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{distr::Alphanumeric, Rng};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{HotelRepository, UserRepository},
    models::auth::{AuthResponse, Claims, RegisterPayload, Role, User},
    services::email_service::Mailer,
};

// Trial de 7 dias corridos a partir do registro
const TRIAL_DAYS: i64 = 7;
// Token de acesso vale 24 horas
const TOKEN_HOURS: i64 = 24;
// Link de reset de senha vale 1 hora, uso único
const RESET_TOKEN_HOURS: i64 = 1;
const RESET_TOKEN_LEN: usize = 64;

const DEFAULT_HOTEL_NAME: &str = "Otelim";

// Sequência aleatória alfanumérica (tokens de reset, senhas temporárias)
pub fn random_alnum(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    hotel_repo: HotelRepository,
    mailer: Mailer,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        hotel_repo: HotelRepository,
        mailer: Mailer,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            hotel_repo,
            mailer,
            jwt_secret,
            pool,
        }
    }

    // Registro: cria o hotel (com trial de 7 dias) e o primeiro admin
    // na mesma transação. Ou nasce tudo, ou nada.
    pub async fn register(&self, payload: RegisterPayload) -> Result<AuthResponse, AppError> {
        // Hashing fora da transação, em thread separada (bcrypt é pesado)
        let password = payload.password.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let hotel_name = payload
            .hotel_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_HOTEL_NAME);
        let trial_ends_at = Utc::now() + Duration::days(TRIAL_DAYS);

        let mut tx = self.pool.begin().await?;

        let hotel = self
            .hotel_repo
            .create_hotel(&mut *tx, hotel_name, trial_ends_at)
            .await?;

        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                hotel.id,
                &payload.email,
                &password_hash,
                &payload.name,
                Role::Admin,
            )
            .await?;

        tx.commit().await?;

        tracing::info!("🏨 Novo hotel registrado: {} ({})", hotel.name, hotel.id);

        // E-mail de boas-vindas é melhor esforço: falha não desfaz o registro
        if let Err(e) = self
            .mailer
            .send_welcome(&user.email, &user.name, &hotel.name)
            .await
        {
            tracing::warn!("Falha ao enviar e-mail de boas-vindas: {}", e);
        }

        let token = self.create_token(&user)?;
        Ok(AuthResponse { token, user })
    }

    // Login não consulta a flag active: o token de um usuário desativado
    // morre no guard, na primeira requisição protegida.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = password.to_owned();
        let password_hash = user.password_hash.clone();
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password, &password_hash))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(&user)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        // O usuário pode ter sido removido depois da emissão do token
        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let current = current_password.to_owned();
        let password_hash = user.password_hash.clone();
        let is_current_valid =
            tokio::task::spawn_blocking(move || verify(&current, &password_hash))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_current_valid {
            return Err(AppError::InvalidCredentials);
        }

        let new_password = new_password.to_owned();
        let new_hash =
            tokio::task::spawn_blocking(move || hash(&new_password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .update_password(&self.pool, user.id, &new_hash)
            .await
    }

    // A resposta é idêntica exista ou não a conta, para não permitir
    // enumeração de e-mails cadastrados.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            return Ok(());
        };

        let token = random_alnum(RESET_TOKEN_LEN);
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_HOURS);

        self.user_repo
            .create_password_reset(user.id, &token, expires_at)
            .await?;

        // Aqui a falha de e-mail PROPAGA: sem o link, o fluxo não existe
        self.mailer
            .send_password_reset(&user.email, &user.name, &token)
            .await?;

        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let new_password = new_password.to_owned();
        let new_hash =
            tokio::task::spawn_blocking(move || hash(&new_password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;

        // O claim é um UPDATE condicional: o segundo uso do mesmo token
        // não encontra linha e falha, mesmo em requisições simultâneas
        let reset = self
            .user_repo
            .claim_password_reset(&mut *tx, token, Utc::now())
            .await?
            .ok_or(AppError::ResetTokenInvalid)?;

        self.user_repo
            .update_password(&mut *tx, reset.user_id, &new_hash)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(TOKEN_HOURS);

        let claims = Claims {
            sub: user.id,
            role: user.role,
            hotel_id: user.hotel_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn sequencia_aleatoria_tem_tamanho_e_charset_corretos() {
        let token = random_alnum(64);
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));

        let temp = random_alnum(8);
        assert_eq!(temp.len(), 8);
        assert!(temp.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn claims_sobrevivem_a_ida_e_volta_pelo_jwt() {
        let secret = "segredo-de-teste";
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::Sales,
            hotel_id: Uuid::new_v4(),
            exp: (now + Duration::hours(24)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, claims.sub);
        assert_eq!(decoded.claims.hotel_id, claims.hotel_id);
        assert_eq!(decoded.claims.role, Role::Sales);
        assert_eq!(decoded.claims.exp, claims.exp);
    }

    #[test]
    fn token_com_segredo_errado_e_rejeitado() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::Admin,
            hotel_id: Uuid::new_v4(),
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
            iat: Utc::now().timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"segredo-a"),
        )
        .unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"segredo-b"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
