// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

// Mapeia o CREATE TYPE user_role do banco.
// admin = Satış Direktörü, manager = Satış Müdürü, sales = Satış Temsilcisi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Sales,
}

impl Default for Role {
    fn default() -> Self {
        Role::Sales
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

// Dados para registro de um novo hotel + seu primeiro admin
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(email(message = "Geçerli bir e-posta adresi girin."))]
    pub email: String,
    #[validate(length(min = 6, message = "Şifre en az 6 karakter olmalıdır."))]
    pub password: String,
    #[validate(length(min = 1, message = "İsim boş olamaz."))]
    pub name: String,
    // Se ausente, o hotel nasce com o nome padrão "Otelim"
    pub hotel_name: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "Geçerli bir e-posta adresi girin."))]
    pub email: String,
    #[validate(length(min = 1, message = "Şifre boş olamaz."))]
    pub password: String,
}

// Resposta de autenticação com o token e o perfil
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Confirmação simples, sem corpo além da mensagem
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

// Resposta do convite: a senha temporária volta para o admin repassar
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteResponse {
    pub success: bool,
    pub message: String,
    pub temp_password: String,
}

// Resposta da compra direta de assentos extras
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtraUsersResponse {
    pub success: bool,
    pub message: String,
    pub new_extra_users: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "Mevcut şifre gereklidir."))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Yeni şifre en az 6 karakter olmalıdır."))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordPayload {
    #[validate(email(message = "Geçerli bir e-posta adresi girin."))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[validate(length(min = 1, message = "Token gereklidir."))]
    pub token: String,
    #[validate(length(min = 6, message = "Şifre en az 6 karakter olmalıdır."))]
    pub new_password: String,
}

// --- GESTÃO DE USUÁRIOS (tela do admin) ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteUserPayload {
    #[validate(length(min = 1, message = "İsim boş olamaz."))]
    pub name: String,
    #[validate(email(message = "Geçerli bir e-posta adresi girin."))]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

// Edição parcial: campo ausente mantém o valor atual
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    pub name: Option<String>,
    #[validate(email(message = "Geçerli bir e-posta adresi girin."))]
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusPayload {
    pub active: bool,
}

// --- ASSINATURA (rotas diretas, sem gateway) ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribePayload {
    pub subscription_ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub extra_users: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseExtraUsersPayload {
    #[validate(range(min = 1, message = "En az 1 kullanıcı eklemelisiniz."))]
    pub extra_users: i32,
}

// Registro de reset de senha: uso único, expira em 1 hora
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PasswordReset {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // Subject (ID do usuário)
    pub role: Role,     // Papel no momento do login
    pub hotel_id: Uuid, // Tenant do usuário
    pub exp: usize,     // Expiration time (quando o token expira)
    pub iat: usize,     // Issued At (quando o token foi criado)
}
