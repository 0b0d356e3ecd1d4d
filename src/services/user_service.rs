// src/services/user_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::{HotelRepository, UserRepository};
use crate::models::auth::{Role, User};
use crate::models::tenancy::Hotel;
use crate::services::auth::random_alnum;
use crate::services::email_service::Mailer;

// Tamanho da senha temporária gerada no convite
const TEMP_PASSWORD_LEN: usize = 8;

// Limite de assentos do hotel: plano base + pacotes extras comprados
pub fn seat_limit(hotel: &Hotel) -> i32 {
    hotel.included_users + hotel.extra_users
}

// Autoproteção: remover ou desativar a própria conta é recusado,
// qualquer que seja o papel do solicitante.
pub fn targets_own_account(caller: &User, target_id: Uuid) -> bool {
    caller.id == target_id
}

// Funde o payload parcial com a linha atual (campo ausente mantém o valor)
// e recusa a troca do próprio papel: um admin não pode se rebaixar e
// deixar o hotel sem administrador por engano.
pub fn resolve_user_update(
    caller: &User,
    target: &User,
    name: Option<String>,
    email: Option<String>,
    role: Option<Role>,
) -> Result<(String, String, Role), AppError> {
    let new_name = name.unwrap_or_else(|| target.name.clone());
    let new_email = email.unwrap_or_else(|| target.email.clone());
    let new_role = role.unwrap_or(target.role);

    if target.id == caller.id && new_role != caller.role {
        return Err(AppError::Forbidden("Kendi rolünüzü değiştiremezsiniz"));
    }

    Ok((new_name, new_email, new_role))
}

// Gestão de usuários do tenant: convite, edição, ativação e remoção.
// As regras de autoproteção (ninguém mexe na própria conta por aqui)
// ficam neste serviço, não nos handlers.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    hotel_repo: HotelRepository,
    mailer: Mailer,
    pool: PgPool,
}

impl UserService {
    pub fn new(
        user_repo: UserRepository,
        hotel_repo: HotelRepository,
        mailer: Mailer,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            hotel_repo,
            mailer,
            pool,
        }
    }

    pub async fn list(&self, hotel_id: Uuid) -> Result<Vec<User>, AppError> {
        self.user_repo.list_by_hotel(hotel_id).await
    }

    // Convida um novo usuário para o hotel do solicitante.
    // A checagem de cota e a criação acontecem na mesma transação, com a
    // linha do hotel travada (FOR UPDATE): dois convites simultâneos não
    // conseguem furar o limite de assentos.
    pub async fn invite(
        &self,
        caller: &User,
        name: &str,
        email: &str,
        role: Role,
    ) -> Result<(User, String), AppError> {
        let temp_password = random_alnum(TEMP_PASSWORD_LEN);

        let to_hash = temp_password.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(&to_hash, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;

        let hotel = self
            .hotel_repo
            .find_by_id_for_update(&mut *tx, caller.hotel_id)
            .await?
            .ok_or(AppError::NotFound("Otel bulunamadı."))?;

        let limit = seat_limit(&hotel);
        let used = self.user_repo.count_in_hotel(&mut *tx, hotel.id).await?;
        if used >= limit as i64 {
            return Err(AppError::QuotaExceeded { limit });
        }

        let user = self
            .user_repo
            .create_user(&mut *tx, hotel.id, email, &password_hash, name, role)
            .await?;

        tx.commit().await?;

        tracing::info!("✅ Usuário convidado: {} ({:?}) em {}", user.email, user.role, hotel.name);

        // Falha de e-mail não desfaz o convite: a senha temporária também
        // volta na resposta para o admin repassar manualmente
        if let Err(e) = self
            .mailer
            .send_user_invite(&user.email, &user.name, &hotel.name, &caller.name, &temp_password)
            .await
        {
            tracing::warn!("📧 Falha ao enviar convite para {}: {}", user.email, e);
        }

        Ok((user, temp_password))
    }

    // Edição administrativa. Os campos ausentes no payload mantêm o valor
    // atual.
    pub async fn update(
        &self,
        caller: &User,
        target_id: Uuid,
        name: Option<String>,
        email: Option<String>,
        role: Option<Role>,
    ) -> Result<User, AppError> {
        let target = self
            .user_repo
            .find_in_hotel(target_id, caller.hotel_id)
            .await?
            .ok_or(AppError::NotFound("Kullanıcı bulunamadı."))?;

        let (new_name, new_email, new_role) =
            resolve_user_update(caller, &target, name, email, role)?;

        self.user_repo
            .update_user(target_id, caller.hotel_id, &new_name, &new_email, new_role)
            .await?
            .ok_or(AppError::NotFound("Kullanıcı bulunamadı."))
    }

    // Ativa/desativa o acesso de outro usuário
    pub async fn set_active(
        &self,
        caller: &User,
        target_id: Uuid,
        active: bool,
    ) -> Result<User, AppError> {
        if targets_own_account(caller, target_id) {
            return Err(AppError::Forbidden("Kendi hesabınızı deaktive edemezsiniz"));
        }

        self.user_repo
            .set_active(target_id, caller.hotel_id, active)
            .await?
            .ok_or(AppError::NotFound("Kullanıcı bulunamadı."))
    }

    // Remoção definitiva; as ofertas do usuário caem junto via ON DELETE CASCADE
    pub async fn delete(&self, caller: &User, target_id: Uuid) -> Result<(), AppError> {
        if targets_own_account(caller, target_id) {
            return Err(AppError::Forbidden("Kendi hesabınızı silemezsiniz"));
        }

        let deleted = self.user_repo.delete(target_id, caller.hotel_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Kullanıcı bulunamadı."));
        }

        tracing::info!("🗑️ Usuário removido: {}", target_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn hotel_com_assentos(included: i32, extra: i32) -> Hotel {
        Hotel {
            id: Uuid::new_v4(),
            name: "Teste Otel".into(),
            included_users: included,
            extra_users: extra,
            trial_ends_at: Some(Utc::now()),
            subscription_ends_at: None,
            created_at: Utc::now(),
        }
    }

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            hotel_id: Uuid::new_v4(),
            email: "kisi@otel.com".into(),
            password_hash: "x".into(),
            name: "Kişi".into(),
            role,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn limite_padrao_soma_plano_e_extras() {
        assert_eq!(seat_limit(&hotel_com_assentos(4, 0)), 4);
        assert_eq!(seat_limit(&hotel_com_assentos(4, 3)), 7);
    }

    #[test]
    fn quarto_usuario_ocupa_o_ultimo_assento_do_plano_base() {
        let hotel = hotel_com_assentos(4, 0);
        let limit = seat_limit(&hotel);
        // Com 3 assentos usados ainda cabe; com 4 o convite deve falhar
        assert!((3i64) < limit as i64);
        assert!((4i64) >= limit as i64);
    }

    #[test]
    fn autoprotecao_vale_para_qualquer_papel() {
        for role in [Role::Admin, Role::Manager, Role::Sales] {
            let caller = user(role);
            assert!(targets_own_account(&caller, caller.id));
            assert!(!targets_own_account(&caller, Uuid::new_v4()));
        }
    }

    #[test]
    fn campos_ausentes_mantem_o_valor_atual() {
        let caller = user(Role::Admin);
        let mut target = user(Role::Sales);
        target.name = "Ayşe".into();
        target.email = "ayse@otel.com".into();

        let (name, email, role) =
            resolve_user_update(&caller, &target, None, None, None).unwrap();
        assert_eq!(name, "Ayşe");
        assert_eq!(email, "ayse@otel.com");
        assert_eq!(role, Role::Sales);
    }

    #[test]
    fn trocar_o_proprio_papel_e_recusado() {
        let caller = user(Role::Admin);
        let result = resolve_user_update(
            &caller,
            &caller.clone(),
            None,
            None,
            Some(Role::Sales),
        );
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn editar_o_proprio_nome_sem_tocar_no_papel_passa() {
        let caller = user(Role::Admin);
        let (name, _, role) = resolve_user_update(
            &caller,
            &caller.clone(),
            Some("Novo Nome".into()),
            None,
            Some(Role::Admin),
        )
        .unwrap();
        assert_eq!(name, "Novo Nome");
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn promover_outro_usuario_passa() {
        let caller = user(Role::Admin);
        let target = user(Role::Sales);
        let (_, _, role) =
            resolve_user_update(&caller, &target, None, None, Some(Role::Manager)).unwrap();
        assert_eq!(role, Role::Manager);
    }
}
