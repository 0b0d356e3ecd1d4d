// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

// ---
// A TABELA DE CAPACIDADES
// ---
// Toda decisão papel x ação passa por aqui. Nenhum handler repete
// comparação de papel por conta própria.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ViewAllOffers, // Sales enxerga só as próprias ofertas
    CreateOffer,
    EditAnyOffer, // Sales edita só as próprias (checagem de dono à parte)
    DeleteOffer,
    ManageCompanies,
    ViewCompanies,
    ManageUsers,
    ViewReports,
    ManageBilling,
    ViewDirectorPanel, // Painel do Satış Direktörü (KPIs, funil, performance)
}

impl Capability {
    pub fn granted_to(self, role: Role) -> bool {
        use Capability::*;
        match self {
            ViewAllOffers => matches!(role, Role::Admin | Role::Manager),
            CreateOffer => true,
            EditAnyOffer => matches!(role, Role::Admin | Role::Manager),
            DeleteOffer => matches!(role, Role::Admin),
            ManageCompanies => matches!(role, Role::Admin),
            ViewCompanies => true,
            ManageUsers => matches!(role, Role::Admin),
            ViewReports => matches!(role, Role::Admin | Role::Manager),
            ManageBilling => matches!(role, Role::Admin),
            ViewDirectorPanel => matches!(role, Role::Admin),
        }
    }
}

// Escopo de listagem por papel: admin e müdür enxergam o hotel inteiro,
// sales apenas a própria carteira. Listagens, dashboard e export passam
// todos por aqui.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferScope {
    Tenant,
    Agent(Uuid),
}

impl OfferScope {
    // O filtro de agent_id pronto para as queries (None = hotel inteiro)
    pub fn agent_filter(self) -> Option<Uuid> {
        match self {
            OfferScope::Tenant => None,
            OfferScope::Agent(id) => Some(id),
        }
    }
}

pub fn offer_scope(user: &User) -> OfferScope {
    if Capability::ViewAllOffers.granted_to(user.role) {
        OfferScope::Tenant
    } else {
        OfferScope::Agent(user.id)
    }
}

// Checagem de dono na edição: sales só mexe na própria carteira,
// admin e müdür passam direto.
pub fn can_edit_offer(user: &User, offer_agent_id: Uuid) -> bool {
    if Capability::EditAnyOffer.granted_to(user.role) {
        return true;
    }
    offer_agent_id == user.id
}

// ---
// O EXTRACTOR (Guardião)
// ---

/// O Trait que define o que é uma capacidade exigível na assinatura do handler
pub trait CapabilityDef: Send + Sync + 'static {
    fn capability() -> Capability;
}

pub struct RequireCapability<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireCapability<T>
where
    T: CapabilityDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // O auth_guard já rodou e deixou o usuário nos extensions
        let user = parts
            .extensions
            .get::<User>()
            .ok_or(AppError::InvalidToken)?;

        if !T::capability().granted_to(user.role) {
            return Err(AppError::Forbidden("Bu işlem için yetkiniz yok"));
        }

        Ok(RequireCapability(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS CAPACIDADES (TIPOS)
// ---

pub struct CanManageCompanies;
impl CapabilityDef for CanManageCompanies {
    fn capability() -> Capability {
        Capability::ManageCompanies
    }
}

pub struct CanManageUsers;
impl CapabilityDef for CanManageUsers {
    fn capability() -> Capability {
        Capability::ManageUsers
    }
}

pub struct CanDeleteOffers;
impl CapabilityDef for CanDeleteOffers {
    fn capability() -> Capability {
        Capability::DeleteOffer
    }
}

pub struct CanViewReports;
impl CapabilityDef for CanViewReports {
    fn capability() -> Capability {
        Capability::ViewReports
    }
}

pub struct CanManageBilling;
impl CapabilityDef for CanManageBilling {
    fn capability() -> Capability {
        Capability::ManageBilling
    }
}

pub struct CanViewDirectorPanel;
impl CapabilityDef for CanViewDirectorPanel {
    fn capability() -> Capability {
        Capability::ViewDirectorPanel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_role(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            hotel_id: Uuid::new_v4(),
            email: "vendedor@otel.com".into(),
            password_hash: "x".into(),
            name: "Vendedor".into(),
            role,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn matriz_de_capacidades_por_papel() {
        use Capability::*;

        // (capability, admin, manager, sales)
        let table = [
            (ViewAllOffers, true, true, false),
            (CreateOffer, true, true, true),
            (EditAnyOffer, true, true, false),
            (DeleteOffer, true, false, false),
            (ManageCompanies, true, false, false),
            (ViewCompanies, true, true, true),
            (ManageUsers, true, false, false),
            (ViewReports, true, true, false),
            (ManageBilling, true, false, false),
            (ViewDirectorPanel, true, false, false),
        ];

        for (cap, admin, manager, sales) in table {
            assert_eq!(cap.granted_to(Role::Admin), admin, "{cap:?} admin");
            assert_eq!(cap.granted_to(Role::Manager), manager, "{cap:?} manager");
            assert_eq!(cap.granted_to(Role::Sales), sales, "{cap:?} sales");
        }
    }

    #[test]
    fn sales_edita_somente_a_propria_carteira() {
        let seller = user_with_role(Role::Sales);
        let someone_else = Uuid::new_v4();

        assert!(can_edit_offer(&seller, seller.id));
        assert!(!can_edit_offer(&seller, someone_else));
    }

    #[test]
    fn escopo_de_sales_e_a_propria_carteira() {
        let seller = user_with_role(Role::Sales);

        assert_eq!(offer_scope(&seller), OfferScope::Agent(seller.id));
        assert_eq!(offer_scope(&seller).agent_filter(), Some(seller.id));
    }

    #[test]
    fn admin_e_manager_enxergam_o_hotel_inteiro() {
        let admin = user_with_role(Role::Admin);
        let manager = user_with_role(Role::Manager);

        assert_eq!(offer_scope(&admin), OfferScope::Tenant);
        assert_eq!(offer_scope(&manager), OfferScope::Tenant);
        assert_eq!(offer_scope(&manager).agent_filter(), None);
    }

    #[test]
    fn manager_edita_qualquer_oferta_mas_nao_gerencia_usuarios() {
        let manager = user_with_role(Role::Manager);
        let any_agent = Uuid::new_v4();

        assert!(can_edit_offer(&manager, any_agent));
        assert!(!Capability::ManageUsers.granted_to(Role::Manager));
        assert!(!Capability::DeleteOffer.granted_to(Role::Manager));
        assert!(!Capability::ViewDirectorPanel.granted_to(Role::Manager));
    }
}
