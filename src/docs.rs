// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::change_password,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,

        // --- Subscription ---
        handlers::auth::hotel_info,
        handlers::auth::subscribe,
        handlers::auth::purchase_extra_users,

        // --- Companies ---
        handlers::companies::list_companies,
        handlers::companies::create_company,
        handlers::companies::update_company,
        handlers::companies::delete_company,

        // --- Offers ---
        handlers::offers::list_offers,
        handlers::offers::create_offer,
        handlers::offers::update_offer,
        handlers::offers::delete_offer,
        handlers::offers::list_notes,
        handlers::offers::add_note,
        handlers::offers::export_csv,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::invite_user,
        handlers::users::update_user,
        handlers::users::set_user_status,
        handlers::users::delete_user,

        // --- Dashboard ---
        handlers::dashboard::stats,

        // --- Director ---
        handlers::director::kpi,
        handlers::director::pipeline,
        handlers::director::revenue,
        handlers::director::agents,
        handlers::director::lost_reasons,
        handlers::director::followup_discipline,

        // --- Reports ---
        handlers::reports::period_report,

        // --- Payment ---
        handlers::payment::calculate_price,
        handlers::payment::create_subscription,
        handlers::payment::history,
    ),
    components(
        schemas(

            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::MessageResponse,
            models::auth::InviteResponse,
            models::auth::ExtraUsersResponse,
            models::auth::ChangePasswordPayload,
            models::auth::ForgotPasswordPayload,
            models::auth::ResetPasswordPayload,
            models::auth::InviteUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::UserStatusPayload,
            models::auth::SubscribePayload,
            models::auth::PurchaseExtraUsersPayload,

            // --- Tenancy ---
            models::tenancy::Hotel,
            models::tenancy::HotelInfo,

            // --- Companies ---
            models::company::CompanyType,
            models::company::Company,
            models::company::CompanyPayload,

            // --- Offers ---
            models::offer::OfferStatus,
            models::offer::Currency,
            models::offer::Offer,
            models::offer::OfferWithDetails,
            models::offer::CreateOfferPayload,
            models::offer::UpdateOfferPayload,
            models::offer::Note,
            models::offer::NoteWithAuthor,
            models::offer::NotePayload,

            // --- Dashboard ---
            models::dashboard::DashboardStats,
            models::dashboard::MonthlyStatusEntry,
            models::dashboard::DirectorKpis,
            models::dashboard::PipelineDistribution,
            models::dashboard::MonthlyRevenueEntry,
            models::dashboard::AgentPerformance,
            models::dashboard::LostReasonEntry,
            models::dashboard::FollowUpDiscipline,

            // --- Reports ---
            models::report::CurrencyTotal,
            models::report::CurrencyAverage,
            models::report::StatusCount,
            models::report::TopAgentEntry,
            models::report::TopCompanyEntry,
            models::report::DateRange,
            models::report::PeriodReport,

            // --- Payment ---
            models::payment::PackageType,
            models::payment::PaymentStatus,
            models::payment::Payment,
            models::payment::PaymentWithUser,
            models::payment::CalculatePricePayload,
            models::payment::CreateSubscriptionPayload,
            models::payment::PriceQuote,
            models::payment::PaymentReceipt,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Cadastro de Hotéis"),
        (name = "Subscription", description = "Assinatura do Hotel e Trial"),
        (name = "Companies", description = "Firmas e Agências do Hotel"),
        (name = "Offers", description = "Teklifler: o Pipeline de Vendas"),
        (name = "Users", description = "Gestão da Equipe do Hotel"),
        (name = "Dashboard", description = "Indicadores do Painel"),
        (name = "Director", description = "KPIs Executivos (Müdür)"),
        (name = "Reports", description = "Relatórios Periódicos"),
        (name = "Payment", description = "Cobrança e Histórico de Pagamentos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
