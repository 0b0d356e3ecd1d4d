// src/config.rs

use std::sync::Arc;
use std::{env, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::db::{
    CompanyRepository, DashboardRepository, HotelRepository, OfferRepository, PaymentRepository,
    ReportRepository, UserRepository,
};
use crate::middleware::rate_limit::RateLimiters;
use crate::services::payment_service::{DemoGateway, PaymentGateway};
use crate::services::{
    AuthService, CompanyService, DashboardService, Mailer, OfferService, PaymentService,
    ReportService, SubscriptionService, UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub rate_limiters: RateLimiters,
    pub hotel_repo: HotelRepository,
    pub mailer: Mailer,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub company_service: CompanyService,
    pub offer_service: OfferService,
    pub dashboard_service: DashboardService,
    pub report_service: ReportService,
    pub subscription_service: SubscriptionService,
    pub payment_service: PaymentService,
}

impl AppState {
    // A assinatura agora retorna um Result!
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?; // <-- Se falhar, retorna um Err em vez de dar panic ou exit

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let hotel_repo = HotelRepository::new(db_pool.clone());
        let company_repo = CompanyRepository::new(db_pool.clone());
        let offer_repo = OfferRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        let mailer = Mailer::from_env();
        let gateway: Arc<dyn PaymentGateway> = Arc::new(DemoGateway);

        let auth_service = AuthService::new(
            user_repo.clone(),
            hotel_repo.clone(),
            mailer.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
        );
        let user_service = UserService::new(
            user_repo.clone(),
            hotel_repo.clone(),
            mailer.clone(),
            db_pool.clone(),
        );
        let company_service = CompanyService::new(company_repo.clone());
        let offer_service = OfferService::new(offer_repo, company_repo);
        let dashboard_service = DashboardService::new(dashboard_repo);
        let report_service = ReportService::new(report_repo);
        let subscription_service = SubscriptionService::new(hotel_repo.clone(), db_pool.clone());
        let payment_service = PaymentService::new(
            db_pool.clone(),
            payment_repo,
            hotel_repo.clone(),
            gateway,
        );

        // Retorna Ok com o estado montado
        Ok(Self {
            db_pool,
            jwt_secret,
            rate_limiters: RateLimiters::new(),
            hotel_repo,
            mailer,
            auth_service,
            user_service,
            company_service,
            offer_service,
            dashboard_service,
            report_service,
            subscription_service,
            payment_service,
        })
    }
}
