//src/main.rs

use std::net::SocketAddr;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod jobs;
mod middleware;
mod models;
mod scheduler;
mod services;

// Importações principais
use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;
use crate::middleware::rate_limit::{
    email_limit, general_limit, login_limit, payment_limit, register_limit,
};
use crate::middleware::subscription::subscription_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger. RUST_LOG manda; sem ele, info.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Job diário de lembrete de trial roda em segundo plano
    scheduler::start(app_state.hotel_repo.clone(), app_state.mailer.clone());

    // Rotas públicas de autenticação, cada uma na sua janela de rate limit
    let auth_public_routes = Router::new()
        .route(
            "/register",
            post(handlers::auth::register).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                register_limit,
            )),
        )
        .route(
            "/login",
            post(handlers::auth::login).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                login_limit,
            )),
        )
        .route(
            "/forgot-password",
            post(handlers::auth::forgot_password).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                email_limit,
            )),
        )
        .route("/reset-password", post(handlers::auth::reset_password));

    // Sessão e assinatura: exigem token, mas NÃO passam pelo portão de
    // assinatura (o cliente precisa delas para regularizar o pagamento)
    let auth_session_routes = Router::new()
        .route("/me", get(handlers::auth::me))
        .route("/change-password", post(handlers::auth::change_password))
        .route("/hotel-info", get(handlers::auth::hotel_info))
        .route("/subscribe", post(handlers::auth::subscribe))
        .route(
            "/purchase-extra-users",
            post(handlers::auth::purchase_extra_users),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let company_routes = Router::new()
        .route(
            "/",
            get(handlers::companies::list_companies).post(handlers::companies::create_company),
        )
        .route(
            "/{id}",
            put(handlers::companies::update_company).delete(handlers::companies::delete_company),
        );

    let offer_routes = Router::new()
        .route(
            "/",
            get(handlers::offers::list_offers).post(handlers::offers::create_offer),
        )
        .route("/export/csv", get(handlers::offers::export_csv))
        .route(
            "/{id}",
            put(handlers::offers::update_offer).delete(handlers::offers::delete_offer),
        )
        .route(
            "/{id}/notes",
            get(handlers::offers::list_notes).post(handlers::offers::add_note),
        );

    let user_routes = Router::new()
        .route(
            "/",
            get(handlers::users::list_users).post(handlers::users::invite_user),
        )
        .route(
            "/{id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .route("/{id}/status", patch(handlers::users::set_user_status));

    let dashboard_routes = Router::new()
        .route("/stats", get(handlers::dashboard::stats))
        .route("/director/kpi", get(handlers::director::kpi))
        .route("/director/pipeline", get(handlers::director::pipeline))
        .route("/director/revenue", get(handlers::director::revenue))
        .route("/director/agents", get(handlers::director::agents))
        .route("/director/lost-reasons", get(handlers::director::lost_reasons))
        .route(
            "/director/followup-discipline",
            get(handlers::director::followup_discipline),
        );

    let report_routes = Router::new().route("/{period}", get(handlers::reports::period_report));

    // Os dados de negócio ficam atrás do auth_guard E do portão de
    // assinatura. O auth_guard é a camada de fora: ele insere o User que
    // o portão consome.
    let business_routes = Router::new()
        .nest("/companies", company_routes)
        .nest("/offers", offer_routes)
        .nest("/users", user_routes)
        .nest("/dashboard", dashboard_routes)
        .nest("/reports", report_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            subscription_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Pagamento exige token mas nunca o portão de assinatura
    let payment_routes = Router::new()
        .route("/calculate", post(handlers::payment::calculate_price))
        .route(
            "/create-subscription",
            post(handlers::payment::create_subscription).layer(
                axum_middleware::from_fn_with_state(app_state.clone(), payment_limit),
            ),
        )
        .route("/history", get(handlers::payment::history))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Tudo sob /api divide a janela geral de rate limit
    let api_routes = Router::new()
        .nest("/auth", auth_public_routes.merge(auth_session_routes))
        .nest("/payment", payment_routes)
        .merge(business_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            general_limit,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(
        listener,
        // O rate limiter usa o IP do cliente como chave
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Erro no servidor Axum");
}
