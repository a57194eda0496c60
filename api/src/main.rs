use std::net::SocketAddr;

use axum::Router;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod error;
mod extract;
mod middleware;
mod openai;
mod routes;
mod state;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Breathwork API",
        version = "0.1.0",
        description = "Breathing-pattern configuration, the emotion to technique catalog, and technique recommendations."
    ),
    paths(
        routes::health::health_check,
        routes::config::get_config,
        routes::config::update_config,
        routes::config::set_box_scale,
        routes::config::set_cycle_seconds,
        routes::patterns::get_box_pattern,
        routes::patterns::set_box_pattern,
        routes::patterns::get_three_pattern,
        routes::patterns::set_three_pattern,
        routes::patterns::get_two_pattern,
        routes::patterns::set_two_pattern,
        routes::catalog::list_techniques,
        routes::catalog::lookup_technique,
        routes::chat::chat,
        routes::chat::chatbot,
    ),
    components(schemas(
        HealthResponse,
        breathwork_core::error::ApiError,
        breathwork_core::pattern::BoxPattern,
        breathwork_core::pattern::ThreePhasePattern,
        breathwork_core::pattern::TwoPhasePattern,
        breathwork_core::pattern::VariantKind,
        breathwork_core::config::ConfigSnapshot,
        breathwork_core::config::ConfigUpdate,
        routes::config::BoxScaleUpdate,
        routes::config::CycleSecondsUpdate,
        breathwork_core::catalog::Emotion,
        breathwork_core::catalog::PhaseTiming,
        breathwork_core::catalog::BreathingTechnique,
        breathwork_core::chat::ChatRole,
        breathwork_core::chat::ChatMessage,
        breathwork_core::chat::ConversationInput,
        breathwork_core::engine::ChatRequest,
        breathwork_core::engine::ChatReply,
        breathwork_core::engine::RecommendationSource,
        breathwork_core::engine::ConversationRecommendation,
        routes::chat::ConversationRequest,
    )),
    tags(
        (name = "system", description = "Liveness"),
        (name = "config", description = "Active breathing configuration"),
        (name = "patterns", description = "Per-variant pattern slots"),
        (name = "catalog", description = "Emotion to technique table"),
        (name = "recommendations", description = "Chat and conversation recommendations")
    )
)]
struct ApiDoc;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// `remote` when a completion provider is configured, otherwise `local`
    pub inference: String,
}

fn app(app_state: state::AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::config::router())
        .merge(routes::patterns::router())
        .merge(routes::catalog::router())
        .merge(routes::chat::router().layer(middleware::rate_limit::chat_layer()))
        .layer(axum::middleware::from_fn(middleware::security_headers::apply))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::cors::build_cors_layer()),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "breathwork_api=debug,breathwork_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let settings = state::InferenceSettings::from_env();
    let app_state = match state::AppState::from_settings(&settings) {
        Ok(app_state) => app_state,
        Err(err) => {
            tracing::error!(error = %err, "Failed to build inference client");
            std::process::exit(1);
        }
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Breathwork API listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    if let Err(err) = axum::serve(
        listener,
        app(app_state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!(error = %err, "Server exited with error");
        std::process::exit(1);
    }
}
