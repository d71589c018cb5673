use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Router,
};
// Conditionally import SwaggerUi only when needed (not test)
#[cfg(not(test))]
use utoipa_swagger_ui::SwaggerUi;
use utoipa::OpenApi;
// Conditionally import CORS only when needed (not test)
#[cfg(not(test))]
use tower_http::cors::{Any, CorsLayer};
// Conditionally import Governor only when needed (not test)
#[cfg(not(test))]
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
#[cfg(not(test))]
use std::num::NonZeroU32;

pub mod config;
pub mod entities;
pub mod error;
pub mod matching;
pub mod notify;
pub mod routes;
pub mod store;

use config::MatchingConfig;
use matching::AllotmentEngine;
use store::MemoryStore;

/// Shared application state: the persisted store and the allotment engine
/// carrying the matching thresholds.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub engine: AllotmentEngine,
}

impl AppState {
    pub fn new(config: MatchingConfig) -> Self {
        AppState {
            store: Arc::new(MemoryStore::new()),
            engine: AllotmentEngine::new(config),
        }
    }

    pub fn with_store(store: Arc<MemoryStore>, config: MatchingConfig) -> Self {
        AppState {
            store,
            engine: AllotmentEngine::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(MatchingConfig::default())
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Service is healthy")
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FUNDMATCH API",
        version = "0.1.0",
        description = "Investor-founder matching and allotment engine for a fundraising marketplace"
    ),
    paths(
        health_check,
        routes::assignment::assign_investors,
        routes::assignment::preview_candidates,
        routes::match_status::update_match_status,
        routes::match_status::list_matches,
        routes::refresh::refresh_funding_request,
        routes::refresh::remove_investor,
        routes::refresh::delete_funding_request,
        routes::refresh::close_funding_request,
        routes::notifications::list_notifications
    ),
    components(schemas(
        routes::assignment::AssignInvestorsRequest,
        routes::assignment::AssignInvestorsResponse,
        routes::assignment::AssignedMatch,
        routes::assignment::CandidatePreview,
        routes::assignment::CandidatesResponse,
        routes::match_status::UpdateMatchStatusRequest,
        routes::match_status::UpdateMatchStatusResponse,
        routes::match_status::MatchListResponse,
        routes::refresh::RefreshRequest,
        routes::refresh::RefreshResponse,
        routes::refresh::RemoveInvestorResponse,
        routes::refresh::DeleteRequestResponse,
        routes::refresh::CloseRequest,
        routes::refresh::CloseResponse,
        routes::notifications::NotificationListResponse,
        entities::FundingRequest,
        entities::FundingRequestStatus,
        entities::FundingStage,
        entities::AssignmentMethod,
        entities::MatchRecord,
        entities::MatchStatus,
        entities::MatchCriteria,
        entities::StatusBreakdown,
        entities::Founder,
        entities::Investor,
        entities::PreviousInvestment,
        entities::PartyRole,
        entities::Notification,
        entities::NotificationKind,
        entities::NotificationPriority
    ))
)]
struct ApiDoc;

/// Create the application with default state (empty store, default config).
pub fn create_app() -> Router {
    create_app_with_state(AppState::default())
}

/// Create the application with all routes and middleware over the given state.
pub fn create_app_with_state(state: AppState) -> Router {
    // Build our API documentation (needed regardless for ApiDoc::openapi())
    let api_doc = ApiDoc::openapi();

    // --- Define API routes separately ---
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route(
            "/matching/requests/{id}/assign",
            post(routes::assignment::assign_investors),
        )
        .route(
            "/matching/requests/{id}/candidates",
            get(routes::assignment::preview_candidates),
        )
        .route(
            "/matching/requests/{id}/matches",
            get(routes::match_status::list_matches),
        )
        .route(
            "/matching/requests/{id}/refresh",
            post(routes::refresh::refresh_funding_request),
        )
        .route(
            "/matching/requests/{id}/close",
            post(routes::refresh::close_funding_request),
        )
        .route(
            "/matching/requests/{id}",
            delete(routes::refresh::delete_funding_request),
        )
        .route(
            "/matching/requests/{id}/investors/{investor_id}",
            delete(routes::refresh::remove_investor),
        )
        .route(
            "/matching/matches/{id}/status",
            patch(routes::match_status::update_match_status),
        )
        .route(
            "/notifications/{recipient_id}",
            get(routes::notifications::list_notifications),
        )
        .with_state(state);

    // --- Conditionally apply layers and Swagger UI only when NOT running tests ---
    #[cfg(not(test))]
    let (docs_router, rate_limited_api_routes) = {
        let docs_router = SwaggerUi::new("/docs").url("/api-doc/openapi.json", api_doc);

        // Configure Rate Limiting
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(SmartIpKeyExtractor)
                .period(std::time::Duration::from_secs(60))
                .burst_size(NonZeroU32::new(30).unwrap().into())
                .finish()
                .unwrap(),
        );
        let rate_limited_api_routes = api_routes.layer(GovernorLayer {
            config: governor_conf,
        });

        (docs_router, rate_limited_api_routes)
    };

    // For test builds, use the original api_routes and an empty router for docs
    #[cfg(test)]
    let (docs_router, rate_limited_api_routes) = {
        let _ = api_doc;
        (Router::new(), api_routes)
    };

    // --- Build the final application router ---
    let mut app = Router::new()
        .merge(rate_limited_api_routes)
        .merge(docs_router);

    // --- Apply CORS to the whole app (both API and docs) if needed ---
    #[cfg(not(test))]
    {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app
}
