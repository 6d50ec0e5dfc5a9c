pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod validation;

use crate::api::handlers::{cast_members, categories, genres, health, videos};
use crate::api::middleware::request_id;
use crate::config::{CatalogConfig, StorageBackend};
use crate::services::catalog_service::CatalogService;
use crate::services::storage::StorageService;
use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Request, Response},
    middleware::from_fn,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{Span, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::health_check,
        api::handlers::categories::list_categories,
        api::handlers::categories::show_category,
        api::handlers::categories::create_category,
        api::handlers::categories::update_category,
        api::handlers::categories::delete_category,
        api::handlers::categories::restore_category,
        api::handlers::genres::list_genres,
        api::handlers::genres::show_genre,
        api::handlers::genres::create_genre,
        api::handlers::genres::update_genre,
        api::handlers::genres::delete_genre,
        api::handlers::genres::restore_genre,
        api::handlers::cast_members::list_cast_members,
        api::handlers::cast_members::show_cast_member,
        api::handlers::cast_members::create_cast_member,
        api::handlers::cast_members::update_cast_member,
        api::handlers::cast_members::delete_cast_member,
        api::handlers::cast_members::restore_cast_member,
        api::handlers::videos::list_videos,
        api::handlers::videos::show_video,
        api::handlers::videos::create_video,
        api::handlers::videos::update_video,
        api::handlers::videos::delete_video,
        api::handlers::videos::restore_video,
    ),
    components(
        schemas(
            api::handlers::health::HealthResponse,
            api::handlers::CategoryRequest,
            api::handlers::CategoryResponse,
            api::handlers::GenreRequest,
            api::handlers::GenreResponse,
            api::handlers::CastMemberRequest,
            api::handlers::CastMemberResponse,
            api::handlers::VideoRequest,
            api::handlers::VideoResponse,
            validation::ValidationReport,
            validation::Violation,
        )
    ),
    tags(
        (name = "system", description = "Service status"),
        (name = "categories", description = "Category management"),
        (name = "genres", description = "Genre management"),
        (name = "cast_members", description = "Cast member management"),
        (name = "videos", description = "Video management with file uploads")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn StorageService>,
    pub catalog: Arc<CatalogService>,
    pub config: CatalogConfig,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        storage: Arc<dyn StorageService>,
        config: CatalogConfig,
    ) -> Self {
        let catalog = Arc::new(CatalogService::new(
            db.clone(),
            storage.clone(),
            config.clone(),
        ));
        Self {
            db,
            storage,
            catalog,
            config,
        }
    }
}

fn cors_layer(config: &CatalogConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any)
}

fn http_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    fn(&Request<Body>) -> Span,
    fn(&Request<Body>, &Span),
    fn(&Response<Body>, Duration, &Span),
> {
    TraceLayer::new_for_http()
        .make_span_with(request_id::request_span::<Body> as fn(&Request<Body>) -> Span)
        .on_request(log_request as fn(&Request<Body>, &Span))
        .on_response(log_response as fn(&Response<Body>, Duration, &Span))
}

fn log_request(request: &Request<Body>, _span: &Span) {
    info!("📥 {} {}", request.method(), request.uri());
}

fn log_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    info!("📤 Finished in {:?} with status {}", latency, response.status());
}

pub fn create_app(state: AppState) -> Router {
    let mut app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:id",
            get(categories::show_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/categories/:id/restore",
            post(categories::restore_category),
        )
        .route(
            "/genres",
            get(genres::list_genres).post(genres::create_genre),
        )
        .route(
            "/genres/:id",
            get(genres::show_genre)
                .put(genres::update_genre)
                .delete(genres::delete_genre),
        )
        .route("/genres/:id/restore", post(genres::restore_genre))
        .route(
            "/cast_members",
            get(cast_members::list_cast_members).post(cast_members::create_cast_member),
        )
        .route(
            "/cast_members/:id",
            get(cast_members::show_cast_member)
                .put(cast_members::update_cast_member)
                .delete(cast_members::delete_cast_member),
        )
        .route(
            "/cast_members/:id/restore",
            post(cast_members::restore_cast_member),
        )
        .route(
            "/videos",
            get(videos::list_videos).post(videos::create_video),
        )
        .route(
            "/videos/:id",
            get(videos::show_video)
                .put(videos::update_video)
                .delete(videos::delete_video),
        )
        .route("/videos/:id/restore", post(videos::restore_video));

    if state.config.storage_backend == StorageBackend::Local {
        app = app.nest_service(
            "/storage",
            ServeDir::new(&state.config.local_storage_root),
        );
    }

    // The request id layer wraps the trace layer so spans see the id.
    app.layer(http_trace_layer())
        .layer(from_fn(request_id::request_id_middleware))
        .layer(cors_layer(&state.config))
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .with_state(state)
}
