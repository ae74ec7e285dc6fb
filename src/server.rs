//! HTTP surface: routes JSON requests onto [`KitchenService`].
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | plain-text banner |
//! | `POST /chat` | [`KitchenService::suggest_meals`] |
//! | `POST /generate-plan` | [`KitchenService::plan_week`] |
//! | `POST /download-pdf` | [`KitchenService::export_plan`] |
//! | `GET /health` | liveness, never touches a collaborator |
//! | `GET /static/*` | exported PDFs |
//!
//! Every failure leaves as a JSON [`ErrorBody`](crate::error::ErrorBody).
//! Body rejections from axum's `Json` extractor are caught too, so a client
//! never sees axum's plain-text error responses.

use crate::config::ServiceConfig;
use crate::error::KitchenError;
use crate::history::MongoHistoryStore;
use crate::pipeline::llm::LlmGateway;
use crate::pipeline::sink::LocalDirSink;
use crate::service::{KitchenService, DEFAULT_PREFERENCE, DEFAULT_REGION, DEFAULT_USERNAME};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{debug, error, info};

pub const CHAT_FAILED: &str = "Failed to generate response";
pub const PLAN_FAILED: &str = "Plan generation failed";
pub const PDF_FAILED: &str = "PDF generation failed";

type AppState = Arc<KitchenService>;

// ── Payloads ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub ingredients: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanRequest {
    pub preference: Option<String>,
    pub region: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadRequest {
    pub plan: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

// ── Errors ───────────────────────────────────────────────────────────────

/// A [`KitchenError`] paired with the operation's fixed failure message.
#[derive(Debug)]
pub struct ApiError {
    error: KitchenError,
    failure: &'static str,
}

impl ApiError {
    fn for_operation(failure: &'static str) -> impl Fn(KitchenError) -> ApiError + Copy {
        move |error| ApiError { error, failure }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!("{}: {}", self.failure, self.error);
        } else {
            debug!("Rejected request: {}", self.error);
        }

        (status, Json(self.error.to_body(self.failure))).into_response()
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, KitchenError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| KitchenError::MalformedBody {
            detail: rejection.body_text(),
        })
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn root_handler() -> &'static str {
    "Kitchen Sakhi backend is running!"
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn chat_handler(
    State(service): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let fail = ApiError::for_operation(CHAT_FAILED);
    let request = body(payload).map_err(fail)?;

    let username = request.username.as_deref().unwrap_or(DEFAULT_USERNAME);
    let ingredients = request.ingredients.as_deref().unwrap_or_default();

    let response = service
        .suggest_meals(username, ingredients)
        .await
        .map_err(fail)?;
    Ok(Json(ChatResponse { response }))
}

async fn plan_handler(
    State(service): State<AppState>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
    let fail = ApiError::for_operation(PLAN_FAILED);
    let request = body(payload).map_err(fail)?;

    let username = request.username.as_deref().unwrap_or(DEFAULT_USERNAME);
    let preference = request.preference.as_deref().unwrap_or(DEFAULT_PREFERENCE);
    let region = request.region.as_deref().unwrap_or(DEFAULT_REGION);

    let plan = service
        .plan_week(username, preference, region)
        .await
        .map_err(fail)?;
    Ok(Json(PlanResponse { plan }))
}

async fn download_pdf_handler(
    State(service): State<AppState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let fail = ApiError::for_operation(PDF_FAILED);
    let request = body(payload).map_err(fail)?;

    let plan = request.plan.as_deref().unwrap_or_default();
    let url = service.export_plan(plan).await.map_err(fail)?;
    Ok(Json(DownloadResponse { url }))
}

// ── Router & server ──────────────────────────────────────────────────────

/// Build the application router.
///
/// `static_dir` must be the directory the service's sink writes into.
pub fn router(service: Arc<KitchenService>, static_dir: impl AsRef<Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(root_handler))
        .route("/chat", post(chat_handler))
        .route("/generate-plan", post(plan_handler))
        .route("/download-pdf", post(download_pdf_handler))
        .route("/health", get(health_handler))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(cors)
        .with_state(service)
}

/// Wire up the production collaborators and run until Ctrl+C / SIGTERM.
///
/// # Errors
/// Fails before serving when the model provider is not configured, the
/// MongoDB URI is invalid or the address cannot be bound. An unreachable
/// MongoDB server is only logged: `/health` keeps answering and writes
/// fail per request.
pub async fn serve(config: ServiceConfig) -> Result<(), KitchenError> {
    info!("Initializing state...");
    let model = LlmGateway::from_config(&config)?;
    info!("Model: {} / {}", config.provider_name, config.model);

    let store = MongoHistoryStore::connect(&config.mongo_uri, &config.database).await?;
    store.ping().await;

    let sink = LocalDirSink::new(&config.static_dir, config.static_url_prefix());
    info!("Serving exports from {}", sink.dir().display());

    let service = Arc::new(KitchenService::new(
        Arc::new(model),
        Arc::new(store),
        Arc::new(sink),
        config.geometry,
    ));
    let app = router(service, &config.static_dir);

    let address = config.bind_address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| KitchenError::Internal(format!("failed to bind {address}: {e}")))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| KitchenError::Internal(format!("server error: {e}")))?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
