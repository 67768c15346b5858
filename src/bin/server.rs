//! REST API server for Iranian bank card detection.
//!
//! # Usage
//!
//! ```bash
//! # Start server
//! iran-banks-server
//!
//! # With custom port and bind address
//! iran-banks-server --port 8080 --bind 127.0.0.1
//!
//! # With a JSON bank registry (reloadable through POST /banks/reload)
//! iran-banks-server --registry banks.json
//! ```
//!
//! Every flag can also be set through the environment: `IRAN_BANKS_PORT`,
//! `IRAN_BANKS_BIND` and `IRAN_BANKS_REGISTRY`.
//!
//! # Swagger UI
//!
//! Visit http://localhost:3000/swagger-ui/ for interactive API documentation.

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use iran_banks::bank::JsonBankLoader;
use iran_banks::messages::DEFAULT_LANGUAGE;
use iran_banks::{mask_card_number, BankDetector, RegistryError, ValidationResult};

// ============================================================================
// OpenAPI Documentation
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Iranian Bank Card API",
        version = "0.1.0",
        description = "Detects the issuing bank of an Iranian card number and validates it. Messages are available in English and Persian. No auth or rate limiting.",
        license(name = "MIT"),
        contact(name = "API Support")
    ),
    tags(
        (name = "Detection", description = "Card number validation and bank detection"),
        (name = "Banks", description = "Bank registry endpoints"),
        (name = "System", description = "Health and status endpoints")
    ),
    paths(
        detect_card,
        detect_batch,
        list_banks,
        reload_banks,
        health,
    ),
    components(schemas(
        DetectRequest,
        DetectResponse,
        BatchDetectRequest,
        BatchDetectResponse,
        BatchSummary,
        BanksResponse,
        HealthResponse,
    ))
)]
struct ApiDoc;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"card_number": "6037-9912-3456-7893", "language": "fa"}))]
struct DetectRequest {
    /// Card number to validate. Any non-digit characters are ignored.
    card_number: String,
    /// Message language ("en" or "fa"). Defaults to the highest-quality Accept-Language tag, then English.
    #[serde(default)]
    language: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "valid": true,
    "message": "Detected Bank: بانک ملی",
    "bin_code": "603799",
    "masked": "603799******7893"
}))]
struct DetectResponse {
    /// Whether the card number passed every check (format, bank code, Luhn checksum)
    valid: bool,
    /// Localized message describing the outcome
    message: String,
    /// Six-digit bank code, present only for valid cards
    #[serde(skip_serializing_if = "Option::is_none")]
    bin_code: Option<String>,
    /// Masked card number (safe for logging and display)
    masked: String,
    /// Failure reason: invalid_format, unknown_bank or checksum_failed
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DetectResponse {
    fn new(card_number: &str, result: ValidationResult) -> Self {
        Self {
            valid: result.valid,
            error: result
                .error
                .as_ref()
                .map(|e| e.message_key().as_str().to_string()),
            message: result.message,
            bin_code: result.bin_code,
            masked: mask_card_number(card_number),
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"card_numbers": ["6037991234567893", "6104331234567890", "1234"], "language": "en"}))]
struct BatchDetectRequest {
    /// Card numbers to validate
    card_numbers: Vec<String>,
    /// Message language for every result
    #[serde(default)]
    language: Option<String>,
}

#[derive(Serialize, ToSchema)]
struct BatchDetectResponse {
    /// Results in request order
    results: Vec<DetectResponse>,
    /// Summary statistics
    summary: BatchSummary,
}

#[derive(Serialize, ToSchema)]
struct BatchSummary {
    /// Total cards processed
    total: usize,
    /// Number of valid cards
    valid: usize,
    /// Number of invalid cards
    invalid: usize,
}

#[derive(Serialize, ToSchema)]
struct BanksResponse {
    /// Number of known banks
    count: usize,
    /// Bank names keyed by six-digit code
    banks: BTreeMap<String, String>,
}

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    /// Service status
    status: String,
    /// API version
    version: String,
    /// Number of banks in the current table
    banks: usize,
}

// ============================================================================
// State
// ============================================================================

struct AppState {
    detector: BankDetector,
    registry: Option<PathBuf>,
}

type SharedState = Arc<AppState>;

// ============================================================================
// Handlers
// ============================================================================

/// Detect the issuing bank of a card number
#[utoipa::path(
    post,
    path = "/detect",
    request_body = DetectRequest,
    responses(
        (status = 200, description = "Detection result", body = DetectResponse)
    ),
    tag = "Detection"
)]
async fn detect_card(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(req): Json<DetectRequest>,
) -> Json<DetectResponse> {
    let language = request_language(req.language.as_deref(), &headers);
    let result = state.detector.detect_bank(&req.card_number, &language);
    Json(DetectResponse::new(&req.card_number, result))
}

/// Detect the issuing bank of many card numbers
#[utoipa::path(
    post,
    path = "/detect/batch",
    request_body = BatchDetectRequest,
    responses(
        (status = 200, description = "Batch detection results", body = BatchDetectResponse)
    ),
    tag = "Detection"
)]
async fn detect_batch(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(req): Json<BatchDetectRequest>,
) -> Json<BatchDetectResponse> {
    let language = request_language(req.language.as_deref(), &headers);
    let batch = iran_banks::BatchDetector::new(&state.detector);

    let results: Vec<DetectResponse> = req
        .card_numbers
        .iter()
        .zip(batch.detect_all(&req.card_numbers, &language))
        .map(|(card, result)| DetectResponse::new(card, result))
        .collect();

    let valid_count = results.iter().filter(|r| r.valid).count();

    Json(BatchDetectResponse {
        summary: BatchSummary {
            total: results.len(),
            valid: valid_count,
            invalid: results.len() - valid_count,
        },
        results,
    })
}

/// List all known banks
#[utoipa::path(
    get,
    path = "/banks",
    responses(
        (status = 200, description = "Known banks", body = BanksResponse)
    ),
    tag = "Banks"
)]
async fn list_banks(State(state): State<SharedState>) -> Json<BanksResponse> {
    let banks: BTreeMap<String, String> = state.detector.get_all_banks().into_iter().collect();
    Json(BanksResponse {
        count: banks.len(),
        banks,
    })
}

/// Reload banks from the configured registry file
#[utoipa::path(
    post,
    path = "/banks/reload",
    responses(
        (status = 200, description = "Banks reloaded", body = BanksResponse),
        (status = 404, description = "No registry file configured"),
        (status = 500, description = "Registry could not be loaded")
    ),
    tag = "Banks"
)]
async fn reload_banks(
    State(state): State<SharedState>,
) -> Result<Json<BanksResponse>, (StatusCode, String)> {
    let path = state.registry.as_ref().ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            "No registry file configured".to_string(),
        )
    })?;

    let table = JsonBankLoader::from_file(path).map_err(|e| {
        tracing::error!(error = %e, "registry reload failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    state.detector.publish(table);
    tracing::info!(registry = %path.display(), "bank registry reloaded");

    Ok(list_banks(State(state)).await)
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "System"
)]
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        banks: state.detector.table().len(),
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Picks the message language from the request body or Accept-Language.
///
/// From the header, the tag with the highest quality wins; ties keep header
/// order. Tags with `q=0` and the `*` wildcard are ignored.
fn request_language(explicit: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(language) = explicit.filter(|l| !l.trim().is_empty()) {
        return language.to_string();
    }

    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(preferred_language)
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

fn preferred_language(accept_language: &str) -> Option<String> {
    let mut best: Option<(&str, f32)> = None;

    for entry in accept_language.split(',') {
        let mut parts = entry.split(';');
        let tag = parts.next().unwrap_or_default().trim();
        let quality = parts
            .find_map(|param| param.trim().strip_prefix("q="))
            .map_or(Some(1.0), |q| q.trim().parse::<f32>().ok());

        let Some(quality) = quality else { continue };
        if tag.is_empty() || tag == "*" || quality <= 0.0 {
            continue;
        }
        if best.map_or(true, |(_, q)| quality > q) {
            best = Some((tag, quality));
        }
    }

    best.map(|(tag, _)| tag.to_string())
}

/// Reads `--flag value` from the command line, falling back to `env`.
fn setting(flag: &str, env: &str) -> Option<String> {
    std::env::args()
        .skip_while(|a| a != flag)
        .nth(1)
        .or_else(|| std::env::var(env).ok())
}

struct Config {
    addr: SocketAddr,
    registry: Option<PathBuf>,
}

impl Config {
    fn from_env() -> Self {
        let port: u16 = setting("--port", "IRAN_BANKS_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let bind: IpAddr = setting("--bind", "IRAN_BANKS_BIND")
            .and_then(|b| b.parse().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        Self {
            addr: SocketAddr::new(bind, port),
            registry: setting("--registry", "IRAN_BANKS_REGISTRY").map(PathBuf::from),
        }
    }
}

fn load_detector(registry: Option<&PathBuf>) -> Result<BankDetector, RegistryError> {
    match registry {
        Some(path) => {
            let table = JsonBankLoader::from_file(path)?;
            tracing::info!(registry = %path.display(), banks = table.len(), "loaded bank registry");
            Ok(BankDetector::with_table(table))
        }
        None => Ok(BankDetector::new()),
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let detector = load_detector(config.registry.as_ref())?;
    let state: SharedState = Arc::new(AppState {
        detector,
        registry: config.registry,
    });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ACCEPT_LANGUAGE])
        .allow_origin(Any);

    // Build router with Swagger UI
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/detect", post(detect_card))
        .route("/detect/batch", post(detect_batch))
        .route("/banks", get(list_banks))
        .route("/banks/reload", post(reload_banks))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    tracing::info!("Starting server on http://{}", config.addr);
    tracing::info!(
        "Swagger UI available at http://{}:{}/swagger-ui/",
        "localhost",
        config.addr.port()
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
