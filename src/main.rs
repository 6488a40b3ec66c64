mod classifier;
mod config;
mod error;
mod normalize;
mod otp;
mod types;

use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::Parser;
use metrics::counter;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use classifier::{Classifier, HttpClassifier};
use config::Config;
use error::ApiError;
use normalize::normalize;
use otp::{InMemoryOtpStore, OtpStore, generate_code};
use types::{
    ClassifyRequest, ClassifyResponse, ComplaintResponse, HealthResponse, SendOtpRequest,
    SendOtpResponse, VerifyOtpRequest, VerifyOtpResponse,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,railaid_gateway=debug".into()),
        )
        .init();

    let config = Config::parse();
    tracing::info!("Starting gateway with config: {:?}", config);

    let otp_store: Arc<dyn OtpStore> = Arc::new(InMemoryOtpStore::new());
    let http_classifier = HttpClassifier::new(config.classifier_url.clone())?;
    let state = AppState::new(otp_store, Arc::new(http_classifier));

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = app(state)
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(config.max_body_bytes));

    let listener = TcpListener::bind(&config.server_address()).await?;
    tracing::info!("Gateway listening on http://{}", config.server_address());
    tracing::info!(
        "Classifier endpoint: {}, body limit: {} bytes",
        config.classifier_url,
        config.max_body_bytes
    );

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Clone)]
struct AppState {
    otp_store: Arc<dyn OtpStore>,
    classifier: Arc<dyn Classifier>,
}

impl AppState {
    fn new(otp_store: Arc<dyn OtpStore>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            otp_store,
            classifier,
        }
    }
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/send-otp", post(send_otp_handler))
        .route("/api/auth/verify-otp", post(verify_otp_handler))
        .route("/api/health", get(health_handler))
        .route("/api/complaints", post(submit_complaint_handler))
        .route("/api/classify", post(classify_handler))
        .with_state(state)
}

#[tracing::instrument(skip(state, request))]
async fn send_otp_handler(
    State(state): State<AppState>,
    Json(request): Json<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>, ApiError> {
    let phone = request
        .phone
        .filter(|phone| !phone.is_empty())
        .ok_or_else(|| ApiError::Validation("phone required".to_string()))?;

    let code = generate_code();
    state.otp_store.set(&phone, code.clone()).await;
    counter!("otp_issued_total").increment(1);

    // Delivery is the SMS provider's job; until that integration lands the
    // code is logged for operator visibility.
    tracing::info!(%phone, %code, "issued one-time passcode");

    Ok(Json(SendOtpResponse {
        ok: true,
        phone,
        otp_sent: true,
    }))
}

#[tracing::instrument(skip(state, request))]
async fn verify_otp_handler(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<(StatusCode, Json<VerifyOtpResponse>), ApiError> {
    let (Some(phone), Some(otp)) = (
        request.phone.filter(|phone| !phone.is_empty()),
        request.otp.filter(|otp| !otp.is_empty()),
    ) else {
        return Err(ApiError::Validation("phone and otp required".to_string()));
    };

    // A mismatch is a normal outcome and leaves the entry in place for retry.
    if state.otp_store.consume(&phone, &otp).await {
        counter!("otp_verified_total").increment(1);
        tracing::info!(%phone, "passcode verified");
        Ok((
            StatusCode::OK,
            Json(VerifyOtpResponse {
                ok: true,
                verified: true,
            }),
        ))
    } else {
        counter!("otp_rejected_total").increment(1);
        tracing::debug!(%phone, "passcode mismatch");
        Ok((
            StatusCode::BAD_REQUEST,
            Json(VerifyOtpResponse {
                ok: false,
                verified: false,
            }),
        ))
    }
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Persistence is delegated to an external document store; this endpoint only
/// acknowledges the submission.
async fn submit_complaint_handler(Json(_complaint): Json<Value>) -> Json<ComplaintResponse> {
    Json(ComplaintResponse {
        ok: true,
        id: chrono::Utc::now().timestamp_millis().to_string(),
    })
}

#[tracing::instrument(skip(state, request))]
async fn classify_handler(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    counter!("classify_requests_total").increment(1);

    let (Some(description), Some(photo_base64)) = (
        request.description.filter(|description| !description.is_empty()),
        request.photo_base64.filter(|photo| !photo.is_empty()),
    ) else {
        return Err(ApiError::ClassifyValidation(
            "description and photoBase64 are required".to_string(),
        ));
    };

    let image = BASE64.decode(photo_base64.as_bytes()).map_err(|_| {
        ApiError::ClassifyValidation("photoBase64 is not valid base64".to_string())
    })?;

    let raw = state
        .classifier
        .predict(&description, image)
        .await
        .map_err(|err| {
            counter!("classify_failures_total").increment(1);
            ApiError::Upstream(format!("{err:#}"))
        })?;

    let classification = normalize(raw);
    tracing::info!(
        category = ?classification.category,
        confidence = classification.confidence,
        "classification completed"
    );

    Ok(Json(ClassifyResponse {
        ok: true,
        classification,
    }))
}
