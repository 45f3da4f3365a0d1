use crate::error::PipelineError;
use crate::metrics;
use crate::pipeline::{Pipeline, RequestContext};
use axum::{
    extract::Path,
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Extension, Router,
};
use hyper::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "showmap",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn prometheus_metrics() -> impl IntoResponse {
    (
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render(),
    )
}

fn error_response(err: PipelineError) -> Response {
    let status = match err {
        PipelineError::SourceUnavailable { .. } | PipelineError::AuthenticationFailure { .. } => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

async fn query(pipeline: Arc<Pipeline>, ctx: RequestContext) -> Response {
    let mut outcome = None;
    pipeline
        .get_data(ctx, |err, collection| outcome = Some((err, collection)))
        .await;

    match outcome {
        Some((None, Some(collection))) => Json(collection).into_response(),
        Some((Some(err), _)) => error_response(err),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn query_default(Extension(pipeline): Extension<Arc<Pipeline>>) -> Response {
    query(pipeline, RequestContext::default()).await
}

async fn query_metro(
    Extension(pipeline): Extension<Arc<Pipeline>>,
    Path(metro_id): Path<u64>,
) -> Response {
    query(
        pipeline,
        RequestContext {
            metro_area_id: Some(metro_id),
        },
    )
    .await
}

/// Create the HTTP router serving the feature collection
pub fn create_server(pipeline: Arc<Pipeline>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .route("/songkick/FeatureServer/0/query", get(query_default))
        .route("/songkick/:metro_id/FeatureServer/0/query", get(query_metro))
        .layer(Extension(pipeline))
        .layer(ServiceBuilder::new().layer(cors))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
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
    info!("Shutdown signal received");
}

/// Start the HTTP server on the specified port
pub async fn start_server(pipeline: Arc<Pipeline>, port: u16) -> anyhow::Result<()> {
    metrics::init_metrics();
    let metro_area_id = pipeline.metro_area_id();
    let app = create_server(pipeline);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("showmap listening on {}", addr);
    println!("🚀 showmap listening on http://localhost:{port}");
    println!("💚 Health check: http://localhost:{port}/health");
    println!("🗺️  Features:     http://localhost:{port}/songkick/{metro_area_id}/FeatureServer/0/query");

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
