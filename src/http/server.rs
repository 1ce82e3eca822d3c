//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the upstream clients and the shared handler state
//! - Mount every endpoint on one Axum router
//! - Wire up middleware (request id, tracing, CORS, timeout, body limit, metrics)
//! - Serve until the shutdown broadcast fires
//!
//! # Layer Order (outermost first)
//! ```text
//! SetRequestId → Trace → PropagateRequestId → CORS → Timeout → BodyLimit
//!     → metrics (matched routes only) → handler
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::chat::ChatClient;
use crate::config::{GatewayConfig, LimitConfig};
use crate::flights::{Aggregator, FlightAwareClient};
use crate::http::cors::cors_layer;
use crate::http::handlers::{self, chat, flights, vehicles};
use crate::http::request::{request_id_of, UuidRequestId, X_REQUEST_ID};
use crate::observability::metrics;
use crate::upstream::UpstreamResult;
use crate::vehicles::AutoDevClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub flights: FlightAwareClient,
    pub aggregator: Arc<Aggregator<FlightAwareClient>>,
    pub vehicles: AutoDevClient,
    pub chat: ChatClient,
    pub limits: LimitConfig,
}

impl AppState {
    pub fn from_config(config: &GatewayConfig) -> UpstreamResult<Self> {
        let upstream_timeout = Duration::from_secs(config.timeouts.upstream_secs);
        let flights = FlightAwareClient::new(&config.flightaware, upstream_timeout)?;

        Ok(Self {
            aggregator: Arc::new(Aggregator::brazil_usa(flights.clone())),
            flights,
            vehicles: AutoDevClient::new(&config.autodev, upstream_timeout)?,
            chat: ChatClient::new(&config.chat, upstream_timeout)?,
            limits: config.limits.clone(),
        })
    }
}

/// HTTP front end of the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server. Fails only if an upstream HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> UpstreamResult<Self> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/testConnection", get(flights::test_connection))
            .route(
                "/searchFlight",
                get(flights::search_flight).post(flights::search_flight),
            )
            .route("/getAirportFlights", get(flights::airport_flights))
            .route("/getBrazilUsaFlights", get(flights::brazil_usa_flights))
            .route("/getFlightDetails", get(flights::flight_details))
            .route("/getRouteFlights", get(flights::route_flights))
            .route("/getCarPhotos", get(vehicles::car_photos))
            .route("/getCarPhotoProxy", get(vehicles::car_photo_proxy))
            .route("/ai-chat", post(chat::ai_chat))
            .route("/health", get(handlers::health))
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(cors_layer(&config.cors))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id_of(request),
                    )
                }),
            )
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let method = request.method().to_string();

    let response = next.run(request).await;
    metrics::record_request(&route, &method, response.status().as_u16(), start);
    response
}
