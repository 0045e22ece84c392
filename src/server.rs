//! Web dashboard and JSON API
//!
//! Pull variant of the pipeline: every inbound request performs one
//! independent run. The human-facing page always degrades gracefully to an
//! inline error banner; only the JSON API surfaces upstream failures as a
//! structured non-2xx response.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use chrono::Utc;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::pipeline::Pipeline;
use crate::render::{PageRenderer, ReportRenderer};
use crate::report::PriceReport;
use crate::scheduler::Scheduler;

pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// Present when the daily push notification is scheduled alongside the
    /// dashboard; used for the health endpoint only.
    pub scheduler: Option<Scheduler>,
    pub started: Instant,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>, scheduler: Option<Scheduler>) -> Self {
        AppState {
            pipeline,
            scheduler,
            started: Instant::now(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(dashboard))
        .route("/api/prices", get(api_prices))
        .route("/health", get(health))
        .route("/test", get(trigger_test_run))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, port: u16) -> anyhow::Result<()> {
    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Dashboard listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received, closing listener");
}

/// `GET /` always returns a renderable document. Upstream failure becomes
/// an inline error banner, never a broken page or a non-2xx status.
async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let report = match state.pipeline.build_report().await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Dashboard report failed, rendering error state");
            PriceReport {
                quotes: vec![],
                portfolio: None,
                usd_to_local: None,
                currency: state.pipeline.config().currency.clone(),
                generated_at: Utc::now().with_timezone(&state.pipeline.display_tz()),
            }
        }
    };
    Html(PageRenderer.render(&report))
}

/// `GET /api/prices` is the one machine-facing surface that reports
/// upstream failure explicitly.
async fn api_prices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.pipeline.build_report().await {
        Ok(report) => Ok(Json(json!({
            "success": true,
            "data": report.quotes,
            "portfolio": report.portfolio,
            "exchangeRate": report.usd_to_local,
            "timestamp": report.generated_at.to_rfc3339(),
        }))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "error": e.to_string() })),
        )),
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let next_schedule = state.scheduler.as_ref().map(|s| {
        s.next_fire(Utc::now())
            .with_timezone(&state.pipeline.display_tz())
            .to_rfc3339()
    });
    Json(json!({
        "status": "ok",
        "uptime": state.started.elapsed().as_secs(),
        "nextSchedule": next_schedule,
        "botConfigured": state.pipeline.bot_configured(),
    }))
}

/// `GET /test` is fire-and-forget: one pipeline run is spawned and the
/// response goes out before it completes.
async fn trigger_test_run(State(state): State<Arc<AppState>>) -> Json<Value> {
    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        if let Err(e) = pipeline.run_notify().await {
            error!(error = %e, "Test-triggered run failed");
        }
    });
    Json(json!({ "status": "triggered" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::providers::coingecko::CoinGeckoSource;
    use crate::providers::exchange_rate::ExchangeRateSource;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveTime;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PRICES_OK: &str = r#"{
        "cookie": {"usd": 0.15, "usd_24h_change": 5.2},
        "bitcoin": {"usd": 65000.0, "usd_24h_change": -1.3},
        "ethereum": {"usd": 3200.5, "usd_24h_change": 2.1}
    }"#;

    fn test_state(price_base: &str, rate_base: &str, with_schedule: bool) -> Arc<AppState> {
        let yaml = r#"
assets:
  - symbol: "COOKIE"
    provider_id: "cookie"
  - symbol: "BTC"
    provider_id: "bitcoin"
  - symbol: "ETH"
    provider_id: "ethereum"
holdings:
  symbol: "COOKIE"
  quantity: 150000.0
"#;
        let config: Arc<AppConfig> = Arc::new(serde_yaml::from_str(yaml).unwrap());
        let pipeline = Arc::new(
            Pipeline::new(
                config,
                Arc::new(CoinGeckoSource::new(price_base).unwrap()),
                Arc::new(ExchangeRateSource::new(rate_base, "AUD").unwrap()),
            )
            .unwrap(),
        );
        let scheduler = with_schedule.then(|| {
            Scheduler::new(
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                chrono_tz::Australia::Brisbane,
            )
        });
        Arc::new(AppState::new(pipeline, scheduler))
    }

    async fn mock_apis() -> (MockServer, MockServer) {
        let prices = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PRICES_OK))
            .mount(&prices)
            .await;

        let rates = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/latest/USD"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"base":"USD","rates":{"AUD":1.52}}"#),
            )
            .mount(&rates)
            .await;

        (prices, rates)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_api_prices_success_envelope() {
        let (prices, rates) = mock_apis().await;
        let app = router(test_state(&prices.uri(), &rates.uri(), false));

        let response = app
            .oneshot(Request::get("/api/prices").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
        assert_eq!(body["data"][0]["symbol"], json!("COOKIE"));
        assert_eq!(body["data"][0]["priceUsd"], json!(0.15));
        assert_eq!(body["exchangeRate"], json!(1.52));
        assert_eq!(body["portfolio"]["symbol"], json!("COOKIE"));
        assert!(body["timestamp"].as_str().unwrap().contains("+10:00"));
    }

    #[tokio::test]
    async fn test_api_prices_failure_is_500_with_envelope() {
        let prices = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&prices)
            .await;

        let app = router(test_state(&prices.uri(), "http://127.0.0.1:1", false));
        let response = app
            .oneshot(Request::get("/api/prices").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_dashboard_renders_cards() {
        let (prices, rates) = mock_apis().await;
        let app = router(test_state(&prices.uri(), &rates.uri(), false));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<h2>COOKIE</h2>"));
        assert!(html.contains("1 USD = 1.52 AUD"));
        assert!(!html.contains("class=\"banner\""));
    }

    #[tokio::test]
    async fn test_dashboard_degrades_to_banner_on_upstream_failure() {
        let prices = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&prices)
            .await;

        let app = router(test_state(&prices.uri(), "http://127.0.0.1:1", false));
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        // Human-facing page must stay 200 with an inline error.
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("class=\"banner\""));
    }

    #[tokio::test]
    async fn test_rate_outage_shows_no_banner() {
        let prices = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PRICES_OK))
            .mount(&prices)
            .await;

        // Exchange-rate API unreachable: fallback rate, no error banner.
        let app = router(test_state(&prices.uri(), "http://127.0.0.1:1", false));
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!html.contains("class=\"banner\""));
        assert!(html.contains("1 USD = 1.55 AUD"));
        assert!(html.contains("<h2>BTC</h2>"));
    }

    #[tokio::test]
    async fn test_health_reports_schedule_and_bot_state() {
        let (prices, rates) = mock_apis().await;
        let app = router(test_state(&prices.uri(), &rates.uri(), true));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], json!("ok"));
        assert!(body["uptime"].is_number());
        assert_eq!(body["botConfigured"], json!(false));
        assert!(body["nextSchedule"].as_str().unwrap().contains("T09:00:00"));
    }

    #[tokio::test]
    async fn test_trigger_endpoint_responds_before_run_completes() {
        let (prices, rates) = mock_apis().await;
        let app = router(test_state(&prices.uri(), &rates.uri(), false));

        let response = app
            .oneshot(Request::get("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], json!("triggered"));
    }
}
