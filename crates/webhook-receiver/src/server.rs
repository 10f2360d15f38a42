use core::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::Extension;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use eyre::Context as _;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::PayloadSink;

/// HTTP server accepting webhook deliveries.
///
/// - `POST /webhook`: stores the JSON body, `200 {"status":"success"}` or `500 {"error":..}`,
///   also when the body is not JSON
/// - `/healthz` and `/readyz`: 200 while the sink is healthy, 503 otherwise
pub struct Server<Sink> {
    bind_address: SocketAddr,
    sink: Arc<Sink>,
}

impl<Sink: PayloadSink> Server<Sink> {
    /// Creates a new `Server` that will listen on `bind_address`
    #[must_use]
    pub const fn new(bind_address: SocketAddr, sink: Arc<Sink>) -> Self {
        Self { bind_address, sink }
    }

    fn router(self) -> Router {
        Router::new()
            .route("/webhook", post(handle_webhook::<Sink>))
            .route("/healthz", get(handle_healthz::<Sink>))
            .route("/readyz", get(handle_readyz::<Sink>))
            .layer(Extension(self.sink))
    }

    /// Serves requests until `cancel_token` is cancelled, then shuts down gracefully
    ///
    /// # Errors
    ///
    /// When the address cannot be bound or the server fails
    pub async fn run(self, cancel_token: CancellationToken) -> eyre::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.bind_address)
            .await
            .wrap_err_with(|| format!("failed to bind to {}", self.bind_address))?;
        tracing::info!(address = %self.bind_address, "webhook receiver listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
            })
            .await
            .wrap_err("webhook receiver error")?;

        tracing::warn!("webhook receiver stopped");
        Ok(())
    }
}

async fn handle_webhook<Sink: PayloadSink>(
    Extension(sink): Extension<Arc<Sink>>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> impl IntoResponse {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::warn!(%rejection, "webhook body is not valid json");
            return error_response(rejection.body_text());
        }
    };
    match sink.store(payload).await {
        Ok(()) => {
            tracing::info!("webhook payload stored");
            (StatusCode::OK, Json(json!({ "status": "success" })))
        }
        Err(err) => {
            tracing::error!(%err, "storing webhook payload failed");
            error_response(err.to_string())
        }
    }
}

// every failure of `/webhook` shares one shape
fn error_response(message: String) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

async fn handle_healthz<Sink: PayloadSink>(
    Extension(sink): Extension<Arc<Sink>>,
) -> impl IntoResponse {
    match sink.check_health().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "HEALTHY" }))),
        Err(err) => {
            tracing::trace!(?err, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "UNHEALTHY" })),
            )
        }
    }
}

async fn handle_readyz<Sink: PayloadSink>(
    Extension(sink): Extension<Arc<Sink>>,
) -> impl IntoResponse {
    match sink.check_health().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "READY" }))),
        Err(err) => {
            tracing::trace!(?err, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "UNREADY" })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicBool, Ordering};
    use core::time::Duration;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use test_log::test;
    use tokio::time::sleep;

    use super::*;
    use crate::SinkError;

    #[derive(Default)]
    struct InMemorySink {
        payloads: Mutex<Vec<serde_json::Value>>,
        broken: AtomicBool,
    }

    impl InMemorySink {
        fn fail(&self) -> Result<(), SinkError> {
            if self.broken.load(Ordering::Relaxed) {
                return Err(SinkError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(())
        }
    }

    impl PayloadSink for InMemorySink {
        async fn store(&self, payload: serde_json::Value) -> Result<(), SinkError> {
            self.fail()?;
            self.payloads.lock().unwrap().push(payload);
            Ok(())
        }

        async fn check_health(&self) -> Result<(), SinkError> {
            self.fail()
        }
    }

    fn get_free_port() -> u16 {
        std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    async fn run_server(sink: Arc<InMemorySink>) -> (String, CancellationToken) {
        let port = get_free_port();
        let cancel_token = CancellationToken::new();
        let server = Server::new(SocketAddr::from(([127, 0, 0, 1], port)), sink);
        tokio::spawn(server.run(cancel_token.clone()));

        // Give the server time to start
        sleep(Duration::from_millis(100)).await;

        (format!("http://127.0.0.1:{port}"), cancel_token)
    }

    #[test(tokio::test)]
    async fn test_payload_is_stored() {
        let sink = Arc::new(InMemorySink::default());
        let (url, cancel_token) = run_server(Arc::clone(&sink)).await;
        let payload = json!([{ "type": "NFT_BID", "signature": "5h6x", "amount": 1_500_000 }]);

        let resp = reqwest::Client::new()
            .post(format!("{url}/webhook"))
            .json(&payload)
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), r#"{"status":"success"}"#);
        assert_eq!(*sink.payloads.lock().unwrap(), vec![payload]);
        cancel_token.cancel();
    }

    #[test(tokio::test)]
    async fn test_sink_failure_reports_error() {
        let sink = Arc::new(InMemorySink::default());
        sink.broken.store(true, Ordering::Relaxed);
        let (url, cancel_token) = run_server(Arc::clone(&sink)).await;

        let resp = reqwest::Client::new()
            .post(format!("{url}/webhook"))
            .json(&json!({ "type": "LOAN" }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 500);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(
            body["error"],
            SinkError::Database(sqlx::Error::PoolTimedOut).to_string()
        );
        assert!(sink.payloads.lock().unwrap().is_empty());
        cancel_token.cancel();
    }

    #[test(tokio::test)]
    async fn test_invalid_body_reports_error() {
        let sink = Arc::new(InMemorySink::default());
        let (url, cancel_token) = run_server(Arc::clone(&sink)).await;

        for request in [
            reqwest::Client::new()
                .post(format!("{url}/webhook"))
                .body("not json"),
            reqwest::Client::new()
                .post(format!("{url}/webhook"))
                .header("content-type", "application/json")
                .body("{\"type\": "),
        ] {
            let resp = request.send().await.unwrap();

            assert_eq!(resp.status(), 500);
            let body: serde_json::Value = resp.json().await.unwrap();
            assert!(body["error"].as_str().is_some_and(|error| !error.is_empty()));
        }
        assert!(sink.payloads.lock().unwrap().is_empty());
        cancel_token.cancel();
    }

    #[test(tokio::test)]
    async fn test_probes_follow_sink_health() {
        let sink = Arc::new(InMemorySink::default());
        let (url, cancel_token) = run_server(Arc::clone(&sink)).await;

        let resp = reqwest::get(format!("{url}/healthz")).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), r#"{"status":"HEALTHY"}"#);
        let resp = reqwest::get(format!("{url}/readyz")).await.unwrap();
        assert_eq!(resp.text().await.unwrap(), r#"{"status":"READY"}"#);

        sink.broken.store(true, Ordering::Relaxed);
        let resp = reqwest::get(format!("{url}/healthz")).await.unwrap();
        assert_eq!(resp.status(), 503);
        assert_eq!(resp.text().await.unwrap(), r#"{"status":"UNHEALTHY"}"#);
        let resp = reqwest::get(format!("{url}/readyz")).await.unwrap();
        assert_eq!(resp.status(), 503);
        assert_eq!(resp.text().await.unwrap(), r#"{"status":"UNREADY"}"#);
        cancel_token.cancel();
    }

    #[test(tokio::test)]
    async fn test_cancellation_stops_server() {
        let sink = Arc::new(InMemorySink::default());
        let (url, cancel_token) = run_server(sink).await;
        assert_eq!(reqwest::get(format!("{url}/healthz")).await.unwrap().status(), 200);

        cancel_token.cancel();
        sleep(Duration::from_millis(100)).await;

        assert!(reqwest::get(format!("{url}/healthz")).await.is_err());
    }
}
