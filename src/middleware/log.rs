use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

/// Log every failed request with its method and path. Bodies are never
/// logged, so credentials cannot leak into the log stream.
pub async fn log_failures(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let resp = next.run(req).await;

    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        warn!(%method, path, status = status.as_u16(), "request failed");
    }
    resp
}
