use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Logs every request with method, path, status and duration
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration = start.elapsed();

    if status >= 500 {
        tracing::error!("{} {} -> {} ({}ms)", method, path, status, duration.as_millis());
    } else {
        tracing::info!("{} {} -> {} ({}ms)", method, path, status, duration.as_millis());
    }

    response
}
