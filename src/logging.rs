use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started_at.elapsed().as_millis();

    // For `/sse` this measures time to headers, not the session length.
    info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = elapsed_ms,
        "request summary"
    );

    if status.is_server_error() {
        warn!(method = %method, path = %path, "request failed");
    }

    response
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;
    use tracing_subscriber::fmt::MakeWriter;

    use super::request_logging_middleware;

    #[derive(Clone, Default)]
    struct LogBuf {
        buf: Arc<Mutex<Vec<u8>>>,
    }

    struct LogBufGuard {
        buf: Arc<Mutex<Vec<u8>>>,
    }

    impl<'a> MakeWriter<'a> for LogBuf {
        type Writer = LogBufGuard;

        fn make_writer(&'a self) -> Self::Writer {
            LogBufGuard {
                buf: self.buf.clone(),
            }
        }
    }

    impl io::Write for LogBufGuard {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.buf.lock().expect("lock log buf").extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    async fn logged_request(status: StatusCode) -> String {
        let logs = LogBuf::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = Router::new()
            .route("/target", get(move || async move { status }))
            .layer(middleware::from_fn(request_logging_middleware));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/target")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), status);

        let bytes = logs.buf.lock().expect("lock log buf").clone();
        String::from_utf8(bytes).expect("utf8 logs")
    }

    #[tokio::test]
    async fn server_errors_are_warned() {
        let logs = logged_request(StatusCode::INTERNAL_SERVER_ERROR).await;
        assert!(logs.contains("request summary"));
        assert!(logs.contains("WARN"));
        assert!(logs.contains("request failed"));
    }

    #[tokio::test]
    async fn successful_requests_only_log_summary() {
        let logs = logged_request(StatusCode::OK).await;
        assert!(logs.contains("request summary"));
        assert!(logs.contains("status=200"));
        assert!(!logs.contains("request failed"));
    }
}
