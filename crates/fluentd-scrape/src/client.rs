//! HTTP client for the monitor agent endpoint.
//!
//! Fetches `/api/plugins.json` over a plain HTTP/1 connection with a
//! single deadline covering connect, request, and body read.

use std::time::Duration;

use http_body_util::BodyExt;
use tracing::debug;

use crate::error::{ScrapeError, ScrapeResult};
use crate::types::PluginsSnapshot;

/// Path of the monitor agent's plugin stats document.
const PLUGINS_PATH: &str = "/api/plugins.json";

/// Client for one monitor agent endpoint.
#[derive(Debug, Clone)]
pub struct MonitorClient {
    /// `host:port` to connect to.
    authority: String,
    /// Path prefix from the endpoint URL, usually empty.
    base_path: String,
    /// Deadline for one whole fetch.
    timeout: Duration,
}

impl MonitorClient {
    /// Create a client for `endpoint`, e.g. `http://localhost:24220`.
    ///
    /// Only plain `http` endpoints are accepted; the monitor agent does
    /// not serve TLS.
    pub fn new(endpoint: &str, timeout: Duration) -> ScrapeResult<Self> {
        let uri: http::Uri = endpoint
            .parse()
            .map_err(|e| ScrapeError::Endpoint(format!("{endpoint}: {e}")))?;

        match uri.scheme_str() {
            None | Some("http") => {}
            Some(other) => {
                return Err(ScrapeError::Endpoint(format!(
                    "unsupported scheme {other}: {endpoint}"
                )));
            }
        }

        let host = uri
            .host()
            .ok_or_else(|| ScrapeError::Endpoint(format!("missing host: {endpoint}")))?;
        let port = uri.port_u16().unwrap_or(80);
        let base_path = uri.path().trim_end_matches('/').to_string();

        Ok(Self {
            authority: format!("{host}:{port}"),
            base_path,
            timeout,
        })
    }

    /// Fetch and decode one plugin snapshot.
    pub async fn fetch_plugins(&self) -> ScrapeResult<PluginsSnapshot> {
        let body = self.fetch().await?;
        PluginsSnapshot::decode(&body)
    }

    /// Issue the GET and return the raw body on a 2xx response.
    ///
    /// Connection errors, timeouts, and non-2xx statuses all collapse
    /// into [`ScrapeError::Fetch`].
    pub async fn fetch(&self) -> ScrapeResult<bytes::Bytes> {
        let uri = format!("http://{}{}{}", self.authority, self.base_path, PLUGINS_PATH);

        match tokio::time::timeout(self.timeout, self.fetch_inner(&uri)).await {
            Ok(result) => result,
            Err(_) => {
                debug!(%uri, "fetch timed out");
                Err(ScrapeError::Fetch(format!(
                    "timed out after {:?}: {uri}",
                    self.timeout
                )))
            }
        }
    }

    async fn fetch_inner(&self, uri: &str) -> ScrapeResult<bytes::Bytes> {
        let stream = tokio::net::TcpStream::connect(&self.authority)
            .await
            .map_err(|e| ScrapeError::Fetch(format!("connect {}: {e}", self.authority)))?;

        let io = hyper_util::rt::TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| ScrapeError::Fetch(format!("handshake: {e}")))?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let req = http::Request::builder()
            .method("GET")
            .uri(uri)
            .header("host", &self.authority)
            .header("user-agent", "fluentd-exporter/0.1")
            .body(http_body_util::Empty::<bytes::Bytes>::new())
            .map_err(|e| ScrapeError::Fetch(format!("request build: {e}")))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| ScrapeError::Fetch(format!("request: {e}")))?;

        if !resp.status().is_success() {
            debug!(status = %resp.status(), %uri, "non-2xx from monitor agent");
            return Err(ScrapeError::Fetch(format!(
                "status {}: {uri}",
                resp.status()
            )));
        }

        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| ScrapeError::Fetch(format!("body read: {e}")))?;

        Ok(body.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Spin up a stub monitor agent on a free port and return its
    /// endpoint URL.
    async fn serve_stub(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn plugins_app(body: &'static str) -> axum::Router {
        axum::Router::new().route("/api/plugins.json", axum::routing::get(move || async move { body }))
    }

    #[test]
    fn endpoint_with_port() {
        let client = MonitorClient::new("http://localhost:24220", Duration::from_secs(5)).unwrap();
        assert_eq!(client.authority, "localhost:24220");
        assert_eq!(client.base_path, "");
    }

    #[test]
    fn endpoint_without_port_defaults_to_80() {
        let client = MonitorClient::new("http://fluentd.internal", Duration::from_secs(5)).unwrap();
        assert_eq!(client.authority, "fluentd.internal:80");
    }

    #[test]
    fn endpoint_trailing_slash_stripped() {
        let client =
            MonitorClient::new("http://localhost:24220/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_path, "");
    }

    #[test]
    fn endpoint_with_path_prefix() {
        let client =
            MonitorClient::new("http://localhost:24220/fluentd", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_path, "/fluentd");
    }

    #[test]
    fn endpoint_https_rejected() {
        let err = MonitorClient::new("https://localhost:24220", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ScrapeError::Endpoint(_)));
    }

    #[test]
    fn endpoint_missing_host_rejected() {
        let err = MonitorClient::new("/just/a/path", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ScrapeError::Endpoint(_)));
    }

    #[test]
    fn endpoint_garbage_rejected() {
        let err = MonitorClient::new("not a url at all", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ScrapeError::Endpoint(_)));
    }

    #[tokio::test]
    async fn fetch_plugins_success() {
        let endpoint = serve_stub(plugins_app(
            r#"{"plugins":[{"plugin_id":"out1","type":"file","output_plugin":true,"buffer_queue_length":3,"buffer_total_queued_size":1024,"retry_count":0}]}"#,
        ))
        .await;

        let client = MonitorClient::new(&endpoint, Duration::from_secs(2)).unwrap();
        let snapshot = client.fetch_plugins().await.unwrap();

        assert_eq!(snapshot.plugins.len(), 1);
        assert_eq!(snapshot.plugins[0].plugin_id, "out1");
    }

    #[tokio::test]
    async fn fetch_connection_refused() {
        // Bind then drop to get a port nothing is listening on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            MonitorClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        let err = client.fetch_plugins().await.unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch(_)));
    }

    #[tokio::test]
    async fn fetch_non_2xx_is_fetch_error() {
        let app = axum::Router::new().route(
            "/api/plugins.json",
            axum::routing::get(|| async {
                (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom")
            }),
        );
        let endpoint = serve_stub(app).await;

        let client = MonitorClient::new(&endpoint, Duration::from_secs(2)).unwrap();
        let err = client.fetch_plugins().await.unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch(_)));
    }

    #[tokio::test]
    async fn fetch_malformed_body_is_decode_error() {
        let endpoint = serve_stub(plugins_app(r#"{"plugins":[{"plugin_id""#)).await;

        let client = MonitorClient::new(&endpoint, Duration::from_secs(2)).unwrap();
        let err = client.fetch_plugins().await.unwrap_err();
        assert!(matches!(err, ScrapeError::Decode(_)));
    }

    #[tokio::test]
    async fn fetch_slow_upstream_times_out() {
        let app = axum::Router::new().route(
            "/api/plugins.json",
            axum::routing::get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "{}"
            }),
        );
        let endpoint = serve_stub(app).await;

        let client = MonitorClient::new(&endpoint, Duration::from_millis(50)).unwrap();
        let err = client.fetch_plugins().await.unwrap_err();
        match err {
            ScrapeError::Fetch(msg) => assert!(msg.contains("timed out"), "got: {msg}"),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_honors_path_prefix() {
        let app = axum::Router::new().route(
            "/fluentd/api/plugins.json",
            axum::routing::get(|| async { r#"{"plugins":[]}"# }),
        );
        let endpoint = serve_stub(app).await;

        let client =
            MonitorClient::new(&format!("{endpoint}/fluentd"), Duration::from_secs(2)).unwrap();
        let snapshot = client.fetch_plugins().await.unwrap();
        assert!(snapshot.plugins.is_empty());
    }
}
