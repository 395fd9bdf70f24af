//! HTTP client for catalyst health and status endpoints.

use std::time::{Duration, Instant};

use reqwest::StatusCode;

use realm_types::{HealthReport, Node, PingResult, StatusPayload};

use crate::prober::CatalystProber;

/// Default bound on a single health or status request.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default health endpoint, relative to the node domain.
pub const DEFAULT_HEALTH_PATH: &str = "lambdas/health";

/// Default status endpoint, relative to the node domain.
pub const DEFAULT_STATUS_PATH: &str = "comms/status";

/// Client for probing catalysts.
///
/// Sends `GET {domain}/{health_path}` and `GET {domain}/{status_path}` and
/// classifies the responses. Every request is bounded by `timeout`; when the
/// bound expires the in-flight request is dropped.
pub struct CatalystClient {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    timeout: Duration,
    health_path: String,
    status_path: String,
}

impl CatalystClient {
    /// Create a new client with the default timeout and endpoint paths.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_PROBE_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            timeout,
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            status_path: DEFAULT_STATUS_PATH.to_string(),
        }
    }

    /// Override the health and status endpoint paths.
    pub fn with_paths(mut self, health_path: &str, status_path: &str) -> Self {
        self.health_path = health_path.trim_start_matches('/').to_string();
        self.status_path = status_path.trim_start_matches('/').to_string();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `GET {domain}/{health_path}` -> per-sub-service health map.
    ///
    /// Timeouts, transport errors, non-success statuses and unparseable bodies
    /// all produce an empty (unhealthy) report.
    pub async fn fetch_health(&self, node: &Node) -> HealthReport {
        let url = node.endpoint(&self.health_path);
        let request = async {
            let response = self.http_client.get(&url).send().await?.error_for_status()?;
            response.json::<HealthReport>().await
        };

        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(report)) => {
                tracing::debug!(
                    domain = %node,
                    healthy = report.is_healthy(),
                    services = report.services.len(),
                    "health probe completed"
                );
                report
            }
            Ok(Err(e)) => {
                tracing::debug!(domain = %node, error = %e, "health probe failed");
                HealthReport::empty()
            }
            Err(_) => {
                tracing::debug!(domain = %node, timeout_ms = self.timeout.as_millis() as u64, "health probe timed out");
                HealthReport::empty()
            }
        }
    }

    /// `GET {domain}/{status_path}[?includeLayers=true]` -> latency + payload.
    ///
    /// Elapsed time runs from sending the request until the body is read.
    /// Anything other than a 200 is unreachable; a 200 with an unparseable
    /// body is the empty result.
    pub async fn fetch_status(&self, node: &Node, include_layers: bool) -> PingResult {
        let mut url = node.endpoint(&self.status_path);
        if include_layers {
            url.push_str("?includeLayers=true");
        }

        let started = Instant::now();
        let exchange = async {
            let response = self.http_client.get(&url).send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(exchange)) => exchange,
            Ok(Err(e)) => {
                tracing::debug!(domain = %node, error = %e, "status probe failed");
                return PingResult::unreachable();
            }
            Err(_) => {
                tracing::debug!(domain = %node, timeout_ms = self.timeout.as_millis() as u64, "status probe timed out");
                return PingResult::unreachable();
            }
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if status != StatusCode::OK {
            tracing::debug!(domain = %node, %status, "status probe returned non-200");
            return PingResult::unreachable();
        }

        match serde_json::from_str::<StatusPayload>(&body) {
            Ok(payload) => {
                tracing::debug!(domain = %node, elapsed_ms, name = %payload.name, "status probe completed");
                PingResult::ok(elapsed_ms, payload)
            }
            Err(e) => {
                tracing::warn!(domain = %node, error = %e, "unparseable status payload");
                PingResult::empty()
            }
        }
    }
}

impl Default for CatalystClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalystProber for CatalystClient {
    fn check_health(&self, node: &Node) -> impl std::future::Future<Output = HealthReport> + Send {
        self.fetch_health(node)
    }

    fn ping(
        &self,
        node: &Node,
        include_layers: bool,
    ) -> impl std::future::Future<Output = PingResult> + Send {
        self.fetch_status(node, include_layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use realm_types::PingStatus;

    fn node_for(server: &mockito::ServerGuard) -> Node {
        Node::new(&server.url()).unwrap()
    }

    /// A node that accepts connections and never answers.
    async fn silent_node() -> (Node, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        (Node::new(&format!("http://{addr}")).unwrap(), task)
    }

    #[test]
    fn client_uses_default_paths_and_timeout() {
        let client = CatalystClient::new();
        assert_eq!(client.timeout(), DEFAULT_PROBE_TIMEOUT);
        assert_eq!(client.health_path, DEFAULT_HEALTH_PATH);
        assert_eq!(client.status_path, DEFAULT_STATUS_PATH);
    }

    #[test]
    fn with_paths_strips_leading_slash() {
        let client = CatalystClient::new().with_paths("/health", "/status");
        assert_eq!(client.health_path, "health");
        assert_eq!(client.status_path, "status");
    }

    #[tokio::test]
    async fn healthy_node_reports_all_services() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/lambdas/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"comms":"HEALTHY","content":"HEALTHY","lambda":"HEALTHY"}"#)
            .create_async()
            .await;

        let report = CatalystClient::new().fetch_health(&node_for(&server)).await;
        mock.assert_async().await;
        assert!(report.is_healthy());
        assert_eq!(report.services.len(), 3);
    }

    #[tokio::test]
    async fn degraded_service_marks_node_unhealthy() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/lambdas/health")
            .with_status(200)
            .with_body(r#"{"comms":"HEALTHY","content":"UNHEALTHY"}"#)
            .create_async()
            .await;

        let report = CatalystClient::new().fetch_health(&node_for(&server)).await;
        assert!(!report.is_healthy());
    }

    #[tokio::test]
    async fn server_error_is_unhealthy_with_empty_report() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/lambdas/health")
            .with_status(503)
            .create_async()
            .await;

        let report = CatalystClient::new().fetch_health(&node_for(&server)).await;
        assert_eq!(report, HealthReport::empty());
    }

    #[tokio::test]
    async fn malformed_health_body_is_unhealthy() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/lambdas/health")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;
        let report = CatalystClient::new().fetch_health(&node_for(&server)).await;
        assert_eq!(report, HealthReport::empty());
    }

    #[tokio::test]
    async fn non_map_health_body_is_unhealthy() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/lambdas/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"["HEALTHY"]"#)
            .create_async()
            .await;
        let report = CatalystClient::new().fetch_health(&node_for(&server)).await;
        assert!(!report.is_healthy());
        assert_eq!(report, HealthReport::empty());
    }

    #[tokio::test]
    async fn connection_refused_is_unhealthy() {
        let node = Node::new("http://127.0.0.1:1").unwrap();
        let report = CatalystClient::new().fetch_health(&node).await;
        assert!(!report.is_healthy());
    }

    #[tokio::test]
    async fn health_timeout_yields_empty_report() {
        let (node, task) = silent_node().await;
        let client = CatalystClient::with_timeout(Duration::from_millis(200));
        let report = client.fetch_health(&node).await;
        assert_eq!(report, HealthReport::empty());
        task.abort();
    }

    #[tokio::test]
    async fn status_probe_requests_layers_and_measures_latency() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/comms/status")
            .match_query(Matcher::UrlEncoded("includeLayers".into(), "true".into()))
            .with_status(200)
            .with_body(
                r#"{"name":"peer-ec1","version":"1.0.0","env":{"catalystVersion":"3.1.0"},
                    "layers":[{"name":"amber","usersCount":4,"maxUsers":50}]}"#,
            )
            .create_async()
            .await;

        let result = CatalystClient::new()
            .fetch_status(&node_for(&server), true)
            .await;
        mock.assert_async().await;
        assert_eq!(result.status, Some(PingStatus::Ok));
        assert!(result.elapsed.is_some());
        let payload = result.payload.unwrap();
        assert_eq!(payload.name, "peer-ec1");
        assert_eq!(payload.layers.unwrap()[0].name, "amber");
    }

    #[tokio::test]
    async fn status_without_layers_flag_has_no_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/comms/status")
            .match_query(Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"name":"peer-wc1","version":"2.0.0","usersCount":9}"#)
            .create_async()
            .await;

        let result = CatalystClient::new()
            .fetch_status(&node_for(&server), false)
            .await;
        mock.assert_async().await;
        assert_eq!(result.payload.unwrap().users_count, Some(9));
    }

    #[tokio::test]
    async fn non_200_status_is_unreachable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/comms/status")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let result = CatalystClient::new()
            .fetch_status(&node_for(&server), true)
            .await;
        assert_eq!(result, PingResult::unreachable());
    }

    #[tokio::test]
    async fn garbage_body_is_empty_result() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/comms/status")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let result = CatalystClient::new()
            .fetch_status(&node_for(&server), true)
            .await;
        assert_eq!(result, PingResult::empty());
    }

    #[tokio::test]
    async fn status_timeout_is_unreachable() {
        let (node, task) = silent_node().await;
        let client = CatalystClient::with_timeout(Duration::from_millis(200));
        let started = Instant::now();
        let result = client.fetch_status(&node, true).await;
        assert_eq!(result, PingResult::unreachable());
        assert!(started.elapsed() < Duration::from_secs(2));
        task.abort();
    }
}
