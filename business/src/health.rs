//! `GET {server}/health` probe.

use serde::Deserialize;
use thiserror::Error;

use crate::UploaderConfig;

/// Body returned by a healthy upload server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    /// Directory the server stores uploads in, when it reports one.
    #[serde(default)]
    pub upload_folder: Option<String>,
}

#[derive(Debug, Error)]
pub enum HealthError {
    #[error("Server unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Server unhealthy: status {status_code}")]
    Unhealthy { status_code: u16 },
    #[error("Unexpected health response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Asks the server whether it is ready to accept uploads.
pub async fn check_health(
    client: &reqwest::Client,
    config: &UploaderConfig,
) -> Result<HealthReport, HealthError> {
    let url = config.health_url();
    log::debug!(target: "reelup::health", "probe url={url}");

    let response = client.get(&url).send().await?;
    let status_code = response.status().as_u16();
    if status_code != 200 {
        log::warn!(target: "reelup::health", "unhealthy url={url} status={status_code}");
        return Err(HealthError::Unhealthy { status_code });
    }

    let body = response.bytes().await?;
    let report: HealthReport = serde_json::from_slice(&body)?;
    log::info!(
        target: "reelup::health",
        "healthy status={} upload_folder={:?}",
        report.status,
        report.upload_folder
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn server_with(response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn healthy_server_reports_folder() {
        let server = server_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "healthy",
            "upload_folder": "/srv/uploads",
        })))
        .await;

        let report = check_health(&reqwest::Client::new(), &UploaderConfig::new(server.uri()))
            .await
            .expect("health check succeeds");

        assert_eq!(report.status, "healthy");
        assert_eq!(report.upload_folder.as_deref(), Some("/srv/uploads"));
    }

    #[tokio::test]
    async fn folder_is_optional() {
        let server =
            server_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
                .await;

        let report = check_health(&reqwest::Client::new(), &UploaderConfig::new(server.uri()))
            .await
            .expect("health check succeeds");

        assert_eq!(report.upload_folder, None);
    }

    #[tokio::test]
    async fn error_status_is_unhealthy() {
        let server = server_with(ResponseTemplate::new(503)).await;

        let err = check_health(&reqwest::Client::new(), &UploaderConfig::new(server.uri()))
            .await
            .expect_err("503 is unhealthy");

        assert!(matches!(err, HealthError::Unhealthy { status_code: 503 }));
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let server = server_with(ResponseTemplate::new(200).set_body_string("OK")).await;

        let err = check_health(&reqwest::Client::new(), &UploaderConfig::new(server.uri()))
            .await
            .expect_err("plain text is not a report");

        assert!(matches!(err, HealthError::Decode(_)));
    }
}
