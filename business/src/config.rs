/// Where the upload queue sends files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderConfig {
    server_url: String,
}

impl UploaderConfig {
    pub const DEFAULT_SERVER_URL: &'static str = "http://localhost:8080";

    /// Builds a config for `server_url`. Trailing slashes are dropped so the
    /// endpoint paths can be appended directly.
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into();
        Self {
            server_url: server_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// `POST` target for file uploads.
    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.server_url)
    }

    /// `GET` target for the server health probe.
    pub fn health_url(&self) -> String {
        format!("{}/health", self.server_url)
    }
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SERVER_URL)
    }
}
