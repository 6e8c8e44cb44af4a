//! Single-shot HTTP transport against the telematics portal.

use reqwest::header;

use crate::error::CarwingsError;

/// Fixed portal host and orchestration prefix; endpoints hang off this.
const BASE_URL: &str = "https://gdcportalgw.its-mo.com/gworchest_160803EC/gdc";

/// One outbound POST per invocation, no retries. `action` is the literal
/// endpoint filename (e.g. `UserLoginRequest.php`), `body` is already
/// URL-encoded form data.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post(&self, action: &str, body: &str) -> Result<String, CarwingsError>;
}

/// Production transport over reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    async fn post(&self, action: &str, body: &str) -> Result<String, CarwingsError> {
        let url = format!("{BASE_URL}/{action}");
        tracing::debug!(action, "sending portal request");

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.to_owned())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(action, status = status.as_u16(), "portal request rejected");
            return Err(CarwingsError::HttpStatus(status.as_u16()));
        }

        // Buffer the complete body; partial chunks are not meaningful.
        let body = response.text().await?;
        tracing::debug!(action, bytes = body.len(), "portal request succeeded");
        Ok(body)
    }
}
