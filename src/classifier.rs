use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::multipart;
use serde_json::Value;

/// Outbound call budget. A saturated or unreachable classifier fails each
/// request after this long instead of holding the handler indefinitely.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(20);

/// Capability seam in front of the upstream classifier so handlers and tests
/// can run against a stub.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Sends the complaint text and decoded photo upstream and returns the
    /// raw response body.
    async fn predict(&self, description: &str, image: Vec<u8>) -> Result<Value>;
}

pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpClassifier {
    pub fn new(endpoint: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    #[tracing::instrument(skip(self, description, image), fields(image_bytes = image.len()))]
    async fn predict(&self, description: &str, image: Vec<u8>) -> Result<Value> {
        let photo = multipart::Part::bytes(image)
            .file_name("photo.jpg")
            .mime_str("image/jpeg")
            .context("Failed to build image part")?;
        let form = multipart::Form::new()
            .text("text", description.to_string())
            .part("image", photo);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .context("Failed to reach classifier service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Classifier returned {}: {}", status, body);
        }

        let body = response
            .text()
            .await
            .context("Failed to read classifier response body")?;
        Ok(parse_body(&body))
    }
}

/// The upstream usually answers JSON but is not trusted to; anything else is
/// carried through as a JSON string so normalization still sees the payload.
fn parse_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_bodies_parse_structurally() {
        assert_eq!(
            parse_body(r#"{"final_decision":{"label":"litter"}}"#),
            json!({"final_decision": {"label": "litter"}})
        );
    }

    #[test]
    fn non_json_bodies_become_strings() {
        assert_eq!(parse_body("<html>service busy</html>"), json!("<html>service busy</html>"));
    }

    #[test]
    fn empty_body_becomes_empty_string() {
        assert_eq!(parse_body(""), json!(""));
    }
}
