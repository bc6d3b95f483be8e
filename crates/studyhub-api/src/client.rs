//! HTTP client core

use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::Result;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Login endpoints answer with a session cookie that later requests
    /// must carry, so the client keeps a cookie jar
    pub fn new(base_url: Url) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path such as `/api/chat/send` against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub(crate) async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Envelope> {
        let url = self.endpoint(path)?;
        tracing::debug!(url = %url, "GET");

        let response = self.http.get(url).query(query).send().await?;
        read_envelope(response).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope> {
        let url = self.endpoint(path)?;
        tracing::debug!(url = %url, "POST");

        let response = self.http.post(url).json(body).send().await?;
        read_envelope(response).await
    }
}

async fn read_envelope(response: reqwest::Response) -> Result<Envelope> {
    let status = response.status();
    let body = response.text().await?;
    let envelope = Envelope::parse(&body);

    if !status.is_success() {
        let message = envelope
            .error
            .clone()
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
        tracing::warn!(status = status.as_u16(), "API request failed: {}", message);
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(envelope)
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_endpoint_resolution() {
        let client = ApiClient::new(Url::parse("https://study.example.com/app").unwrap()).unwrap();
        assert_eq!(
            client.endpoint("/api/chat/send").unwrap().as_str(),
            "https://study.example.com/app/api/chat/send"
        );

        let client = ApiClient::new(Url::parse("http://127.0.0.1:5000").unwrap()).unwrap();
        assert_eq!(
            client.endpoint("auth/session").unwrap().as_str(),
            "http://127.0.0.1:5000/auth/session"
        );
    }

    #[tokio::test]
    async fn test_non_ok_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/stats"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"success": false, "error": "boom"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(Url::parse(&server.uri()).unwrap()).unwrap();
        let err = client.get("/api/dashboard/stats", &[]).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Status { status: 500, ref message } if message == "boom"
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_error() {
        let client = ApiClient::new(Url::parse("http://127.0.0.1:9").unwrap()).unwrap();
        let err = client.get("/auth/session", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
