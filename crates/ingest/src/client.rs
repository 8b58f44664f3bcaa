use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use sniff_common::error::SniffError;
use sniff_normalize::{Detector, RawResponse};

use crate::connector::Connector;
use crate::requests::{DetectionRequest, ImageUpload};

const DEFAULT_GATEWAY_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub image_url: Option<String>,
    pub news_url: Option<String>,
    pub ecommerce_url: Option<String>,
    pub job_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            image_url: None,
            news_url: None,
            ecommerce_url: None,
            job_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load detector endpoints from the environment.
    ///
    /// `SNIFF_GATEWAY_URL` serves every detector unless a per-detector
    /// `SNIFF_{IMAGE,NEWS,ECOMMERCE,JOB}_URL` overrides it.
    pub fn from_env() -> Result<Self, SniffError> {
        let timeout_secs = match non_empty_var("SNIFF_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                SniffError::Config(format!("SNIFF_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: non_empty_var("SNIFF_GATEWAY_URL")
                .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
            image_url: non_empty_var("SNIFF_IMAGE_URL"),
            news_url: non_empty_var("SNIFF_NEWS_URL"),
            ecommerce_url: non_empty_var("SNIFF_ECOMMERCE_URL"),
            job_url: non_empty_var("SNIFF_JOB_URL"),
            timeout_secs,
        })
    }

    pub fn base_url_for(&self, detector: Detector) -> &str {
        let specific = match detector {
            Detector::Image => &self.image_url,
            Detector::News => &self.news_url,
            Detector::Ecommerce => &self.ecommerce_url,
            Detector::JobPosting => &self.job_url,
        };
        specific.as_deref().unwrap_or(&self.base_url)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The request was refused before anything was sent.
    #[error("invalid request: {0}")]
    Rejected(#[from] SniffError),
}

/// Sends detection requests to the configured detector backends. One attempt per scan.
#[derive(Clone)]
pub struct DetectorClient {
    client: Client,
    config: ClientConfig,
}

impl DetectorClient {
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// For testing: route every detector to one base URL (e.g., wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config = ClientConfig {
            base_url: base_url.to_string(),
            timeout_secs: self.config.timeout_secs,
            ..ClientConfig::default()
        };
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn send(&self, request: &DetectionRequest) -> Result<RawResponse, ScanError> {
        let detector = request.detector();
        let url = format!(
            "{}{}",
            self.config.base_url_for(detector).trim_end_matches('/'),
            request.path()
        );
        tracing::debug!(detector = detector.as_str(), %url, "sending detection request");

        let builder = self.client.post(&url);
        let builder = match request {
            DetectionRequest::Image(upload) => builder.multipart(image_form(upload)?),
            other => builder.json(&other.json_body().unwrap_or(Value::Null)),
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                detector = detector.as_str(),
                status = status.as_u16(),
                "detector returned an error status"
            );
            return Err(ScanError::Http { status, body });
        }

        Ok(parse_body(body))
    }
}

fn image_form(upload: &ImageUpload) -> Result<Form, ScanError> {
    let part = Part::bytes(upload.bytes.clone())
        .file_name(upload.file_name.clone())
        .mime_str(&upload.content_type)
        .map_err(|_| {
            SniffError::Validation(format!("invalid content type: {:?}", upload.content_type))
        })?;
    Ok(Form::new().part("file", part))
}

/// Bodies that are not JSON are kept as a string so they normalize to `Unknown`.
fn parse_body(body: String) -> RawResponse {
    match serde_json::from_str::<Value>(&body) {
        Ok(value) => value,
        Err(_) => Value::String(body),
    }
}

#[async_trait]
impl Connector for DetectorClient {
    async fn fetch(&self, request: &DetectionRequest) -> Result<RawResponse, ScanError> {
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::CompanyInfo;
    use serde_json::json;
    use std::sync::Mutex;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: [&str; 6] = [
        "SNIFF_GATEWAY_URL",
        "SNIFF_IMAGE_URL",
        "SNIFF_NEWS_URL",
        "SNIFF_ECOMMERCE_URL",
        "SNIFF_JOB_URL",
        "SNIFF_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn test_client(server: &MockServer) -> DetectorClient {
        let config = ClientConfig {
            timeout_secs: 5,
            ..ClientConfig::default()
        };
        DetectorClient::new(config)
            .unwrap()
            .with_base_url(&server.uri())
    }

    #[test]
    fn from_env_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url_for(Detector::News), "http://localhost:8000");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn from_env_per_detector_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("SNIFF_GATEWAY_URL", "http://gateway:9000");
        std::env::set_var("SNIFF_IMAGE_URL", "http://images:8001");
        std::env::set_var("SNIFF_TIMEOUT_SECS", "15");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url_for(Detector::Image), "http://images:8001");
        assert_eq!(config.base_url_for(Detector::JobPosting), "http://gateway:9000");
        assert_eq!(config.timeout_secs, 15);

        clear_env();
    }

    #[test]
    fn from_env_rejects_bad_timeout() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("SNIFF_TIMEOUT_SECS", "soon");

        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, SniffError::Config(_)));

        clear_env();
    }

    #[tokio::test]
    async fn news_query_posts_json() {
        let server = MockServer::start().await;
        let payload = json!({"status": "success", "verification_result": "likely true"});

        Mock::given(method("POST"))
            .and(path("/news/verify"))
            .and(body_json(json!({"query": "moon landing"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let request = DetectionRequest::NewsQuery {
            query: "moon landing".into(),
        };
        let raw = client.send(&request).await.unwrap();
        assert_eq!(raw, payload);
    }

    #[tokio::test]
    async fn job_posting_sends_company_info() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/job-offers/analyze"))
            .and(body_json(json!({"name": "Acme", "website": "https://acme.example"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"risk_level": "LOW"})))
            .mount(&server)
            .await;

        let mut company = CompanyInfo::new("Acme");
        company.website = Some("https://acme.example".into());
        let raw = test_client(&server)
            .send(&DetectionRequest::JobPosting(company))
            .await
            .unwrap();
        assert_eq!(raw["risk_level"], "LOW");
    }

    #[tokio::test]
    async fn image_is_sent_as_multipart_file_part() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/image/analyze"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"prediction": {"ai": 0.4}})),
            )
            .mount(&server)
            .await;

        let request = DetectionRequest::Image(ImageUpload {
            file_name: "photo.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: b"fake-jpeg-bytes".to_vec(),
        });
        test_client(&server).send(&request).await.unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        let content_type = received[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&received[0].body);
        assert!(body.contains("name=\"file\""));
        assert!(body.contains("filename=\"photo.jpg\""));
        assert!(body.contains("fake-jpeg-bytes"));
    }

    #[tokio::test]
    async fn malformed_content_type_is_rejected_before_sending() {
        let server = MockServer::start().await;

        let request = DetectionRequest::Image(ImageUpload {
            file_name: "photo.jpg".into(),
            content_type: "not a mime type".into(),
            bytes: b"fake-jpeg-bytes".to_vec(),
        });
        let err = test_client(&server).send(&request).await.unwrap_err();
        assert!(matches!(err, ScanError::Rejected(SniffError::Validation(_))));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_status_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ecommerce/analyze"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
            .expect(1)
            .mount(&server)
            .await;

        let request = DetectionRequest::EcommerceUrl {
            url: "https://shop.example".into(),
        };
        let err = test_client(&server).send(&request).await.unwrap_err();
        match err {
            ScanError::Http { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "model crashed");
            }
            other => panic!("expected Http, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn client_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ecommerce/product-analyze"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid url"))
            .mount(&server)
            .await;

        let request = DetectionRequest::EcommerceProduct {
            name: "Watch".into(),
            url: "nope".into(),
        };
        let err = test_client(&server).send(&request).await.unwrap_err();
        assert!(matches!(
            err,
            ScanError::Http { status, .. } if status == StatusCode::UNPROCESSABLE_ENTITY
        ));
    }

    #[tokio::test]
    async fn non_json_body_becomes_string() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/news/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
            .mount(&server)
            .await;

        let request = DetectionRequest::NewsStatement {
            statement: "something".into(),
        };
        let raw = test_client(&server).send(&request).await.unwrap();
        assert_eq!(raw, Value::String("<html>busy</html>".into()));
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:1".into(),
            timeout_secs: 2,
            ..ClientConfig::default()
        };
        let client = DetectorClient::new(config).unwrap();
        let request = DetectionRequest::NewsQuery { query: "q".into() };
        let err = client.send(&request).await.unwrap_err();
        assert!(matches!(err, ScanError::Network(_)));
    }
}
