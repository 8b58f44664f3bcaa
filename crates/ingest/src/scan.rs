use std::sync::Arc;

use sniff_normalize::{normalize_with, CanonicalResult, NormalizeConfig, RawResponse};

use crate::client::ScanError;
use crate::connector::Connector;
use crate::requests::DetectionRequest;

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub raw: RawResponse,
    pub result: CanonicalResult,
}

/// Validate, fetch, then normalize with the request's detector.
#[derive(Clone)]
pub struct Scanner {
    connector: Arc<dyn Connector>,
    config: NormalizeConfig,
}

impl Scanner {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self::with_config(connector, NormalizeConfig::default())
    }

    pub fn with_config(connector: Arc<dyn Connector>, config: NormalizeConfig) -> Self {
        Self { connector, config }
    }

    pub fn normalize_config(&self) -> &NormalizeConfig {
        &self.config
    }

    pub async fn scan(&self, request: &DetectionRequest) -> Result<ScanOutcome, ScanError> {
        request.validate()?;
        let detector = request.detector();
        let start = std::time::Instant::now();

        let raw = match self.connector.fetch(request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(detector = detector.as_str(), error = %e, "scan failed");
                return Err(e);
            }
        };

        let result = normalize_with(&self.config, detector, &raw);
        tracing::info!(
            detector = detector.as_str(),
            shape = result.shape.as_str(),
            verdict = result.verdict.label(),
            risk_score = result.risk_score,
            flags = result.flags.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "scan complete"
        );

        Ok(ScanOutcome { raw, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::json;
    use sniff_common::error::SniffError;
    use sniff_normalize::{ShapeKind, Verdict};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubConnector {
        payload: RawResponse,
        calls: AtomicUsize,
    }

    impl StubConnector {
        fn new(payload: RawResponse) -> Arc<Self> {
            Arc::new(Self {
                payload,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Connector for StubConnector {
        async fn fetch(&self, _request: &DetectionRequest) -> Result<RawResponse, ScanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        }
    }

    struct FailingConnector;

    #[async_trait]
    impl Connector for FailingConnector {
        async fn fetch(&self, _request: &DetectionRequest) -> Result<RawResponse, ScanError> {
            Err(ScanError::Http {
                status: StatusCode::BAD_GATEWAY,
                body: "upstream down".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn scan_normalizes_with_request_detector() {
        let connector = StubConnector::new(json!({
            "risk_level": "HIGH",
            "confidence_score": 92,
            "red_flags": ["Upfront training fee"]
        }));
        let scanner = Scanner::new(connector.clone());

        let request = DetectionRequest::JobPosting(crate::requests::CompanyInfo::new("Acme"));
        let outcome = scanner.scan(&request).await.unwrap();

        assert_eq!(outcome.result.verdict, Verdict::High);
        assert_eq!(outcome.result.risk_score, 92);
        assert_eq!(outcome.result.shape, ShapeKind::DirectClassification);
        assert_eq!(outcome.raw["risk_level"], "HIGH");
        assert_eq!(connector.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_connector() {
        let connector = StubConnector::new(json!({}));
        let scanner = Scanner::new(connector.clone());

        let request = DetectionRequest::NewsQuery { query: " ".into() };
        let err = scanner.scan(&request).await.unwrap_err();

        assert!(matches!(err, ScanError::Rejected(SniffError::Validation(_))));
        assert_eq!(connector.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn connector_errors_propagate() {
        let scanner = Scanner::new(Arc::new(FailingConnector));
        let request = DetectionRequest::EcommerceUrl {
            url: "https://shop.example".into(),
        };
        let err = scanner.scan(&request).await.unwrap_err();
        assert!(matches!(err, ScanError::Http { .. }));
    }
}
