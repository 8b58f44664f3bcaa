use async_trait::async_trait;
use sniff_normalize::RawResponse;

use crate::client::ScanError;
use crate::requests::DetectionRequest;

/// Anything that can turn a detection request into a raw backend payload.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn fetch(&self, request: &DetectionRequest) -> Result<RawResponse, ScanError>;
}
