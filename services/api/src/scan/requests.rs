use serde::Deserialize;
use sniff_common::error::SniffError;
use sniff_ingest::DetectionRequest;

/// Either a search query or a statement to fact-check; `query` wins when both are set.
#[derive(Debug, Deserialize)]
pub struct NewsScanRequest {
    pub query: Option<String>,
    pub statement: Option<String>,
}

impl TryFrom<NewsScanRequest> for DetectionRequest {
    type Error = SniffError;

    fn try_from(body: NewsScanRequest) -> Result<Self, Self::Error> {
        match (body.query, body.statement) {
            (Some(query), _) => Ok(Self::NewsQuery { query }),
            (None, Some(statement)) => Ok(Self::NewsStatement { statement }),
            (None, None) => Err(SniffError::Validation(
                "either query or statement is required".to_string(),
            )),
        }
    }
}

/// A store URL, or a product listing when `name` is present.
#[derive(Debug, Deserialize)]
pub struct EcommerceScanRequest {
    pub url: String,
    pub name: Option<String>,
}

impl From<EcommerceScanRequest> for DetectionRequest {
    fn from(body: EcommerceScanRequest) -> Self {
        match body.name {
            Some(name) => Self::EcommerceProduct {
                name,
                url: body.url,
            },
            None => Self::EcommerceUrl { url: body.url },
        }
    }
}
