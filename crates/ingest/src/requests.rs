use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sniff_common::error::SniffError;
use sniff_normalize::Detector;

const MAX_COMPANY_NAME: usize = 200;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// Company details submitted with a job posting scan. Only `name` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_offered: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media: Option<SocialMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_post_date: Option<String>,
}

impl CompanyInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), SniffError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SniffError::Validation(
                "company name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_COMPANY_NAME {
            return Err(SniffError::Validation(format!(
                "company name must be at most {MAX_COMPANY_NAME} characters"
            )));
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            if !email.contains('@') {
                return Err(SniffError::Validation(format!("invalid email: {email}")));
            }
        }
        if let Some(website) = self.website.as_deref().filter(|w| !w.is_empty()) {
            let looks_like_url =
                website.starts_with("http://") || website.starts_with("https://");
            if !looks_like_url && !website.contains('.') {
                return Err(SniffError::Validation(format!("invalid website: {website}")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// One user-initiated scan. Each variant maps to exactly one backend endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionRequest {
    NewsQuery { query: String },
    NewsStatement { statement: String },
    EcommerceUrl { url: String },
    EcommerceProduct { name: String, url: String },
    JobPosting(CompanyInfo),
    Image(ImageUpload),
}

impl DetectionRequest {
    pub fn detector(&self) -> Detector {
        match self {
            Self::NewsQuery { .. } | Self::NewsStatement { .. } => Detector::News,
            Self::EcommerceUrl { .. } | Self::EcommerceProduct { .. } => Detector::Ecommerce,
            Self::JobPosting(_) => Detector::JobPosting,
            Self::Image(_) => Detector::Image,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::NewsQuery { .. } | Self::NewsStatement { .. } => "/news/verify",
            Self::EcommerceUrl { .. } => "/ecommerce/analyze",
            Self::EcommerceProduct { .. } => "/ecommerce/product-analyze",
            Self::JobPosting(_) => "/job-offers/analyze",
            Self::Image(_) => "/image/analyze",
        }
    }

    /// JSON body for the request, or `None` for multipart uploads.
    pub fn json_body(&self) -> Option<Value> {
        match self {
            Self::NewsQuery { query } => Some(json!({ "query": query })),
            Self::NewsStatement { statement } => Some(json!({ "statement": statement })),
            Self::EcommerceUrl { url } => Some(json!({ "url": url })),
            Self::EcommerceProduct { name, url } => Some(json!({ "name": name, "url": url })),
            Self::JobPosting(company) => serde_json::to_value(company).ok(),
            Self::Image(_) => None,
        }
    }

    /// Rejects requests the backend would refuse anyway, before any network call.
    pub fn validate(&self) -> Result<(), SniffError> {
        match self {
            Self::NewsQuery { query: text } | Self::NewsStatement { statement: text } => {
                require("news text", text)
            }
            Self::EcommerceUrl { url } => require("url", url),
            Self::EcommerceProduct { name, url } => {
                require("product name", name)?;
                require("url", url)
            }
            Self::JobPosting(company) => company.validate(),
            Self::Image(upload) => {
                if upload.bytes.is_empty() {
                    return Err(SniffError::Validation("image file is empty".to_string()));
                }
                if !is_media_type(&upload.content_type) {
                    return Err(SniffError::Validation(format!(
                        "invalid content type: {:?}",
                        upload.content_type
                    )));
                }
                Ok(())
            }
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), SniffError> {
    if value.trim().is_empty() {
        return Err(SniffError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// `type/subtype`, optionally followed by `;` parameters.
fn is_media_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or_default().trim();
    let is_token = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c))
    };
    match essence.split_once('/') {
        Some((kind, subtype)) => is_token(kind) && is_token(subtype),
        None => false,
    }
}
