pub mod client;
pub mod connector;
pub mod requests;
pub mod scan;

pub use client::{ClientConfig, DetectorClient, ScanError};
pub use connector::Connector;
pub use requests::{CompanyInfo, DetectionRequest, ImageUpload, SocialMedia};
pub use scan::{ScanOutcome, Scanner};
