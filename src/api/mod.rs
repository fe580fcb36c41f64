//! Seam to the external listing REST API.

pub mod http;

use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, ListingError};
use crate::localized::{Language, LocalizedText};
use crate::wizard::submission::ListingPayload;

pub use http::HttpBackend;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Operations the wizard and the listing page need from the backend.
///
/// Calls are independent: nothing is retried or cancelled here, a failure is
/// handed back for the caller to display.
pub trait ListingBackend: Send + Sync {
    fn create_listing(&self, payload: &ListingPayload) -> ApiResult<SubmissionReceipt>;

    fn update_listing(&self, id: &str, payload: &ListingPayload) -> ApiResult<SubmissionReceipt>;

    fn fetch_listing(&self, id: &str) -> ApiResult<ListingPayload>;

    /// Stores an image and returns its public URL.
    fn upload_image(&self, file_name: &str, bytes: &[u8]) -> ApiResult<String>;

    /// Stores a document and returns its public URL.
    fn upload_file(&self, file_name: &str, bytes: &[u8]) -> ApiResult<String>;

    fn fetch_options(&self) -> ApiResult<OptionCatalog>;

    fn send_message(&self, listing_id: &str, message: &ContactMessage) -> ApiResult<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub id: String,
}

/// Admin-managed choice such as a feature, a view or a distance type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogOption {
    pub id: String,
    pub name: LocalizedText,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionCatalog {
    pub listing_types: Vec<CatalogOption>,
    pub property_types: Vec<CatalogOption>,
    pub housing_categories: Vec<CatalogOption>,
    pub features: Vec<CatalogOption>,
    pub infrastructures: Vec<CatalogOption>,
    pub views: Vec<CatalogOption>,
    pub distance_types: Vec<CatalogOption>,
    pub languages: Vec<CatalogOption>,
}

impl OptionCatalog {
    pub fn find<'a>(options: &'a [CatalogOption], id: &str) -> Option<&'a CatalogOption> {
        options.iter().find(|option| option.id == id)
    }

    /// Display labels in `language`, in catalog order.
    pub fn labels(options: &[CatalogOption], language: Language) -> Vec<String> {
        options
            .iter()
            .map(|option| option.name.get_or_fallback(language).to_string())
            .collect()
    }
}

/// Message sent from a listing's contact form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub body: String,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), ListingError> {
        if self.name.trim().is_empty() {
            return Err(ListingError::InvalidInput("Name is required".into()));
        }
        let email = self.email.trim();
        let looks_valid = email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !looks_valid {
            return Err(ListingError::InvalidInput(format!(
                "`{}` is not a valid email address",
                email
            )));
        }
        if self.body.trim().is_empty() {
            return Err(ListingError::InvalidInput("Message cannot be empty".into()));
        }
        Ok(())
    }
}
