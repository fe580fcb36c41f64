use std::time::Duration;

use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::{
    ApiResult, CatalogOption, ContactMessage, ListingBackend, OptionCatalog, SubmissionReceipt,
};
use crate::errors::ApiError;
use crate::wizard::submission::ListingPayload;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// [`ListingBackend`] speaking JSON over HTTP to the listing service.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct CreatedResource {
    #[serde(alias = "_id")]
    id: String,
}

#[derive(Deserialize)]
struct UploadedFile {
    #[serde(alias = "path", alias = "location")]
    url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::from)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send()?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "api response");
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(ApiError::Status {
                status: status.as_u16(),
                message: extract_error_message(status, &body),
            })
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send(self.client.get(self.url(path)))?;
        Ok(response.json()?)
    }

    fn upload(&self, path: &str, file_name: &str, bytes: &[u8]) -> ApiResult<String> {
        let part = multipart::Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        let response = self.send(self.client.post(self.url(path)).multipart(form))?;
        let text = response.text()?;
        parse_upload_response(&text)
    }
}

impl ListingBackend for HttpBackend {
    fn create_listing(&self, payload: &ListingPayload) -> ApiResult<SubmissionReceipt> {
        let response = self.send(self.client.post(self.url("hotels")).json(payload))?;
        let created: CreatedResource = response.json()?;
        info!(id = %created.id, "listing created");
        Ok(SubmissionReceipt { id: created.id })
    }

    fn update_listing(&self, id: &str, payload: &ListingPayload) -> ApiResult<SubmissionReceipt> {
        let path = format!("hotels/{id}");
        self.send(self.client.patch(self.url(&path)).json(payload))?;
        info!(id, "listing updated");
        Ok(SubmissionReceipt { id: id.to_string() })
    }

    fn fetch_listing(&self, id: &str) -> ApiResult<ListingPayload> {
        self.get_json(&format!("hotels/{id}"))
    }

    fn upload_image(&self, file_name: &str, bytes: &[u8]) -> ApiResult<String> {
        self.upload("file-system/image", file_name, bytes)
    }

    fn upload_file(&self, file_name: &str, bytes: &[u8]) -> ApiResult<String> {
        self.upload("file-system/file", file_name, bytes)
    }

    fn fetch_options(&self) -> ApiResult<OptionCatalog> {
        let list = |path: &str| -> ApiResult<Vec<CatalogOption>> { self.get_json(path) };
        Ok(OptionCatalog {
            listing_types: list("admin/listing-types")?,
            property_types: list("admin/property-types")?,
            housing_categories: list("admin/housing-categories")?,
            features: list("admin/features")?,
            infrastructures: list("admin/infrastructures")?,
            views: list("admin/views")?,
            distance_types: list("admin/distance-types")?,
            languages: list("admin/languages")?,
        })
    }

    fn send_message(&self, listing_id: &str, message: &ContactMessage) -> ApiResult<()> {
        let mut body =
            serde_json::to_value(message).map_err(|err| ApiError::Decode(err.to_string()))?;
        if let Value::Object(map) = &mut body {
            map.insert("hotelId".into(), Value::String(listing_id.to_string()));
        }
        self.send(self.client.post(self.url("hotel-messages")).json(&body))?;
        Ok(())
    }
}

/// Pulls a human-readable message out of an error body. Accepts
/// `{"message": "..."}`, `{"message": ["...", "..."]}` and `{"error": "..."}`;
/// anything else falls back to the status reason.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    };
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        let trimmed = body.trim();
        return if trimmed.is_empty() || trimmed.starts_with('<') {
            fallback()
        } else {
            trimmed.to_string()
        };
    };
    match value.get("message").or_else(|| value.get("error")) {
        Some(Value::String(message)) if !message.trim().is_empty() => message.trim().to_string(),
        Some(Value::Array(items)) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                fallback()
            } else {
                parts.join("; ")
            }
        }
        _ => fallback(),
    }
}

/// Upload endpoints answer with either `{"url": ...}` or the bare URL.
pub fn parse_upload_response(body: &str) -> ApiResult<String> {
    if let Ok(uploaded) = serde_json::from_str::<UploadedFile>(body) {
        return Ok(uploaded.url);
    }
    if let Ok(Value::String(url)) = serde_json::from_str::<Value>(body) {
        return Ok(url);
    }
    let trimmed = body.trim();
    if trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || trimmed.starts_with('/')
    {
        Ok(trimmed.to_string())
    } else {
        let message = format!("upload response without a URL: {trimmed}");
        Err(ApiError::Decode(message))
    }
}
