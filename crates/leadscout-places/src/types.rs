//! Wire types for the Places API (New) `places:searchText` endpoint.
//!
//! Only the fields named in [`FIELD_MASK`] are requested, so everything
//! except the place id is optional on the way back.

use leadscout_core::PlaceHit;
use serde::{Deserialize, Serialize};

/// Response fields requested via the `X-Goog-FieldMask` header.
pub const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.nationalPhoneNumber,places.websiteUri,places.rating,nextPageToken";

/// Largest page the endpoint will serve.
pub const MAX_PAGE_SIZE: u32 = 20;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchTextBody<'a> {
    pub text_query: &'a str,
    pub page_size: u32,
    pub language_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTextResponse {
    #[serde(default)]
    pub places: Vec<ApiPlace>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlace {
    #[serde(default)]
    pub id: String,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub national_phone_number: Option<String>,
    pub website_uri: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub text: String,
}

/// Google's standard error envelope: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    pub status: Option<String>,
}

/// One page of search results, already converted to [`PlaceHit`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextSearchPage {
    pub hits: Vec<PlaceHit>,
    pub next_page_token: Option<String>,
}

impl From<SearchTextResponse> for TextSearchPage {
    fn from(response: SearchTextResponse) -> Self {
        let hits = response
            .places
            .into_iter()
            .filter_map(ApiPlace::into_hit)
            .collect();

        let next_page_token = response.next_page_token.filter(|t| !t.is_empty());

        Self {
            hits,
            next_page_token,
        }
    }
}

impl ApiPlace {
    /// Places without an id cannot be deduplicated and are dropped.
    fn into_hit(self) -> Option<PlaceHit> {
        if self.id.trim().is_empty() {
            return None;
        }

        let name = self
            .display_name
            .map(|d| d.text)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.id.clone());

        Some(PlaceHit {
            place_id: self.id,
            name,
            address: self.formatted_address.unwrap_or_default(),
            phone: self.national_phone_number.filter(|p| !p.trim().is_empty()),
            website: self.website_uri.filter(|w| !w.trim().is_empty()),
            rating: self.rating,
        })
    }
}
