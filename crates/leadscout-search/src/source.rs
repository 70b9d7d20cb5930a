use async_trait::async_trait;
use leadscout_core::{Area, Geography, SearchTarget};
use leadscout_places::{text_query, PlacesClient, PlacesError, TextSearchPage, TextSearchRequest};
use tokio_util::sync::CancellationToken;

/// Everything needed to fetch one page for one category in one area.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub geography: &'a Geography,
    pub target: &'a SearchTarget,
    pub area: &'a Area,
    pub page_token: Option<&'a str>,
    pub credential: &'a str,
}

/// Upstream places search.
///
/// Implementations must return an error for non-recoverable failures and
/// should abort in-flight work with [`PlacesError::Cancelled`] once `cancel`
/// fires.
#[async_trait]
pub trait PlaceSource: Send + Sync {
    async fn search(
        &self,
        request: &PageRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<TextSearchPage, PlacesError>;
}

#[async_trait]
impl PlaceSource for PlacesClient {
    async fn search(
        &self,
        request: &PageRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<TextSearchPage, PlacesError> {
        let query = text_query(
            &request.target.query,
            request.area.neighborhood(),
            &request.geography.city,
            &request.geography.state,
        );

        self.search_text(
            &TextSearchRequest {
                text_query: &query,
                page_token: request.page_token,
                api_key: request.credential,
            },
            cancel,
        )
        .await
    }
}
