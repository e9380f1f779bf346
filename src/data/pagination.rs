//! Forward and backward paging through the location-area collection
//!
//! A `PaginationCursor` remembers the links reported by the last page fetched.
//! It only changes after a successful fetch; a failed fetch leaves it as it was.

use tracing::debug;

use super::client::{CatalogClient, CatalogError};
use super::LocationPage;

/// Where forward paging will go next
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NextPage {
    /// Nothing has been fetched yet
    #[default]
    Unfetched,
    /// The service reported this link as the following page
    Link(String),
    /// The last page fetched was the end of the collection
    End,
}

/// Forward/backward links threaded through successive page fetches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationCursor {
    next: NextPage,
    previous: Option<String>,
}

impl PaginationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> &NextPage {
        &self.next
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Whether the last forward fetch reached the end of the collection
    pub fn is_at_end(&self) -> bool {
        self.next == NextPage::End
    }

    /// Resolves the URL of the next page, falling back to `first_page`
    pub fn next_url<'a>(&'a self, first_page: &'a str) -> &'a str {
        match &self.next {
            NextPage::Link(url) => url,
            NextPage::Unfetched | NextPage::End => first_page,
        }
    }

    /// Records the links of a successfully fetched page
    ///
    /// The next link is always replaced. The previous link is only replaced when
    /// the page reports one; a missing or null link keeps the old value.
    pub fn advance(&mut self, page: &LocationPage) {
        if let Some(previous) = &page.previous {
            self.previous = Some(previous.clone());
        }

        self.next = match &page.next {
            Some(next) => NextPage::Link(next.clone()),
            None => NextPage::End,
        };
    }
}

impl CatalogClient {
    /// Fetches the page after the cursor's position and advances the cursor
    ///
    /// Targets the first page when the cursor has no next link.
    pub async fn fetch_next_page(&self, cursor: &mut PaginationCursor) -> Result<LocationPage, CatalogError> {
        let first_page = self.first_page_url();
        let url = cursor.next_url(&first_page).to_string();
        debug!(%url, "fetching next page");

        let page: LocationPage = self.fetch_resource(&url).await?;
        cursor.advance(&page);
        Ok(page)
    }

    /// Fetches the page before the cursor's position and advances the cursor
    ///
    /// Fails with `CatalogError::NoPreviousPage`, without any network call, when
    /// the cursor has no previous link.
    pub async fn fetch_previous_page(&self, cursor: &mut PaginationCursor) -> Result<LocationPage, CatalogError> {
        let url = cursor
            .previous()
            .ok_or(CatalogError::NoPreviousPage)?
            .to_string();
        debug!(%url, "fetching previous page");

        let page: LocationPage = self.fetch_resource(&url).await?;
        cursor.advance(&page);
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use std::sync::Arc;
    use std::time::Duration;

    const FIRST: &str = "https://pokeapi.co/api/v2/location-area";

    fn page(next: Option<&str>, previous: Option<&str>) -> LocationPage {
        LocationPage {
            count: 60,
            next: next.map(str::to_string),
            previous: previous.map(str::to_string),
            results: Vec::new(),
        }
    }

    #[test]
    fn test_new_cursor_starts_unfetched() {
        let cursor = PaginationCursor::new();

        assert_eq!(cursor.next(), &NextPage::Unfetched);
        assert!(cursor.previous().is_none());
        assert!(!cursor.is_at_end());
        assert_eq!(cursor.next_url(FIRST), FIRST);
    }

    #[test]
    fn test_advance_through_pages() {
        let mut cursor = PaginationCursor::new();

        cursor.advance(&page(Some("U2"), None));
        assert_eq!(cursor.next(), &NextPage::Link("U2".to_string()));
        assert!(cursor.previous().is_none());
        assert_eq!(cursor.next_url(FIRST), "U2");

        cursor.advance(&page(Some("U3"), Some("U1")));
        assert_eq!(cursor.next(), &NextPage::Link("U3".to_string()));
        assert_eq!(cursor.previous(), Some("U1"));
    }

    #[test]
    fn test_missing_previous_keeps_old_link() {
        let mut cursor = PaginationCursor::new();
        cursor.advance(&page(Some("U3"), Some("U1")));

        cursor.advance(&page(Some("U2"), None));

        assert_eq!(cursor.previous(), Some("U1"));
        assert_eq!(cursor.next_url(FIRST), "U2");
    }

    #[test]
    fn test_last_page_moves_to_end_and_wraps() {
        let mut cursor = PaginationCursor::new();
        cursor.advance(&page(None, Some("U2")));

        assert!(cursor.is_at_end());
        assert_eq!(cursor.next_url(FIRST), FIRST);
        assert_eq!(cursor.previous(), Some("U2"));
    }

    #[tokio::test]
    async fn test_previous_on_fresh_cursor_fails_without_fetching() {
        let cache = Arc::new(Cache::new(Duration::from_secs(5)));
        // Unroutable base: any network attempt would surface as a Network error
        let client = CatalogClient::new("http://127.0.0.1:1", cache);
        let mut cursor = PaginationCursor::new();

        let result = client.fetch_previous_page(&mut cursor).await;

        assert!(matches!(result, Err(CatalogError::NoPreviousPage)));
        assert_eq!(cursor, PaginationCursor::new());
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_cursor_unchanged() {
        let cache = Arc::new(Cache::new(Duration::from_secs(5)));
        let client = CatalogClient::new("http://127.0.0.1:1", cache);
        let mut cursor = PaginationCursor::new();
        cursor.advance(&page(Some("http://127.0.0.1:1/next"), Some("http://127.0.0.1:1/prev")));
        let before = cursor.clone();

        assert!(client.fetch_next_page(&mut cursor).await.is_err());
        assert!(client.fetch_previous_page(&mut cursor).await.is_err());
        assert_eq!(cursor, before);
    }

    #[tokio::test]
    async fn test_next_page_served_from_cache_advances_cursor() {
        let cache = Arc::new(Cache::new(Duration::from_secs(5)));
        let client = CatalogClient::new("http://127.0.0.1:1", Arc::clone(&cache));
        cache.put(
            client.first_page_url(),
            r#"{"count": 40, "next": "http://127.0.0.1:1/location-area?offset=20", "previous": null, "results": []}"#,
        );
        let mut cursor = PaginationCursor::new();

        client
            .fetch_next_page(&mut cursor)
            .await
            .expect("Cached first page should be served");

        assert_eq!(cursor.next_url(""), "http://127.0.0.1:1/location-area?offset=20");
        assert!(cursor.previous().is_none());
    }
}
