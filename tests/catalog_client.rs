//! Integration tests for CatalogClient and pagination.
//!
//! Uses wiremock as the catalog service. `Mock::expect` counts are verified when
//! the mock server is dropped, which is how network calls are asserted.

use std::sync::Arc;
use std::time::Duration;

use pokedex::cache::Cache;
use pokedex::data::{
    CatalogClient, CatalogError, Creature, LocationArea, LocationPage, NextPage, PaginationCursor,
    PayloadOrigin,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_json(server: &MockServer, next_offset: Option<u32>, previous_offset: Option<u32>, names: &[&str]) -> String {
    let link = |offset: Option<u32>| match offset {
        Some(offset) => format!("\"{}/location-area?offset={}\"", server.uri(), offset),
        None => "null".to_string(),
    };
    let results: Vec<String> = names
        .iter()
        .map(|name| format!(r#"{{"name": "{name}", "url": "https://pokeapi.co/api/v2/location-area/{name}/"}}"#))
        .collect();

    format!(
        r#"{{"count": 60, "next": {}, "previous": {}, "results": [{}]}}"#,
        link(next_offset),
        link(previous_offset),
        results.join(", ")
    )
}

fn create_test_client(server: &MockServer, interval: Duration) -> CatalogClient {
    let cache = Arc::new(Cache::new(interval));
    CatalogClient::new(server.uri(), cache)
}

#[tokio::test]
async fn test_fetch_next_page_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/location-area"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_json(
            &server,
            Some(20),
            None,
            &["canalave-city-area", "eterna-city-area"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_secs(5));
    let mut cursor = PaginationCursor::new();

    let page = client.fetch_next_page(&mut cursor).await.expect("fetch failed");

    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].name, "canalave-city-area");
    assert_eq!(
        cursor.next(),
        &NextPage::Link(format!("{}/location-area?offset=20", server.uri()))
    );
    assert!(cursor.previous().is_none());
}

#[tokio::test]
async fn test_two_forward_pages_update_cursor() {
    let server = MockServer::start().await;
    let first = format!("{}/location-area?offset=0", server.uri());

    Mock::given(method("GET"))
        .and(path("/location-area"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_json(&server, Some(40), Some(0), &["b"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/location-area"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_json(&server, Some(20), None, &["a"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_secs(5));
    let mut cursor = PaginationCursor::new();

    client.fetch_next_page(&mut cursor).await.expect("first page failed");
    assert_eq!(cursor.next_url(""), format!("{}/location-area?offset=20", server.uri()));
    assert!(cursor.previous().is_none());

    let page = client.fetch_next_page(&mut cursor).await.expect("second page failed");
    assert_eq!(page.results[0].name, "b");
    assert_eq!(cursor.next_url(""), format!("{}/location-area?offset=40", server.uri()));
    assert_eq!(cursor.previous(), Some(first.as_str()));
}

#[tokio::test]
async fn test_cache_hit_suppresses_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/location-area"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_json(&server, Some(20), None, &["a"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_secs(5));
    let url = client.first_page_url();

    for _ in 0..3 {
        let page: LocationPage = client.fetch_resource(&url).await.expect("fetch failed");
        assert_eq!(page.results[0].name, "a");
    }
}

#[tokio::test]
async fn test_previous_page_round_trip_uses_cache() {
    let server = MockServer::start().await;
    let first = format!("{}/location-area?offset=0", server.uri());

    Mock::given(method("GET"))
        .and(path("/location-area"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_json(&server, Some(20), None, &["a"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/location-area"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_json(&server, Some(40), Some(0), &["b"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_secs(5));
    let mut cursor = PaginationCursor::new();

    // Walk forward from an explicit first page, then back twice
    cursor.advance(&serde_json::from_str(&page_json(&server, Some(0), None, &[])).unwrap());
    client.fetch_next_page(&mut cursor).await.expect("page one failed");
    client.fetch_next_page(&mut cursor).await.expect("page two failed");
    assert_eq!(cursor.previous(), Some(first.as_str()));

    let back = client.fetch_previous_page(&mut cursor).await.expect("back failed");
    assert_eq!(back.results[0].name, "a");
    assert_eq!(cursor.next_url(""), format!("{}/location-area?offset=20", server.uri()));

    // Page one reports no previous link, so the cursor keeps pointing at it
    assert_eq!(cursor.previous(), Some(first.as_str()));
    client.fetch_previous_page(&mut cursor).await.expect("second back failed");
}

#[tokio::test]
async fn test_last_page_moves_cursor_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/location-area"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_json(&server, None, Some(0), &["z"])))
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_secs(5));
    let mut cursor = PaginationCursor::new();

    client.fetch_next_page(&mut cursor).await.expect("fetch failed");

    assert!(cursor.is_at_end());
    assert_eq!(cursor.next_url(&client.first_page_url()), client.first_page_url());
}

#[tokio::test]
async fn test_expired_entry_is_fetched_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/location-area"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_json(&server, Some(20), None, &["a"])))
        .expect(2)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_millis(50));
    let url = client.first_page_url();

    let _: LocationPage = client.fetch_resource(&url).await.expect("first fetch failed");
    tokio::time::sleep(Duration::from_millis(100)).await;
    let _: LocationPage = client.fetch_resource(&url).await.expect("second fetch failed");
}

#[tokio::test]
async fn test_location_area_and_creature_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/location-area/pastoria-city-area"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"id": 9, "name": "pastoria-city-area", "pokemon_encounters": [
                {"pokemon": {"name": "tentacool", "url": ""}},
                {"pokemon": {"name": "magikarp", "url": ""}}
            ]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pokemon/magikarp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"id": 129, "name": "magikarp", "base_experience": 40, "height": 9, "weight": 100,
                "stats": [], "types": [{"slot": 1, "type": {"name": "water", "url": ""}}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_secs(5));

    let area: LocationArea = client.location_area("pastoria-city-area").await.expect("area failed");
    assert_eq!(area.encounter_names().collect::<Vec<_>>(), vec!["tentacool", "magikarp"]);

    let creature: Creature = client.creature("magikarp").await.expect("creature failed");
    assert_eq!(creature.base_experience, Some(40));
    assert_eq!(creature.types[0].kind.name, "water");
}

#[tokio::test]
async fn test_malformed_body_is_cached_and_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/glitch"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_secs(5));

    let first = client.creature("glitch").await;
    assert!(matches!(
        first,
        Err(CatalogError::Decode { origin: PayloadOrigin::Network, .. })
    ));
    assert!(client.cache().get(&client.creature_url("glitch")).is_some());

    let second = client.creature("glitch").await;
    assert!(matches!(
        second,
        Err(CatalogError::Decode { origin: PayloadOrigin::Cache, .. })
    ));
}

#[tokio::test]
async fn test_not_found_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/nobody"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .expect(2)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_secs(5));

    for _ in 0..2 {
        let result = client.creature("nobody").await;
        match result {
            Err(CatalogError::Status { status, .. }) => assert_eq!(status.as_u16(), 404),
            other => panic!("expected status error, got {other:?}"),
        }
    }
    assert_eq!(client.cache().entry_count(), 0);
}

#[tokio::test]
async fn test_failed_page_fetch_leaves_cursor_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/location-area"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_secs(5));
    let mut cursor = PaginationCursor::new();

    let result = client.fetch_next_page(&mut cursor).await;

    assert!(matches!(result, Err(CatalogError::Status { .. })));
    assert_eq!(cursor, PaginationCursor::new());
}
