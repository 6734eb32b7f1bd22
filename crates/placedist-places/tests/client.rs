//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use std::time::{Duration, Instant};

use placedist_core::{Category, Coordinate};
use placedist_places::{PlaceSearch, PlacesClient, PlacesError, SearchSettings};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_settings() -> SearchSettings {
    SearchSettings {
        timeout_secs: 5,
        page_token_delay_ms: 0,
        max_retries: 0,
        backoff_base_ms: 0,
        ..SearchSettings::default()
    }
}

fn test_client(base_url: &str, settings: SearchSettings) -> PlacesClient {
    PlacesClient::with_base_url("test-key", settings, base_url)
        .expect("client construction should not fail")
}

fn place(lat: f64, lng: f64) -> serde_json::Value {
    serde_json::json!({ "geometry": { "location": { "lat": lat, "lng": lng } } })
}

fn page(results: Vec<serde_json::Value>, next: Option<&str>) -> serde_json::Value {
    let mut body = serde_json::json!({ "status": "OK", "results": results });
    if let Some(token) = next {
        body["next_page_token"] = serde_json::Value::String(token.to_owned());
    }
    body
}

fn origin() -> Coordinate {
    Coordinate::new(12.9, 77.6)
}

#[tokio::test]
async fn fetch_page_sends_key_query_and_location() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .and(query_param("key", "test-key"))
        .and(query_param("query", "business park"))
        .and(query_param("location", "12.9,77.6"))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![place(12.91, 77.61), serde_json::json!({ "name": "no geometry" })],
            Some("NEXT"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), fast_settings());
    let page = client
        .fetch_page("business park", origin(), None)
        .await
        .expect("should parse page");

    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].location, Some(Coordinate::new(12.91, 77.61)));
    assert!(page.results[1].location.is_none());
    assert_eq!(page.next_page_token.as_deref(), Some("NEXT"));
}

#[tokio::test]
async fn fetch_all_follows_three_page_chain() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![place(1.0, 1.0), place(1.1, 1.1)],
            Some("T1"),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("pagetoken", "T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![place(2.0, 2.0), place(2.1, 2.1), place(2.2, 2.2)],
            Some("T2"),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("pagetoken", "T2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(vec![place(3.0, 3.0)], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), fast_settings());
    let results = client
        .fetch_all("school", origin())
        .await
        .expect("all pages should succeed");

    assert_eq!(results.len(), 6);
    assert_eq!(results[0].location, Some(Coordinate::new(1.0, 1.0)));
    assert_eq!(results[5].location, Some(Coordinate::new(3.0, 3.0)));
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn fetch_all_stops_at_page_cap() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place(1.0, 1.0)], Some("A"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("pagetoken", "A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place(2.0, 2.0)], Some("B"))))
        .mount(&server)
        .await;

    let settings = SearchSettings {
        max_pages: 2,
        ..fast_settings()
    };
    let client = test_client(&server.uri(), settings);
    let results = client.fetch_all("mall", origin()).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn fetch_all_stops_when_a_token_repeats() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place(1.0, 1.0)], Some("LOOP"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("pagetoken", "LOOP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place(2.0, 2.0)], Some("LOOP"))))
        .mount(&server)
        .await;

    let settings = SearchSettings {
        max_pages: 10,
        ..fast_settings()
    };
    let client = test_client(&server.uri(), settings);
    let results = client.fetch_all("hotel", origin()).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn fetch_all_retries_a_pending_token_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place(1.0, 1.0)], Some("SLOW"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("pagetoken", "SLOW"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "INVALID_REQUEST", "results": [] })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("pagetoken", "SLOW"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place(2.0, 2.0)], None)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), fast_settings());
    let results = client.fetch_all("office", origin()).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn fetch_all_gives_up_after_second_pending_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place(1.0, 1.0)], Some("NEVER"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("pagetoken", "NEVER"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "INVALID_REQUEST" })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), fast_settings());
    let result = client.fetch_all("office", origin()).await;

    assert!(matches!(result, Err(PlacesError::TokenNotReady)));
}

#[tokio::test]
async fn invalid_request_on_first_page_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "INVALID_REQUEST",
            "error_message": "missing query"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), fast_settings());
    let result = client.fetch_all("shop", origin()).await;

    assert!(matches!(result, Err(PlacesError::Api { ref status, .. }) if status == "INVALID_REQUEST"));
}

#[tokio::test]
async fn zero_results_is_an_empty_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), fast_settings());
    let results = client.fetch_all("theater", origin()).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), fast_settings());
    let result = client.fetch_page("transit", origin(), None).await;
    assert!(matches!(result, Err(PlacesError::Deserialize { .. })));
}

#[tokio::test]
async fn server_error_is_retried_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place(1.0, 1.0)], None)))
        .mount(&server)
        .await;

    let settings = SearchSettings {
        max_retries: 2,
        ..fast_settings()
    };
    let client = test_client(&server.uri(), settings);
    let results = client.fetch_all("hospital", origin()).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn client_error_status_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let settings = SearchSettings {
        max_retries: 3,
        ..fast_settings()
    };
    let client = test_client(&server.uri(), settings);
    let result = client.fetch_page("college", origin(), None).await;

    assert!(matches!(
        result,
        Err(PlacesError::UnexpectedStatus { status: 403 })
    ));
}

#[tokio::test]
async fn slow_response_times_out_as_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(vec![], None))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let settings = SearchSettings {
        timeout_secs: 1,
        ..fast_settings()
    };
    let client = test_client(&server.uri(), settings);
    let result = client.fetch_page("society", origin(), None).await;

    assert!(matches!(result, Err(PlacesError::Http(ref e)) if e.is_timeout()));
}

#[tokio::test]
async fn place_search_uses_category_query_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("query", "business park"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place(1.0, 1.0)], None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), fast_settings());
    let results = client
        .search_all(Category::BusinessPark, origin())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn malformed_place_is_skipped_and_its_siblings_are_kept() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                serde_json::json!({ "geometry": { "location": { "lat": "n/a", "lng": 77.6 } } }),
                place(12.9045, 77.6),
            ],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), fast_settings());
    let results = client
        .fetch_all("school", origin())
        .await
        .expect("a bad place must not fail the page");

    assert_eq!(results.len(), 2);
    assert!(results[0].location.is_none());
    assert_eq!(results[1].location, Some(Coordinate::new(12.9045, 77.6)));
}

#[tokio::test]
async fn in_flight_cap_of_one_runs_requests_one_after_another() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(vec![place(1.0, 1.0)], None))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let settings = SearchSettings {
        max_in_flight: 1,
        ..fast_settings()
    };
    let client = test_client(&server.uri(), settings);

    let started = Instant::now();
    let (school, hospital) = tokio::join!(
        client.search_all(Category::School, origin()),
        client.search_all(Category::Hospital, origin()),
    );
    let elapsed = started.elapsed();

    assert_eq!(school.unwrap().len(), 1);
    assert_eq!(hospital.unwrap().len(), 1);
    assert!(
        elapsed >= Duration::from_millis(400),
        "two 200 ms requests under a cap of one finished in {elapsed:?}"
    );
}

#[tokio::test]
async fn http_429_is_rate_limited_and_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place(1.0, 1.0)], None)))
        .mount(&server)
        .await;

    let settings = SearchSettings {
        max_retries: 2,
        ..fast_settings()
    };
    let client = test_client(&server.uri(), settings);
    let results = client.fetch_all("restaurant", origin()).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn http_429_without_retries_left_is_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), fast_settings());
    let result = client.fetch_page("restaurant", origin(), None).await;

    assert!(matches!(result, Err(PlacesError::RateLimited(_))));
}

#[tokio::test]
async fn continuation_request_waits_for_the_page_token_delay() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place(1.0, 1.0)], Some("T1"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("pagetoken", "T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place(2.0, 2.0)], None)))
        .mount(&server)
        .await;

    let settings = SearchSettings {
        page_token_delay_ms: 250,
        ..fast_settings()
    };
    let client = test_client(&server.uri(), settings);

    let started = Instant::now();
    let results = client.fetch_all("mall", origin()).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(results.len(), 2);
    assert!(
        elapsed >= Duration::from_millis(250),
        "continuation was requested after only {elapsed:?}"
    );
}

#[tokio::test]
async fn single_page_search_does_not_wait_for_the_page_token_delay() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place(1.0, 1.0)], None)))
        .mount(&server)
        .await;

    let settings = SearchSettings {
        page_token_delay_ms: 10_000,
        ..fast_settings()
    };
    let client = test_client(&server.uri(), settings);

    let started = Instant::now();
    let results = client.fetch_all("mall", origin()).await.unwrap();

    assert_eq!(results.len(), 1);
    assert!(started.elapsed() < Duration::from_secs(5));
}
