//! End-to-end pipeline tests against a local HTTP server standing in for
//! the Reddit API.

use reddit_popular::{fetch_popular, Credentials, RedditClient, RetryConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tiny_http::{Header, Response, Server};

struct MockReddit {
    base: String,
    listing_calls: Arc<AtomicUsize>,
}

fn json_header() -> Header {
    Header::from_bytes(b"Content-Type", b"application/json").unwrap()
}

/// Serves the token endpoint and a fixed sequence of listing pages.
/// The first `rate_limit_first` listing calls get a 429 with Retry-After: 0.
fn spawn_server(auth_ok: bool, rate_limit_first: usize, pages: Vec<String>) -> MockReddit {
    let server = Server::http("127.0.0.1:0").expect("failed to bind mock server");
    let port = server.server_addr().to_ip().unwrap().port();
    let listing_calls = Arc::new(AtomicUsize::new(0));
    let listing_calls_srv = listing_calls.clone();

    thread::spawn(move || {
        let mut served = 0usize;
        for request in server.incoming_requests() {
            let url = request.url().to_string();

            if url.starts_with("/api/v1/access_token") {
                let response = if auth_ok {
                    Response::from_string(
                        r#"{"access_token":"mock-token","token_type":"bearer","expires_in":3600,"scope":"*"}"#,
                    )
                    .with_header(json_header())
                } else {
                    Response::from_string(r#"{"error":401}"#)
                        .with_status_code(401)
                        .with_header(json_header())
                };
                let _ = request.respond(response);
            } else if url.starts_with("/subreddits/popular") {
                let call = listing_calls_srv.fetch_add(1, Ordering::SeqCst);
                if call < rate_limit_first {
                    let response = Response::from_string("{}")
                        .with_status_code(429)
                        .with_header(Header::from_bytes(b"Retry-After", b"0").unwrap());
                    let _ = request.respond(response);
                } else {
                    let body = pages
                        .get(served)
                        .cloned()
                        .unwrap_or_else(|| listing_page(&[], None));
                    served += 1;
                    let _ = request.respond(
                        Response::from_string(body).with_header(json_header()),
                    );
                }
            } else {
                let _ = request.respond(Response::from_string("not found").with_status_code(404));
            }
        }
    });

    MockReddit {
        base: format!("http://127.0.0.1:{port}"),
        listing_calls,
    }
}

fn listing_page(names: &[&str], after: Option<&str>) -> String {
    let children: Vec<String> = names
        .iter()
        .map(|n| format!(r#"{{"kind":"t5","data":{{"display_name":"{n}"}}}}"#))
        .collect();
    let after = match after {
        Some(cursor) => format!(r#""{cursor}""#),
        None => "null".to_string(),
    };
    format!(
        r#"{{"kind":"Listing","data":{{"children":[{}],"after":{},"dist":{}}}}}"#,
        children.join(","),
        after,
        names.len()
    )
}

fn client_for(mock: &MockReddit) -> RedditClient {
    RedditClient::with_endpoints(
        "subreddit-lists-tests/0.1",
        &format!("{}/api/v1/access_token", mock.base),
        &mock.base,
    )
    .unwrap()
}

fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 4,
        base_delay_ms: 1,
        max_delay_ms: 10,
        backoff_multiplier: 2.0,
        jitter_factor: 0.0,
    }
}

fn test_credentials() -> Credentials {
    Credentials::new("test_id".to_string(), "test_secret".to_string()).unwrap()
}

#[tokio::test]
async fn test_walks_pages_and_truncates_at_target() {
    let names: Vec<String> = (0..30).map(|i| format!("sub{i:02}")).collect();
    let refs = |range: std::ops::Range<usize>| {
        names[range].iter().map(|s| s.as_str()).collect::<Vec<_>>()
    };
    let mock = spawn_server(
        true,
        0,
        vec![
            listing_page(&refs(0..10), Some("t5_a")),
            listing_page(&refs(10..20), Some("t5_b")),
            listing_page(&refs(20..30), None),
        ],
    );

    let client = client_for(&mock);
    let result = fetch_popular(&client, &test_credentials(), 25, fast_retry())
        .await
        .unwrap();

    assert_eq!(result.len(), 25);
    assert_eq!(result, names[..25].to_vec());
    assert_eq!(mock.listing_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_rate_limited_pages_are_retried() {
    let mock = spawn_server(
        true,
        2,
        vec![listing_page(&["rust", "programming"], None)],
    );

    let client = client_for(&mock);
    let result = fetch_popular(&client, &test_credentials(), 100, fast_retry())
        .await
        .unwrap();

    // Two throttled attempts plus the successful one; the result is
    // unaffected by the earlier failures.
    assert_eq!(result, vec!["rust", "programming"]);
    assert_eq!(mock.listing_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_auth_failure_prevents_listing_calls() {
    let mock = spawn_server(false, 0, vec![]);

    let client = client_for(&mock);
    let err = fetch_popular(&client, &test_credentials(), 100, fast_retry())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        lists_core::ListsError::Authentication { .. }
    ));
    assert_eq!(mock.listing_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_listing_is_fatal_upstream_error() {
    let mock = spawn_server(true, 0, vec![r#"{"unexpected":"shape"}"#.to_string()]);

    let client = client_for(&mock);
    let err = fetch_popular(&client, &test_credentials(), 100, fast_retry())
        .await
        .unwrap_err();

    assert!(matches!(err, lists_core::ListsError::Upstream { .. }));
    // Not retried: the shape will come back just as unexpected.
    assert_eq!(mock.listing_calls.load(Ordering::SeqCst), 1);
}
