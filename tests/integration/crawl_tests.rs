//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! real `reqwest` transport end-to-end.

use adstxt::config::{Config, CrawlerConfig};
use adstxt::{AdsTxtError, BatchStats, Crawler, Relationship, Request, Response};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADS_TXT: &str = "# ads.txt file for example.com\r\n\
greenadexchange.com, 12345, DIRECT, d75815a79\r\n\
blueadexchange.com, XF436, RESELLER\r\n\
\r\n\
CONTACT=adops@example.com\r\n\
not a valid line\r\n\
silverssp.com, 9675, reseller, f496211";

fn request_for(server: &MockServer, file_path: &str) -> Request {
    let url = Url::parse(&format!("{}{}", server.uri(), file_path))
        .expect("Failed to parse mock URL");
    Request::new("example.com", url)
}

fn crawler() -> Crawler {
    Crawler::new(&Config::default()).expect("Failed to build crawler")
}

fn crawler_with(crawler_config: CrawlerConfig) -> Crawler {
    let config = Config {
        crawler: crawler_config,
        ..Config::default()
    };
    Crawler::new(&config).expect("Failed to build crawler")
}

#[tokio::test]
async fn test_fetch_and_parse() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ADS_TXT))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = request_for(&mock_server, "/ads.txt");
    let response = crawler().get(&request).await.expect("Crawl failed");

    let data: Vec<_> = response.records.data().collect();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0].ad_system_domain, "greenadexchange.com");
    assert_eq!(data[0].certification_authority_id.as_deref(), Some("d75815a79"));
    assert_eq!(data[1].relationship, Relationship::Reseller);
    assert_eq!(data[1].certification_authority_id, None);
    assert_eq!(data[2].relationship, Relationship::Reseller);
    assert_eq!(
        response.records.variable("CONTACT").collect::<Vec<_>>(),
        vec!["adops@example.com"]
    );

    // No caching headers: default seven day window
    let expected = Utc::now() + Duration::days(7);
    assert!((expected - response.expires).num_seconds().abs() < 5);
    assert_eq!(response.final_url, request.url);
}

#[tokio::test]
async fn test_follows_single_redirect() {
    let mock_server = MockServer::start().await;
    let target = format!("{}/moved/ads.txt", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/ads.txt"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/moved/ads.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("example.net, 1, DIRECT\n"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = request_for(&mock_server, "/ads.txt");
    let response = crawler().get(&request).await.expect("Crawl failed");

    assert_eq!(response.records.len(), 1);
    assert_eq!(response.final_url.as_str(), target);
    assert!(response.was_redirected());
    assert!(request.url.as_str().ends_with("/ads.txt"));

    // Wiremock verifies the expected hit counts when mock_server drops
}

#[tokio::test]
async fn test_not_found_is_client_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads.txt"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = crawler()
        .get(&request_for(&mock_server, "/ads.txt"))
        .await
        .expect_err("404 must fail");

    assert!(err.is_client_error());
    match err {
        AdsTxtError::ClientError {
            status,
            domain,
            url,
        } => {
            assert_eq!(status, 404);
            assert_eq!(domain, "example.com");
            assert!(url.ends_with("/ads.txt"));
        }
        other => panic!("expected ClientError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads.txt"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = crawler()
        .get(&request_for(&mock_server, "/ads.txt"))
        .await
        .expect_err("503 must fail");

    assert_eq!(err.status(), Some(503));
    assert!(matches!(err, AdsTxtError::ServerError { .. }));
}

#[tokio::test]
async fn test_cache_control_sets_expiry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("example.net, 1, DIRECT\n")
                .insert_header("cache-control", "public, max-age=86400"),
        )
        .mount(&mock_server)
        .await;

    let response = crawler()
        .get(&request_for(&mock_server, "/ads.txt"))
        .await
        .expect("Crawl failed");

    let expected = Utc::now() + Duration::days(1);
    assert!((expected - response.expires).num_seconds().abs() < 5);
}

#[tokio::test]
async fn test_redirect_loop_terminates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads.txt"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/other.txt"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/other.txt"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/ads.txt"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = crawler()
        .get(&request_for(&mock_server, "/ads.txt"))
        .await
        .expect_err("loop must fail");

    assert!(matches!(err, AdsTxtError::RedirectLoop { .. }));
}

#[tokio::test]
async fn test_redirect_limit() {
    let mock_server = MockServer::start().await;

    for i in 0..5 {
        Mock::given(method("GET"))
            .and(path(format!("/hop{}", i)))
            .respond_with(
                ResponseTemplate::new(307)
                    .insert_header("location", format!("/hop{}", i + 1).as_str()),
            )
            .mount(&mock_server)
            .await;
    }

    let crawler = crawler_with(CrawlerConfig {
        max_redirects: 2,
        ..CrawlerConfig::default()
    });

    let err = crawler
        .get(&request_for(&mock_server, "/hop0"))
        .await
        .expect_err("chain must fail");

    assert!(matches!(err, AdsTxtError::TooManyRedirects { max: 2, .. }));
    let received = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(received.len(), 3);
}

#[tokio::test]
async fn test_body_size_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ADS_TXT))
        .mount(&mock_server)
        .await;

    let crawler = crawler_with(CrawlerConfig {
        max_body_bytes: 16,
        ..CrawlerConfig::default()
    });

    let err = crawler
        .get(&request_for(&mock_server, "/ads.txt"))
        .await
        .expect_err("oversized body must fail");

    assert!(matches!(err, AdsTxtError::BodyTooLarge { limit: 16, .. }));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Grab a free port, then close it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("No local addr").port();
    drop(listener);

    let url = Url::parse(&format!("http://127.0.0.1:{}/ads.txt", port)).unwrap();
    let request = Request::new("example.com", url);

    let err = crawler().get(&request).await.expect_err("closed port must fail");
    assert!(matches!(err, AdsTxtError::Transport { .. }));
}

#[tokio::test]
async fn test_batch_mixed_outcomes() {
    let mock_server = MockServer::start().await;

    for i in 0..8 {
        let template = if i % 2 == 0 {
            ResponseTemplate::new(200).set_body_string(format!("ssp{}.com, {}, DIRECT\n", i, i))
        } else {
            ResponseTemplate::new(404)
        };
        Mock::given(method("GET"))
            .and(path(format!("/site{}/ads.txt", i)))
            .respond_with(template)
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let requests: Vec<Request> = (0..8)
        .map(|i| {
            let url = Url::parse(&format!("{}/site{}/ads.txt", mock_server.uri(), i)).unwrap();
            Request::new(format!("site{}.example", i), url)
        })
        .collect();

    let crawler = crawler_with(CrawlerConfig {
        max_concurrent_requests: 3,
        ..CrawlerConfig::default()
    });

    let mut outcomes: HashMap<String, Result<usize, u16>> = HashMap::new();
    let stats = crawler
        .get_multiple(requests, |request: &Request, outcome: adstxt::Result<Response>| {
            let previous = outcomes.insert(
                request.domain.clone(),
                outcome
                    .map(|response| response.records.len())
                    .map_err(|e| e.status().unwrap_or_default()),
            );
            assert!(previous.is_none(), "{} handled twice", request.domain);
        })
        .await;

    assert_eq!(
        stats,
        BatchStats {
            total: 8,
            succeeded: 4,
            failed: 4
        }
    );
    assert_eq!(outcomes.len(), 8);
    for i in 0..8 {
        let outcome = &outcomes[&format!("site{}.example", i)];
        if i % 2 == 0 {
            assert_eq!(outcome, &Ok(1));
        } else {
            assert_eq!(outcome, &Err(404));
        }
    }
}
