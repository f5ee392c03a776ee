//! Request and upstream-error metrics, read back from a Prometheus recorder.
//!
//! Each test installs a thread-local recorder; `#[tokio::test]` runs the
//! router and the upstream client on that same thread.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn request(verb: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(verb)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Sum of every sample of `name` whose labels include all of `labels`.
fn sample(rendered: &str, name: &str, labels: &[&str]) -> f64 {
    let prefix = format!("{name}{{");
    rendered
        .lines()
        .filter(|line| line.starts_with(&prefix))
        .filter(|line| labels.iter().all(|label| line.contains(label)))
        .filter_map(|line| line.rsplit(' ').next()?.parse::<f64>().ok())
        .sum()
}

fn series_count(rendered: &str, name: &str) -> usize {
    let prefix = format!("{name}{{");
    rendered.lines().filter(|line| line.starts_with(&prefix)).count()
}

#[tokio::test]
async fn test_arbitrary_methods_share_one_series() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let _guard = metrics::set_default_local_recorder(&recorder);

    let router = common::test_router(&common::test_config("http://127.0.0.1:9"));
    for i in 0..50 {
        let response = router
            .clone()
            .oneshot(request(&format!("X{i}"), "/api/proxy/servers"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    let rendered = handle.render();
    assert_eq!(series_count(&rendered, "proxy_requests_total"), 1);
    assert_eq!(
        sample(&rendered, "proxy_requests_total", &[r#"method="other""#, r#"status="405""#]),
        50.0
    );
}

#[tokio::test]
async fn test_requests_counted_per_branch() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let _guard = metrics::set_default_local_recorder(&recorder);

    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"rows":[]}"#, "application/json"))
        .mount(&upstream)
        .await;

    let router = common::test_router(&common::test_config(&upstream.uri()));
    let ok = router.clone().oneshot(request("GET", "/api/proxy/servers")).await.unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    let rejected = router.clone().oneshot(request("POST", "/api/proxy/servers")).await.unwrap();
    assert_eq!(rejected.status(), StatusCode::METHOD_NOT_ALLOWED);
    let preflight = router.oneshot(request("OPTIONS", "/api/proxy/servers")).await.unwrap();
    assert_eq!(preflight.status(), StatusCode::OK);

    let rendered = handle.render();
    assert_eq!(
        sample(&rendered, "proxy_requests_total", &[r#"method="GET""#, r#"status="200""#]),
        1.0
    );
    assert_eq!(
        sample(&rendered, "proxy_requests_total", &[r#"method="other""#, r#"status="405""#]),
        1.0
    );
    assert_eq!(
        sample(&rendered, "proxy_requests_total", &[r#"method="OPTIONS""#, r#"status="200""#]),
        1.0
    );
    assert_eq!(sample(&rendered, "proxy_upstream_errors_total", &[]), 0.0);
    assert!(rendered.contains("proxy_request_duration_seconds"));
}

#[tokio::test]
async fn test_upstream_errors_counted_by_kind() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let _guard = metrics::set_default_local_recorder(&recorder);

    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&upstream)
        .await;
    let payload_router = common::test_router(&common::test_config(&upstream.uri()));
    let response = payload_router.oneshot(request("GET", "/api/proxy/servers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let closed = common::closed_addr().await;
    let transport_router = common::test_router(&common::test_config(&format!("http://{closed}")));
    let response = transport_router.oneshot(request("GET", "/api/proxy/servers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let rendered = handle.render();
    assert_eq!(
        sample(&rendered, "proxy_upstream_errors_total", &[r#"kind="payload""#]),
        1.0
    );
    assert_eq!(
        sample(&rendered, "proxy_upstream_errors_total", &[r#"kind="transport""#]),
        1.0
    );
    assert_eq!(
        sample(&rendered, "proxy_requests_total", &[r#"method="GET""#, r#"status="500""#]),
        2.0
    );
}
