//! Integration tests for the rate limiting middleware

mod common;

use actix_web::{http::header, test};
use serde_json::{json, Value};

use ca_api::create_app;
use common::{peer, TestContext, EXTERNAL_PEER, INTERNAL_PEER, SERVICE_KEY};

fn verify_request(addr: &str, token: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/auth/verify")
        .peer_addr(peer(addr))
        .set_json(json!({ "token": token }))
}

#[actix_web::test]
async fn test_fourth_external_request_is_limited() {
    let ctx = TestContext::with_limits(10, 3);
    let token = ctx.access_token("u1");
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let mut statuses = Vec::new();
    let mut last = None;
    for _ in 0..4 {
        let resp = test::call_service(&app, verify_request(EXTERNAL_PEER, &token).to_request()).await;
        statuses.push(resp.status().as_u16());
        last = Some(resp);
    }
    assert_eq!(statuses, vec![200, 200, 200, 429]);

    let resp = last.unwrap();
    let retry_after: u64 = resp
        .headers()
        .get(header::RETRY_AFTER)
        .expect("Retry-After header")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));
    assert_eq!(resp.headers().get("X-RateLimit-Remaining").unwrap(), "0");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "rate_limit_exceeded");
    assert_eq!(body["code"], "RATE_LIMIT");
}

#[actix_web::test]
async fn test_rate_limit_headers_count_down() {
    let ctx = TestContext::with_limits(10, 3);
    let token = ctx.access_token("u1");
    let app = test::init_service(create_app(ctx.state.clone())).await;

    for expected_remaining in ["2", "1", "0"] {
        let resp = test::call_service(&app, verify_request(EXTERNAL_PEER, &token).to_request()).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("X-RateLimit-Limit").unwrap(), "3");
        assert_eq!(resp.headers().get("X-RateLimit-Remaining").unwrap(), expected_remaining);

        let reset: i64 = resp
            .headers()
            .get("X-RateLimit-Reset")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(reset > chrono::Utc::now().timestamp());
    }
}

#[actix_web::test]
async fn test_callers_do_not_share_counters() {
    let ctx = TestContext::with_limits(10, 1);
    let token = ctx.access_token("u1");
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let first = test::call_service(&app, verify_request("203.0.113.1:1000", &token).to_request()).await;
    let second = test::call_service(&app, verify_request("203.0.113.2:1000", &token).to_request()).await;
    let repeat = test::call_service(&app, verify_request("203.0.113.1:1000", &token).to_request()).await;

    assert_eq!(first.status(), 200);
    assert_eq!(second.status(), 200);
    assert_eq!(repeat.status(), 429);
}

#[actix_web::test]
async fn test_internal_callers_get_the_higher_ceiling() {
    let ctx = TestContext::with_limits(5, 1);
    let token = ctx.access_token("u1");
    let app = test::init_service(create_app(ctx.state.clone())).await;

    for _ in 0..5 {
        let resp = test::call_service(&app, verify_request(INTERNAL_PEER, &token).to_request()).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("X-RateLimit-Limit").unwrap(), "5");
    }
    let resp = test::call_service(&app, verify_request(INTERNAL_PEER, &token).to_request()).await;
    assert_eq!(resp.status(), 429);

    // A service key is counted under its own identifier
    let resp = test::call_service(
        &app,
        verify_request(EXTERNAL_PEER, &token)
            .insert_header(("X-Service-API-Key", SERVICE_KEY))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers().get("X-RateLimit-Limit").unwrap(), "5");
}

#[actix_web::test]
async fn test_limited_requests_never_reach_the_handler() {
    let ctx = TestContext::with_limits(10, 1);
    let token = ctx.access_token("u1");
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let first = test::call_service(&app, verify_request(EXTERNAL_PEER, &token).to_request()).await;
    assert_eq!(first.status(), 200);

    let req = test::TestRequest::post()
        .uri("/auth/revoke")
        .peer_addr(peer(EXTERNAL_PEER))
        .set_json(json!({ "token": token.clone() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 429);

    // The revoke above was refused, so the token is still good
    let result = ctx.token_service.verify_token(&token).await;
    assert!(result.valid);
}
