//! Integration tests for requesting help and managing requests.

#![allow(clippy::unwrap_used)]

use donor_finder_core::{DonorId, Email, RequestStatus};
use donor_finder_integration_tests::{TestContext, users};
use donor_finder_web::config::{FeatureFlags, WebConfig};
use reqwest::StatusCode;

#[tokio::test]
async fn test_request_help_marks_donor() {
    let ctx = TestContext::new(users(4)).await;

    let page = ctx.submit("/donors/1/request", &[]).await;
    assert_eq!(page.matches("Request Sent").count(), 1);
    assert!(page.contains("status pending"));

    let stored = ctx.stored_requests();
    assert_eq!(stored.len(), 1);
    let request = stored.first().unwrap();
    assert_eq!(request.donor_id, DonorId::new(1));
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.name, "Donor 01");
}

#[tokio::test]
async fn test_request_help_is_idempotent() {
    let ctx = TestContext::new(users(4)).await;

    ctx.submit("/donors/2/request", &[]).await;
    ctx.submit("/donors/2/request", &[]).await;

    assert_eq!(ctx.stored_requests().len(), 1);
}

#[tokio::test]
async fn test_unavailable_donor_cannot_be_requested() {
    let ctx = TestContext::new(users(4)).await;

    // Index 2 is unavailable
    let page = ctx.submit("/donors/3/request", &[]).await;
    assert!(ctx.stored_requests().is_empty());
    assert!(!page.contains("Request Sent"));
    assert!(page.contains("Request Help</button>"));
}

#[tokio::test]
async fn test_unknown_donor_is_not_found() {
    let ctx = TestContext::new(users(4)).await;
    let response = ctx.post_form("/donors/99/request", &[]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_persisted_shape() {
    let ctx = TestContext::new(users(1)).await;
    ctx.submit("/donors/1/request", &[]).await;

    let raw = ctx.store_value("requests");
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = json.get(0).unwrap();
    assert!(record.get("id").unwrap().is_i64());
    assert_eq!(record.get("donorId").unwrap(), 1);
    assert_eq!(record.get("bloodGroup").unwrap(), "A+");
    assert_eq!(record.get("city").unwrap(), "Chennai");
    assert_eq!(record.get("status").unwrap(), "pending");
    assert!(record.get("date").unwrap().is_string());
    assert!(record.get("requesterEmail").is_none());
}

#[tokio::test]
async fn test_my_requests_page_and_cancel() {
    let ctx = TestContext::new(users(4)).await;

    let page = ctx.get_page("/requests").await;
    assert!(page.contains("No requests sent yet."));

    ctx.submit("/donors/2/request", &[]).await;
    let id = ctx.stored_requests().first().unwrap().id;

    let page = ctx.get_page("/requests").await;
    assert!(page.contains("My Requests"));
    assert!(page.contains("Donor 02"));
    assert!(page.contains("status pending"));

    let page = ctx
        .submit(&format!("/requests/{id}/cancel"), &[("return_to", "/requests")])
        .await;
    assert!(page.contains("No requests sent yet."));
    assert!(ctx.stored_requests().is_empty());

    // Cancelling again is a no-op
    let response = ctx
        .post_form(&format!("/requests/{id}/cancel"), &[("return_to", "/")])
        .await;
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_cancel_frees_donor() {
    let ctx = TestContext::new(users(4)).await;
    ctx.submit("/donors/1/request", &[]).await;
    let id = ctx.stored_requests().first().unwrap().id;

    let page = ctx
        .submit(&format!("/requests/{id}/cancel"), &[("return_to", "/")])
        .await;
    assert!(!page.contains("Request Sent"));
    assert!(page.contains("No requests sent yet"));
}

#[tokio::test]
async fn test_status_updates() {
    let ctx = TestContext::new(users(4)).await;
    ctx.submit("/donors/1/request", &[]).await;
    let id = ctx.stored_requests().first().unwrap().id;

    let page = ctx
        .submit(&format!("/requests/{id}/status"), &[("status", "accepted")])
        .await;
    assert!(page.contains("status accepted"));

    // Accepted requests still block a second request
    let page = ctx.get_page("/").await;
    assert!(page.contains("Request Sent"));

    ctx.submit(
        &format!("/requests/{id}/status"),
        &[("status", "rejected"), ("return_to", "/")],
    )
    .await;
    let page = ctx.submit("/donors/1/request", &[]).await;
    assert_eq!(ctx.stored_requests().len(), 2);
    assert!(page.contains("status rejected"));
    assert!(page.contains("status pending"));
}

#[tokio::test]
async fn test_status_rejects_unknown_value() {
    let ctx = TestContext::new(users(1)).await;
    let response = ctx
        .post_form("/requests/1/status", &[("status", "done")])
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_disabled() {
    let config = WebConfig {
        features: FeatureFlags {
            allow_cancel: false,
            ..FeatureFlags::default()
        },
        ..WebConfig::default()
    };
    let ctx = TestContext::with_config(config, users(2)).await;
    ctx.submit("/donors/1/request", &[]).await;
    let id = ctx.stored_requests().first().unwrap().id;

    let page = ctx.get_page("/requests").await;
    assert!(!page.contains("btn-cancel"));

    let response = ctx
        .post_form(&format!("/requests/{id}/cancel"), &[])
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(ctx.stored_requests().len(), 1);
}

#[tokio::test]
async fn test_requests_are_namespaced_by_requester() {
    let alice: Email = "alice@email.com".parse().unwrap();
    let bob: Email = "bob@email.com".parse().unwrap();
    let config = WebConfig {
        requester_email: Some(alice.clone()),
        ..WebConfig::default()
    };
    let ctx = TestContext::with_config(config, users(4)).await;

    // Someone else already asked donor 1
    let donors = ctx.state.donors().await.unwrap();
    ctx.state
        .requests()
        .submit(donors.first().unwrap(), Some(&bob))
        .unwrap();

    let page = ctx.get_page("/requests").await;
    assert!(page.contains("No requests sent yet."));
    assert!(page.contains("alice@email.com"));

    // Bob's request does not block Alice
    let page = ctx.submit("/donors/1/request", &[]).await;
    assert!(page.contains("Request Sent"));

    let stored = ctx.stored_requests();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored.last().unwrap().requester_email, Some(alice));
}

#[tokio::test]
async fn test_anonymous_panel_hides_other_requesters() {
    let bob: Email = "bob@email.com".parse().unwrap();
    let ctx = TestContext::new(users(4)).await;

    // Made from the CLI with --requester
    let donors = ctx.state.donors().await.unwrap();
    ctx.state
        .requests()
        .submit(donors.first().unwrap(), Some(&bob))
        .unwrap();

    let page = ctx.get_page("/").await;
    assert!(page.contains("No requests sent yet"));
    assert!(!page.contains("Request Sent"));

    let page = ctx.get_page("/requests").await;
    assert!(page.contains("No requests sent yet."));
}

#[tokio::test]
async fn test_cannot_change_other_requesters_requests() {
    let alice: Email = "alice@email.com".parse().unwrap();
    let bob: Email = "bob@email.com".parse().unwrap();
    let config = WebConfig {
        requester_email: Some(alice),
        ..WebConfig::default()
    };
    let ctx = TestContext::with_config(config, users(4)).await;

    let donors = ctx.state.donors().await.unwrap();
    let bobs = ctx
        .state
        .requests()
        .submit(donors.first().unwrap(), Some(&bob))
        .unwrap()
        .unwrap();

    ctx.submit(
        &format!("/requests/{}/status", bobs.id),
        &[("status", "rejected")],
    )
    .await;
    ctx.submit(
        &format!("/requests/{}/cancel", bobs.id),
        &[("return_to", "/requests")],
    )
    .await;

    assert_eq!(ctx.stored_requests(), vec![bobs]);
}
