//! Integration tests for the donor directory page.

#![allow(clippy::unwrap_used)]

use donor_finder_integration_tests::{TestContext, users};
use donor_finder_web::config::{FeatureFlags, WebConfig};
use reqwest::StatusCode;

fn order(page: &str, names: &[&str]) -> Vec<usize> {
    names
        .iter()
        .map(|name| page.find(name).unwrap_or(usize::MAX))
        .collect()
}

fn is_ascending(positions: &[usize]) -> bool {
    positions.windows(2).all(|pair| pair.first() < pair.last())
}

#[tokio::test]
async fn test_directory_lists_all_donors() {
    let ctx = TestContext::new(users(9)).await;
    let page = ctx.get_page("/").await;

    assert!(page.contains("Blood Donor Finder"));
    assert!(page.contains("Available: 6"));
    assert!(page.contains("9 donors"));
    for id in 1..=9 {
        assert!(page.contains(&format!("Donor {id:02}")));
    }
    assert!(page.contains("badge-a-pos"));
    assert!(page.contains("api.dicebear.com"));
    // Clear only appears after a search
    assert!(!page.contains("formaction=\"/clear\""));
    assert!(page.contains("No requests sent yet"));
}

#[tokio::test]
async fn test_loading_state() {
    let ctx = TestContext::loading(WebConfig::default()).await;
    let page = ctx.get_page("/").await;
    assert!(page.contains("Loading donors..."));
    assert!(!page.contains("No donors found"));
}

#[tokio::test]
async fn test_empty_directory_shows_no_donors() {
    let ctx = TestContext::new(Vec::new()).await;
    let page = ctx.get_page("/").await;
    assert!(page.contains("No donors found"));
    assert!(page.contains("Available: 0"));
}

#[tokio::test]
async fn test_search_then_clear() {
    let ctx = TestContext::new(users(13)).await;

    let page = ctx
        .submit("/search", &[("blood_group", "O+"), ("city", "All")])
        .await;
    assert!(page.contains("2 donors"));
    assert!(page.contains("Donor 05"));
    assert!(page.contains("Donor 13"));
    assert!(!page.contains("Donor 01"));
    assert!(page.contains("formaction=\"/clear\""));
    assert!(page.contains("<option value=\"O+\" selected>"));
    // Header count covers the whole directory
    assert!(page.contains("Available: 9"));

    let page = ctx.submit("/clear", &[]).await;
    assert!(page.contains("13 donors"));
    assert!(page.contains("Donor 01"));
    assert!(!page.contains("formaction=\"/clear\""));
    assert!(page.contains("<option value=\"All\" selected>"));
}

#[tokio::test]
async fn test_search_combines_filters() {
    let ctx = TestContext::new(users(13)).await;

    // Index 4 is O+ in Delhi, index 12 is O+ in Bangalore
    let page = ctx
        .submit("/search", &[("blood_group", "O+"), ("city", "Bangalore")])
        .await;
    assert!(page.contains("1 donor<"));
    assert!(page.contains("Donor 13"));
    assert!(!page.contains("Donor 05"));
}

#[tokio::test]
async fn test_search_without_matches() {
    let ctx = TestContext::new(users(2)).await;
    let page = ctx
        .submit("/search", &[("blood_group", "O+"), ("city", "All")])
        .await;
    assert!(page.contains("No donors found"));
    assert!(page.contains("0 donors"));
}

#[tokio::test]
async fn test_search_rejects_unknown_values() {
    let ctx = TestContext::new(users(3)).await;
    let response = ctx
        .post_form("/search", &[("blood_group", "C+"), ("city", "All")])
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sort_toggle() {
    let ctx = TestContext::new(users(6)).await;
    let names = ["Donor 01", "Donor 02", "Donor 03", "Donor 04", "Donor 05", "Donor 06"];

    let page = ctx.submit("/sort", &[("sort", "true")]).await;
    assert!(is_ascending(&order(
        &page,
        &["Donor 01", "Donor 02", "Donor 04", "Donor 05", "Donor 03", "Donor 06"]
    )));
    assert!(page.contains("btn-sort active"));

    let page = ctx.submit("/sort", &[("sort", "false")]).await;
    assert!(is_ascending(&order(&page, &names)));
    assert!(!page.contains("btn-sort active"));
}

#[tokio::test]
async fn test_clear_keeps_sort_flag() {
    let ctx = TestContext::new(users(6)).await;

    ctx.submit("/sort", &[("sort", "true")]).await;
    ctx.submit("/search", &[("blood_group", "All"), ("city", "Chennai")])
        .await;
    let page = ctx.submit("/clear", &[]).await;

    assert!(page.contains("6 donors"));
    assert!(page.contains("btn-sort active"));
}

#[tokio::test]
async fn test_view_state_is_per_visitor() {
    let ctx = TestContext::new(users(13)).await;
    ctx.submit("/search", &[("blood_group", "O+"), ("city", "All")])
        .await;

    let other = TestContext::client()
        .get(ctx.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(other.contains("13 donors"));
}

#[tokio::test]
async fn test_sort_hidden_when_disabled() {
    let config = WebConfig {
        features: FeatureFlags {
            show_sort: false,
            ..FeatureFlags::default()
        },
        ..WebConfig::default()
    };
    let ctx = TestContext::with_config(config, users(6)).await;

    let page = ctx.get_page("/").await;
    assert!(!page.contains("Sort by availability"));

    let response = ctx.post_form("/sort", &[("sort", "true")]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
