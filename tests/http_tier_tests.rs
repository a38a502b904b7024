//! Lightweight tier and redirect resolution against a local mock server

use httpmock::prelude::*;
use httpmock::Method::HEAD;
use linkedin_post_extractor::{ContentTier, ExtractorConfig, HttpTier};
use pretty_assertions::assert_eq;

fn local_config() -> ExtractorConfig {
    ExtractorConfig::builder()
        .fetch_timeout_ms(2000)
        .redirect_timeout_ms(2000)
        .build()
}

/// Treats the mock server itself as a short-link host
fn short_link_config(server: &MockServer) -> ExtractorConfig {
    ExtractorConfig::builder()
        .short_link_hosts([server.host()])
        .fetch_timeout_ms(2000)
        .redirect_timeout_ms(2000)
        .build()
}

fn wrap(target: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("https://www.linkedin.com/redir/redirect?url={encoded}&urlhash=Xy")
}

#[tokio::test]
async fn test_tier_extracts_text_link_and_image() {
    let server = MockServer::start_async().await;
    let landing = server.url("/article");
    server
        .mock_async(|when, then| {
            when.method(GET).path("/posts/release");
            then.status(200).header("content-type", "text/html").body(format!(
                r#"<html><body>
                  <div data-test-id="main-feed-activity-card">
                    <p class="feed-shared-text">Release notes for the new version are out now</p>
                    <a href="{landing}">read more</a>
                    <div class="feed-shared-image">
                      <img src="https://media.licdn.com/dms/image/feedshare-shrink_800/r.png" width="800" height="400">
                    </div>
                  </div>
                </body></html>"#
            ));
        })
        .await;

    let tier = HttpTier::new(&local_config()).unwrap();
    let content = tier.fetch(&server.url("/posts/release")).await.unwrap();

    assert_eq!(
        content.text.as_deref(),
        Some("Release notes for the new version are out now")
    );
    assert_eq!(content.link.as_deref(), Some(landing.as_str()));
    assert_eq!(
        content.image.as_deref(),
        Some("https://media.licdn.com/dms/image/feedshare-shrink_800/r.png")
    );
}

#[tokio::test]
async fn test_page_without_text_is_empty_content() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/posts/wall");
            then.status(200).body("<html><body><h1>Sign in</h1></body></html>");
        })
        .await;

    let tier = HttpTier::new(&local_config()).unwrap();
    let content = tier.fetch(&server.url("/posts/wall")).await.unwrap();
    assert!(!content.has_text());
    assert_eq!(content.link, None);
}

#[tokio::test]
async fn test_head_redirect_followed() {
    let server = MockServer::start_async().await;
    let final_url = server.url("/final");
    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/old");
            then.status(302).header("location", &final_url);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/final");
            then.status(200);
        })
        .await;

    let tier = HttpTier::new(&local_config()).unwrap();
    let resolved = tier.resolver().resolve(&server.url("/old")).await;
    assert_eq!(resolved, final_url);
}

#[tokio::test]
async fn test_head_not_allowed_falls_back_to_get() {
    let server = MockServer::start_async().await;
    let landing = server.url("/landing");
    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/strict");
            then.status(405);
        })
        .await;
    let get_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/strict");
            then.status(301).header("location", &landing);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.path("/landing");
            then.status(200).body("landed");
        })
        .await;

    let tier = HttpTier::new(&local_config()).unwrap();
    let resolved = tier.resolver().resolve(&server.url("/strict")).await;

    get_mock.assert_async().await;
    assert_eq!(resolved, landing);
}

#[tokio::test]
async fn test_unresolvable_link_returned_unchanged() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.path("/plain");
            then.status(200);
        })
        .await;

    let tier = HttpTier::new(&local_config()).unwrap();
    let plain = server.url("/plain");
    assert_eq!(tier.resolver().resolve(&plain).await, plain);
}

#[tokio::test]
async fn test_wrapper_then_redirect() {
    let server = MockServer::start_async().await;
    let final_url = server.url("/story");
    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/go");
            then.status(302).header("location", &final_url);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.path("/story");
            then.status(200);
        })
        .await;

    let tier = HttpTier::new(&local_config()).unwrap();
    let resolved = tier.resolver().resolve(&wrap(&server.url("/go"))).await;
    assert_eq!(resolved, final_url);
}

#[tokio::test]
async fn test_short_link_without_video_is_kept() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/sNoVideo");
            then.status(200).body("<html><body>Just an article</body></html>");
        })
        .await;

    let tier = HttpTier::new(&short_link_config(&server)).unwrap();
    let short = server.url("/sNoVideo");
    assert_eq!(tier.resolver().resolve(&short).await, short);
}

#[tokio::test]
async fn test_short_link_failure_is_kept() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/sBroken");
            then.status(500);
        })
        .await;

    let tier = HttpTier::new(&short_link_config(&server)).unwrap();
    let short = server.url("/sBroken");
    assert_eq!(tier.resolver().resolve(&short).await, short);
}
