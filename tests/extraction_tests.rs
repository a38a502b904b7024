//! Extraction integration tests
//!
//! Classifier, markup locator and image policy through the public API, on
//! realistic post markup.

use linkedin_post_extractor::extraction::selectors::join_fragments;
use linkedin_post_extractor::extraction::{choose_image, LinkCandidate, MarkupLocator};
use linkedin_post_extractor::is_valid_post_url;
use pretty_assertions::assert_eq;

const POST_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head><title>Jane Doe on LinkedIn</title></head>
<body>
  <nav>
    <a href="https://www.linkedin.com/feed/">Home</a>
    <a href="https://www.linkedin.com/in/jane-doe">Jane Doe</a>
    <img src="https://media.licdn.com/dms/image/profile-displayphoto-shrink_100/jane.jpg" width="48" height="48">
  </nav>
  <main>
    <div data-test-id="main-feed-activity-card">
      <p class="feed-shared-text">
        We just shipped a new release of our parser.
        Read the write-up here: <a href="https://www.linkedin.com/redir/redirect?url=https%3A%2F%2Fblog.example.com%2Frelease">blog</a>
      </p>
      <p class="feed-shared-text">Like</p>
      <div class="feed-shared-image">
        <img src="https://static.licdn.com/sc/icon-like.svg">
        <img src="https://media.licdn.com/dms/image/feedshare-shrink_800/release.png" width="800" height="450">
      </div>
    </div>
  </main>
</body>
</html>
"#;

fn hosts() -> Vec<String> {
    vec!["lnkd.in".to_string()]
}

#[test]
fn test_classifier_examples() {
    assert!(is_valid_post_url(
        "https://www.linkedin.com/posts/john-doe_activity-123-abcd"
    ));
    assert!(is_valid_post_url(
        "https://www.linkedin.com/pulse/some-article-jane-doe"
    ));
    assert!(!is_valid_post_url("https://www.linkedin.com/in/someone"));
    assert!(!is_valid_post_url("https://twitter.com/user/status/123"));
    assert!(!is_valid_post_url("not-a-url"));
    assert!(!is_valid_post_url(""));
}

#[test]
fn test_locate_realistic_post() {
    let located = MarkupLocator::new(&hosts()).locate(POST_PAGE);

    assert_eq!(
        located.text.as_deref(),
        Some("We just shipped a new release of our parser. Read the write-up here: blog")
    );
    assert_eq!(
        located.link,
        Some(LinkCandidate::External(
            "https://www.linkedin.com/redir/redirect?url=https%3A%2F%2Fblog.example.com%2Frelease"
                .to_string()
        ))
    );
    assert_eq!(
        located.image.as_deref(),
        Some("https://media.licdn.com/dms/image/feedshare-shrink_800/release.png")
    );
}

#[test]
fn test_short_link_anywhere_wins() {
    let page = POST_PAGE.replace(
        "</main>",
        r#"<aside><a href="https://lnkd.in/eXyZ123">lnkd.in/eXyZ123</a></aside></main>"#,
    );
    let located = MarkupLocator::new(&hosts()).locate(&page);
    assert_eq!(
        located.link,
        Some(LinkCandidate::ShortLink("https://lnkd.in/eXyZ123".to_string()))
    );
}

#[test]
fn test_fragment_filtering() {
    assert_eq!(
        join_fragments(["Hi", "This is a longer fragment of text"]).as_deref(),
        Some("This is a longer fragment of text")
    );
    assert_eq!(
        join_fragments(["  spaced   out\n\tfragment  text ", "0123456789"]).as_deref(),
        Some("spaced out fragment text")
    );
    assert_eq!(join_fragments(["short", "labels"]), None);
}

#[test]
fn test_image_policy() {
    assert_eq!(
        choose_image(
            Some("https://www.youtube.com/watch?v=abc12345678"),
            Some("https://media.licdn.com/feedshare/anything.jpg")
        )
        .as_deref(),
        Some("https://img.youtube.com/vi/abc12345678/maxresdefault.jpg")
    );
    assert_eq!(
        choose_image(
            None,
            Some("https://media.licdn.com/dms/image/profile-displayphoto-shrink_400/x.jpg")
        ),
        None
    );
    assert_eq!(
        choose_image(Some("https://blog.example.com"), Some("https://cdn.example.com/hero.jpg"))
            .as_deref(),
        Some("https://cdn.example.com/hero.jpg")
    );
}
