//! Representative image selection
//!
//! Precedence: video thumbnail for a YouTube link, then the post image when
//! it is real post media, then nothing.

use super::video;
use tracing::debug;

/// Image URL fragments marking profile imagery rather than article media
const NON_ARTICLE_IMAGE_PATTERNS: &[&str] = &[
    "profile-displaybackgroundimage",
    "profile-displayphoto",
    "/profile/",
    "headshot",
];

/// Derive the representative image for a post.
pub fn choose_image(link: Option<&str>, post_image: Option<&str>) -> Option<String> {
    if let Some(video_id) = link.and_then(video::video_id_from_link) {
        return Some(video::thumbnail_url(&video_id));
    }

    let image = post_image?;
    if NON_ARTICLE_IMAGE_PATTERNS.iter().any(|p| image.contains(p)) {
        debug!("Filtering out non-article image: {}", image);
        return None;
    }

    Some(image.to_string())
}
