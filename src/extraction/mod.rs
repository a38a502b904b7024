//! Content extraction module
//!
//! Pure pieces of the pipeline: selector policy, markup location, redirect
//! resolution and representative image selection.

pub mod image_policy;
pub mod locator;
pub mod redirect;
pub mod selectors;
pub mod video;

pub use image_policy::choose_image;
pub use locator::{LocatedContent, MarkupLocator};
pub use redirect::RedirectResolver;
pub use selectors::LinkCandidate;

/// What one tier found in a post, with the link already resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostContent {
    /// Post text
    pub text: Option<String>,
    /// Resolved outbound link
    pub link: Option<String>,
    /// Post image URL, before image policy
    pub image: Option<String>,
}

impl PostContent {
    /// Whether the tier found usable text
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

impl LocatedContent {
    /// Resolve the link candidate through `resolver`
    pub async fn resolve(self, resolver: &RedirectResolver) -> PostContent {
        let link = match self.link {
            Some(candidate) => Some(resolver.resolve(candidate.url()).await),
            None => None,
        };

        PostContent {
            text: self.text,
            link,
            image: self.image,
        }
    }
}
