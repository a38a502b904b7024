//! Markup content locator
//!
//! Finds post text, the outbound link candidate, and the first qualifying
//! image in a static HTML document.

use super::selectors::{
    is_qualifying_image, join_fragments, LinkCandidate, LinkScan, IMAGE_SELECTORS,
    LINK_SELECTORS, TEXT_SELECTORS,
};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

/// Raw locator output; the link is not yet resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatedContent {
    /// Post text
    pub text: Option<String>,
    /// Outbound link candidate
    pub link: Option<LinkCandidate>,
    /// Post image URL
    pub image: Option<String>,
}

/// Locator over parsed documents
pub struct MarkupLocator<'a> {
    short_link_hosts: &'a [String],
}

impl<'a> MarkupLocator<'a> {
    /// Create a locator treating `short_link_hosts` as short-link domains
    pub fn new(short_link_hosts: &'a [String]) -> Self {
        Self { short_link_hosts }
    }

    /// Parse `html` and locate text, link and image.
    ///
    /// Synchronous: `Html` is not `Send`, so the parsed tree must not live across an
    /// await point.
    pub fn locate(&self, html: &str) -> LocatedContent {
        let document = Html::parse_document(html);
        self.locate_in(&document)
    }

    /// Locate text, link and image in an already parsed document
    pub fn locate_in(&self, document: &Html) -> LocatedContent {
        let located = LocatedContent {
            text: locate_text(document),
            link: self.locate_link(document),
            image: locate_image(document),
        };

        debug!(
            has_text = located.text.is_some(),
            has_link = located.link.is_some(),
            has_image = located.image.is_some(),
            "Located markup content"
        );

        located
    }

    fn locate_link(&self, document: &Html) -> Option<LinkCandidate> {
        let mut scan = LinkScan::default();

        for selector in parsed(LINK_SELECTORS) {
            for anchor in document.select(&selector) {
                let Some(href) = anchor.value().attr("href") else {
                    continue;
                };
                if let Some(short) = scan.push(href, self.short_link_hosts) {
                    return Some(short);
                }
            }
        }

        scan.finish()
    }
}

fn locate_text(document: &Html) -> Option<String> {
    for selector in parsed(TEXT_SELECTORS) {
        let fragments: Vec<String> = document.select(&selector).map(element_text).collect();
        if fragments.is_empty() {
            continue;
        }
        if let Some(text) = join_fragments(&fragments) {
            return Some(text);
        }
    }
    None
}

fn locate_image(document: &Html) -> Option<String> {
    for selector in parsed(IMAGE_SELECTORS) {
        for img in document.select(&selector) {
            let attrs = img.value();
            let Some(src) = attrs.attr("src") else {
                continue;
            };
            if is_qualifying_image(src, attrs.attr("width"), attrs.attr("height")) {
                return Some(src.to_string());
            }
        }
    }
    None
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

fn parsed(selectors: &'static [&'static str]) -> impl Iterator<Item = Selector> {
    selectors.iter().filter_map(|s| match Selector::parse(s) {
        Ok(selector) => Some(selector),
        Err(e) => {
            trace!("Skipping unparsable selector {}: {:?}", s, e);
            None
        }
    })
}
