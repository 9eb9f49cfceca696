//! Filler link pool.
//!
//! Joke images submitted by the community stand in for cards that have no
//! image of their own. The pool is refreshed periodically from the image
//! subreddits; readers take a snapshot so a refresh never changes the list
//! under a reply that is being composed.

use crate::replies::FALLBACK_FILLER_LINK;
use crate::types::ImageSubmission;
use regex::Regex;
use std::sync::{Arc, LazyLock, RwLock};

static IMAGE_HOSTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(i\.redd\.it|i\.imgur\.com)").expect("valid image host pattern"));

/// Shared, copy-on-read list of filler image links.
#[derive(Debug, Clone)]
pub struct FillerLinkPool {
    links: Arc<RwLock<Arc<[String]>>>,
}

impl Default for FillerLinkPool {
    fn default() -> Self {
        Self::new()
    }
}

impl FillerLinkPool {
    /// A pool holding only the fallback link.
    pub fn new() -> Self {
        Self::from_links(vec![FALLBACK_FILLER_LINK.to_string()])
    }

    pub fn from_links(links: Vec<String>) -> Self {
        Self {
            links: Arc::new(RwLock::new(links.into())),
        }
    }

    /// The current list. Later replacements do not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<[String]> {
        let guard = self.links.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in a new list. An empty list is ignored.
    pub fn replace(&self, links: Vec<String>) {
        if links.is_empty() {
            tracing::warn!("Refusing to replace the filler pool with an empty list");
            return;
        }
        let mut guard = self.links.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = links.into();
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pick the usable image links out of a subreddit's submissions.
///
/// A submission qualifies when its URL is hosted on a known image host, does
/// not point back at `subreddit` itself, and it carries `approved_flair`. The
/// fallback link always comes first.
pub fn select_image_links(
    subreddit: &str,
    submissions: &[ImageSubmission],
    approved_flair: &str,
) -> Vec<String> {
    let mut links = vec![FALLBACK_FILLER_LINK.to_string()];
    links.extend(
        submissions
            .iter()
            .filter(|s| !s.url.contains(subreddit))
            .filter(|s| IMAGE_HOSTS.is_match(&s.url))
            .filter(|s| s.link_flair_text.as_deref() == Some(approved_flair))
            .map(|s| s.url.clone()),
    );
    links
}
