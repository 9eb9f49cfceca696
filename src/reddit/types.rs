//! Wire types for the Reddit API.

use crate::types::{CandidateItem, ImageSubmission, ItemKind};
use serde::Deserialize;

/// Placeholder Reddit puts in place of removed authors and bodies.
const DELETED_MARKERS: &[&str] = &["[deleted]", "[removed]"];

#[derive(Deserialize, Debug)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ListingData<T> {
    pub children: Vec<Thing<T>>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Thing<T> {
    pub data: T,
}

/// Common fields of comments and submissions in a listing.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct ListingItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub permalink: String,
    /// Comment text
    #[serde(default)]
    pub body: Option<String>,
    /// Parent submission title, on comments
    #[serde(default)]
    pub link_title: Option<String>,
    /// Submission self text
    #[serde(default)]
    pub selftext: Option<String>,
    /// Submission title
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub link_flair_text: Option<String>,
}

fn is_present(field: &Option<String>) -> bool {
    field
        .as_deref()
        .is_some_and(|value| !DELETED_MARKERS.contains(&value))
}

impl ListingItem {
    /// Convert into a candidate, or `None` if the author or text is gone.
    pub fn into_candidate(self, kind: ItemKind) -> Option<CandidateItem> {
        let (text, title) = match kind {
            ItemKind::Comment => (self.body, self.link_title),
            ItemKind::Submission => (self.selftext, self.title),
        };
        if !is_present(&self.author) {
            return None;
        }
        // Link posts have an empty self text; only a deleted one ends the batch.
        if kind == ItemKind::Comment && !is_present(&text) {
            return None;
        }
        if text.as_deref().is_some_and(|t| DELETED_MARKERS.contains(&t)) {
            return None;
        }
        Some(CandidateItem {
            id: self.id,
            fullname: self.name,
            kind,
            author: self.author.unwrap_or_default(),
            body: text.unwrap_or_default(),
            thread_title: title.unwrap_or_default(),
            permalink: self.permalink,
        })
    }

    pub fn into_image_submission(self) -> Option<ImageSubmission> {
        Some(ImageSubmission {
            url: self.url?,
            link_flair_text: self.link_flair_text,
        })
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct CommentResponse {
    pub json: CommentResponseBody,
}

#[derive(Deserialize, Debug)]
pub(crate) struct CommentResponseBody {
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}
