//! Type definitions shared between the forum adapter and the bot loop.

use std::fmt;

/// Which kind of forum item a candidate is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A reply inside a thread.
    Comment,
    /// A top-level post.
    Submission,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment => write!(f, "comment"),
            Self::Submission => write!(f, "submission"),
        }
    }
}

/// A forum item the bot may reply to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    /// Short id, e.g. `mlnqxci`
    pub id: String,
    /// Type-prefixed id used when replying, e.g. `t1_mlnqxci`
    pub fullname: String,
    pub kind: ItemKind,
    pub author: String,
    /// Comment body or submission self text
    pub body: String,
    /// The submission's own title, or the parent submission's title for comments
    pub thread_title: String,
    pub permalink: String,
}

/// A post from an image subreddit, candidate for the filler pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSubmission {
    pub url: String,
    pub link_flair_text: Option<String>,
}
