//! Eligibility filter.
//!
//! Decides whether a forum item gets a reply at all. Checks run in order and
//! the first failing one wins:
//!
//! 1. the author is the bot itself or a known peer bot;
//! 2. the item called no cards;
//! 3. the thread title matches an exclusion pattern (recurring meta threads,
//!    plus low-score roundups for top-level posts).

use crate::error::Result;
use crate::types::{CandidateItem, ItemKind};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

/// Weekly unjerk threads.
pub const META_THREAD_PATTERN: &str = r".*unjerk.*thread.*";
/// Bottom scoring submission roundups.
pub const LOW_SCORE_ROUNDUP_PATTERN: &str = r".*bottom.*scoring.*";

/// Reply eligibility rules.
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    ignored_authors: HashSet<String>,
    submission_exclusions: Vec<Regex>,
    comment_exclusions: Vec<Regex>,
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(Into::into)
        })
        .collect()
}

impl EligibilityFilter {
    /// Filter with the default exclusion patterns.
    ///
    /// # Errors
    ///
    /// Only fails if a built-in pattern does not compile.
    pub fn new(ignored_authors: &[String]) -> Result<Self> {
        Self::with_patterns(
            ignored_authors,
            &[META_THREAD_PATTERN, LOW_SCORE_ROUNDUP_PATTERN],
            &[META_THREAD_PATTERN],
        )
    }

    /// Filter with custom exclusion patterns, matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a pattern does not compile.
    pub fn with_patterns(
        ignored_authors: &[String],
        submission_patterns: &[&str],
        comment_patterns: &[&str],
    ) -> Result<Self> {
        Ok(Self {
            ignored_authors: ignored_authors.iter().map(|a| a.to_lowercase()).collect(),
            submission_exclusions: compile(submission_patterns)?,
            comment_exclusions: compile(comment_patterns)?,
        })
    }

    fn is_ignored_author(&self, author: &str) -> bool {
        self.ignored_authors.contains(&author.to_lowercase())
    }

    fn is_excluded_thread(&self, item: &CandidateItem) -> bool {
        let patterns = match item.kind {
            ItemKind::Submission => &self.submission_exclusions,
            ItemKind::Comment => &self.comment_exclusions,
        };
        patterns.iter().any(|re| re.is_match(&item.thread_title))
    }

    /// Whether `item` should be replied to, given the tokens already extracted from it.
    pub fn requires_action(&self, item: &CandidateItem, tokens: &[String]) -> bool {
        if self.is_ignored_author(&item.author) {
            tracing::info!(kind = %item.kind, id = %item.id, author = %item.author, "Bot will not reply to itself or to a peer bot");
            return false;
        }

        if tokens.is_empty() {
            tracing::debug!(kind = %item.kind, id = %item.id, "No matches");
            return false;
        }

        if self.is_excluded_thread(item) {
            tracing::info!(kind = %item.kind, id = %item.id, title = %item.thread_title, "Thread on exclusion list");
            return false;
        }

        tracing::info!(kind = %item.kind, id = %item.id, tokens = ?tokens, permalink = %item.permalink, "Should reply to eligible item");
        true
    }
}
