//! Reddit integration.
//!
//! This module provides the [`Forum`] capability the bot loop is written
//! against, and [`RedditClient`], its implementation over the Reddit OAuth
//! API.
//!
//! Streams behave like "skip existing" streams: the first poll of a
//! subreddit's comments (or submissions) only records what is already there,
//! later polls return the items that appeared since, oldest first.

mod types;

use crate::error::{BelcherError, Result};
use crate::types::{CandidateItem, ImageSubmission, ItemKind};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;
use types::{CommentResponse, Listing, ListingItem, TokenResponse};

pub const DEFAULT_AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";

const LISTING_PAGE_SIZE: usize = 100;
/// Reddit stops paginating listings after this many items.
const MAX_LISTING_ITEMS: usize = 1000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Ids remembered per stream; three listing pages.
const SEEN_CAPACITY: usize = 3 * LISTING_PAGE_SIZE;

/// The forum operations the bot needs.
#[allow(async_fn_in_trait)]
pub trait Forum {
    /// Obtain (or refresh) a session.
    async fn login(&mut self) -> Result<()>;

    /// New items of `kind` in `subreddit` since the previous poll, oldest first.
    async fn poll(&mut self, subreddit: &str, kind: ItemKind) -> Result<Vec<CandidateItem>>;

    /// Reply to `item` with markdown `text`.
    async fn post_reply(&self, item: &CandidateItem, text: &str) -> Result<()>;

    /// Recent submissions of an image subreddit.
    async fn image_submissions(&self, subreddit: &str) -> Result<Vec<ImageSubmission>>;
}

/// Account and application credentials for the password grant.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

/// Most recently seen ids, oldest evicted first past [`SEEN_CAPACITY`].
#[derive(Debug, Default)]
struct SeenIds {
    ids: HashSet<String>,
    order: VecDeque<String>,
}

impl SeenIds {
    /// Record `id`; returns false if it was already known.
    fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string());
        self.order.push_back(id.to_string());
        while self.order.len() > SEEN_CAPACITY {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        true
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

#[derive(Debug, Default)]
struct StreamState {
    primed: bool,
    seen: SeenIds,
}

/// HTTP client for the Reddit API.
#[derive(Debug)]
pub struct RedditClient {
    http: reqwest::Client,
    credentials: Credentials,
    auth_url: String,
    api_base: String,
    access_token: Option<String>,
    streams: HashMap<(String, ItemKind), StreamState>,
}

fn transport_error(e: reqwest::Error) -> BelcherError {
    BelcherError::ForumRequest(e.to_string())
}

/// Map a non-success status onto the retry tiers.
fn status_error(status: StatusCode, context: &str) -> BelcherError {
    if status.is_server_error() {
        BelcherError::ForumServer(format!("{} returned {}", context, status))
    } else {
        BelcherError::ForumResponse(format!("{} returned {}", context, status))
    }
}

impl RedditClient {
    /// Build a client against the public Reddit endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the user agent is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(credentials: Credentials, user_agent: &str) -> Result<Self> {
        Self::with_endpoints(credentials, user_agent, DEFAULT_AUTH_URL, DEFAULT_API_BASE)
    }

    /// Build a client against custom token and API endpoints.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Application and account credentials
    /// * `user_agent` - Sent with every request; Reddit throttles generic agents
    /// * `auth_url` - Full URL of the access token endpoint
    /// * `api_base` - Root of the OAuth API
    pub fn with_endpoints(
        credentials: Credentials,
        user_agent: &str,
        auth_url: &str,
        api_base: &str,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| BelcherError::Config(format!("Invalid user agent: {}", e)))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BelcherError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            credentials,
            auth_url: auth_url.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token: None,
            streams: HashMap::new(),
        })
    }

    fn token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .ok_or_else(|| BelcherError::Auth("Not logged in".to_string()))
    }

    /// Authenticated GET returning a decoded body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.api_base, path);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(self.token()?)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        if !resp.status().is_success() {
            return Err(status_error(resp.status(), path));
        }

        resp.json::<T>()
            .await
            .map_err(|e| BelcherError::ForumResponse(format!("Invalid response from {}: {}", path, e)))
    }

    /// One page of a listing, newest first.
    async fn listing_page(
        &self,
        path: &str,
        after: Option<&str>,
    ) -> Result<(Vec<ListingItem>, Option<String>)> {
        let limit = LISTING_PAGE_SIZE.to_string();
        let mut query = vec![("limit", limit.as_str()), ("raw_json", "1")];
        if let Some(after) = after {
            query.push(("after", after));
        }
        let listing: Listing<ListingItem> = self.get_json(path, &query).await?;
        let items = listing.data.children.into_iter().map(|thing| thing.data).collect();
        Ok((items, listing.data.after))
    }
}

fn listing_path(subreddit: &str, kind: ItemKind) -> String {
    match kind {
        ItemKind::Comment => format!("/r/{}/comments", subreddit),
        ItemKind::Submission => format!("/r/{}/new", subreddit),
    }
}

impl Forum for RedditClient {
    async fn login(&mut self) -> Result<()> {
        let form = [
            ("grant_type", "password"),
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
        ];
        let resp = self
            .http
            .post(&self.auth_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BelcherError::Auth(format!("Token request refused: {}", status)));
        }
        if !status.is_success() {
            return Err(status_error(status, "Token request"));
        }

        let token = resp
            .json::<TokenResponse>()
            .await
            .map_err(|e| BelcherError::ForumResponse(format!("Invalid token response: {}", e)))?;

        match (token.access_token, token.error) {
            (Some(access_token), None) => {
                self.access_token = Some(access_token);
                tracing::info!(user = %self.credentials.username, "Logged in to Reddit");
                Ok(())
            }
            (_, Some(error)) => Err(BelcherError::Auth(format!("Token request refused: {}", error))),
            (None, None) => Err(BelcherError::Auth("Token response carried no token".to_string())),
        }
    }

    async fn poll(&mut self, subreddit: &str, kind: ItemKind) -> Result<Vec<CandidateItem>> {
        let (page, _) = self.listing_page(&listing_path(subreddit, kind), None).await?;
        let stream = self.streams.entry((subreddit.to_string(), kind)).or_default();

        if !stream.primed {
            for item in page.iter().rev() {
                stream.seen.insert(&item.id);
            }
            stream.primed = true;
            tracing::debug!(subreddit, %kind, seen = stream.seen.len(), "Stream primed, skipping existing items");
            return Ok(Vec::new());
        }

        let mut fresh = Vec::new();
        for item in page.into_iter().rev() {
            if !stream.seen.insert(&item.id) {
                continue;
            }
            match item.into_candidate(kind) {
                Some(candidate) => fresh.push(candidate),
                None => {
                    tracing::debug!(subreddit, %kind, "Deleted item, ending batch");
                    break;
                }
            }
        }
        Ok(fresh)
    }

    async fn post_reply(&self, item: &CandidateItem, text: &str) -> Result<()> {
        let url = format!("{}/api/comment", self.api_base);
        let form = [
            ("api_type", "json"),
            ("thing_id", item.fullname.as_str()),
            ("text", text),
        ];
        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.token()?)
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;

        if !resp.status().is_success() {
            return Err(status_error(resp.status(), "Reply"));
        }

        let body = resp
            .json::<CommentResponse>()
            .await
            .map_err(|e| BelcherError::ForumResponse(format!("Invalid reply response: {}", e)))?;
        if !body.json.errors.is_empty() {
            return Err(BelcherError::ForumApi(format!(
                "Reply to {} rejected: {:?}",
                item.fullname, body.json.errors
            )));
        }

        tracing::info!(kind = %item.kind, id = %item.id, "Reply posted");
        Ok(())
    }

    async fn image_submissions(&self, subreddit: &str) -> Result<Vec<ImageSubmission>> {
        let path = listing_path(subreddit, ItemKind::Submission);
        let mut submissions = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let (page, next) = self.listing_page(&path, after.as_deref()).await?;
            let page_len = page.len();
            submissions.extend(page.into_iter().filter_map(ListingItem::into_image_submission));

            match next {
                Some(cursor) if page_len > 0 && submissions.len() < MAX_LISTING_ITEMS => after = Some(cursor),
                _ => break,
            }
        }

        submissions.truncate(MAX_LISTING_ITEMS);
        tracing::debug!(subreddit, count = submissions.len(), "Fetched image submissions");
        Ok(submissions)
    }
}
