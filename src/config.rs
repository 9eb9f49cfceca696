//! Configuration management for CardBelcher.
//!
//! This module handles loading and validating environment variables and application settings.

use crate::error::{BelcherError, Result};
use crate::utils::validation::{validate_subreddit_name, validate_username};
use std::env;
use std::ops::RangeInclusive;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "MTGCardBelcher/1.2.0";
const DEFAULT_TARGET_SUBREDDITS: &str = "magicthecirclejerking,MTGCardBelcher_dev";
const DEFAULT_IMAGE_SUBREDDITS: &str = "MTGCardBelcher";
const DEFAULT_APPROVED_FLAIR: &str = "Approved Submission";
const DEFAULT_IGNORED_AUTHORS: &str = "MTGCardBelcher,MTGCardFetcher";
const DEFAULT_CATALOG_BASE_URL: &str = "https://api.scryfall.com";

/// Configuration for the application, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth application id
    pub client_id: String,
    /// OAuth application secret
    pub client_secret: String,
    /// Bot account name
    pub username: String,
    /// Bot account password
    pub password: String,
    /// User agent sent to the forum and the card catalog
    pub user_agent: String,
    /// Subreddits whose comments and submissions are answered
    pub target_subreddits: Vec<String>,
    /// Subreddits the filler image pool is drawn from
    pub image_subreddits: Vec<String>,
    /// Flair an image submission needs to enter the pool
    pub approved_flair: String,
    /// Authors that never get a reply (the bot itself, peer bots)
    pub ignored_authors: Vec<String>,
    /// Base URL of the card catalog API
    pub catalog_base_url: String,
    /// Request timeout for card catalog calls
    pub catalog_timeout: Duration,
    /// Path to SQLite database file holding the collectible counters
    pub db_path: String,
    /// How often the filler image pool is rebuilt
    pub image_refresh_interval: Duration,
    /// Pause between polling rounds
    pub poll_interval: Duration,
    /// Login attempts before giving up at startup
    pub login_attempts: u32,
    /// Bounds, in seconds, of the random collectible cooldown
    pub collectible_cooldown_secs: RangeInclusive<u64>,
    /// Optional directory for daily-rotated log files
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This will attempt to load a .env file if present using dotenv,
    /// then read required environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required environment variable is missing or invalid.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cardbelcher::config::Config;
    ///
    /// let config = Config::from_env().expect("Failed to load configuration");
    /// println!("Watching: {:?}", config.target_subreddits);
    /// ```
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (ignore errors - it's optional)
        dotenv::dotenv().ok();

        let client_id = Self::required("REDDIT_CLIENT_ID")?;
        let client_secret = Self::required("REDDIT_CLIENT_SECRET")?;
        let username = Self::required("REDDIT_USERNAME")?;
        validate_username(&username).map_err(|e| BelcherError::Config(format!("REDDIT_USERNAME: {}", e)))?;
        let password = Self::required("REDDIT_PASSWORD")?;

        let user_agent = env::var("REDDIT_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        let target_subreddits = Self::subreddit_list("TARGET_SUBREDDITS", DEFAULT_TARGET_SUBREDDITS)?;
        let image_subreddits = Self::subreddit_list("IMAGE_SUBREDDITS", DEFAULT_IMAGE_SUBREDDITS)?;

        let approved_flair = env::var("APPROVED_FLAIR").unwrap_or_else(|_| DEFAULT_APPROVED_FLAIR.to_string());

        let ignored_authors = Self::parse_list(
            &env::var("IGNORED_AUTHORS").unwrap_or_else(|_| DEFAULT_IGNORED_AUTHORS.to_string()),
        );
        for author in &ignored_authors {
            validate_username(author).map_err(|e| BelcherError::Config(format!("IGNORED_AUTHORS: {}", e)))?;
        }

        let catalog_base_url = env::var("CATALOG_BASE_URL").unwrap_or_else(|_| DEFAULT_CATALOG_BASE_URL.to_string());
        Self::validate_base_url("CATALOG_BASE_URL", &catalog_base_url)?;

        let catalog_timeout = Duration::from_secs(Self::positive("CATALOG_TIMEOUT_SECS", 10)?);
        let db_path = Self::get_db_path()?;
        let image_refresh_interval = Duration::from_secs(Self::positive("IMAGE_REFRESH_SECS", 1800)?);
        let poll_interval = Duration::from_secs(Self::positive("POLL_INTERVAL_SECS", 5)?);

        let login_attempts = u32::try_from(Self::positive("LOGIN_ATTEMPTS", 20)?)
            .map_err(|_| BelcherError::Config("LOGIN_ATTEMPTS is too large".to_string()))?;

        let cooldown_min = Self::positive("COLLECTIBLE_COOLDOWN_MIN_SECS", 300)?;
        let cooldown_max = Self::positive("COLLECTIBLE_COOLDOWN_MAX_SECS", 7200)?;
        if cooldown_min > cooldown_max {
            return Err(BelcherError::Config(format!(
                "COLLECTIBLE_COOLDOWN_MIN_SECS ({}) must not exceed COLLECTIBLE_COOLDOWN_MAX_SECS ({})",
                cooldown_min, cooldown_max
            )));
        }

        let log_dir = env::var("LOG_DIR").ok().filter(|dir| !dir.trim().is_empty());

        Ok(Self {
            client_id,
            client_secret,
            username,
            password,
            user_agent,
            target_subreddits,
            image_subreddits,
            approved_flair,
            ignored_authors,
            catalog_base_url,
            catalog_timeout,
            db_path,
            image_refresh_interval,
            poll_interval,
            login_attempts,
            collectible_cooldown_secs: cooldown_min..=cooldown_max,
            log_dir,
        })
    }

    fn required(name: &str) -> Result<String> {
        env::var(name).map_err(|_| BelcherError::Config(format!(
            "Missing {} environment variable. Set it in your environment or create a .env file (never commit this file).",
            name
        )))
    }

    /// Split a comma separated list, dropping blanks.
    fn parse_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn subreddit_list(name: &str, default: &str) -> Result<Vec<String>> {
        let list = Self::parse_list(&env::var(name).unwrap_or_else(|_| default.to_string()));
        if list.is_empty() {
            return Err(BelcherError::Config(format!("{} must name at least one subreddit", name)));
        }
        for subreddit in &list {
            validate_subreddit_name(subreddit).map_err(|e| BelcherError::Config(format!("{}: {}", name, e)))?;
        }
        Ok(list)
    }

    /// Read a positive integer, falling back to `default` when unset.
    fn positive(name: &str, default: u64) -> Result<u64> {
        match env::var(name) {
            Ok(raw) => Self::parse_positive(name, &raw),
            Err(_) => Ok(default),
        }
    }

    fn parse_positive(name: &str, raw: &str) -> Result<u64> {
        let value = raw.trim().parse::<u64>().map_err(|_| BelcherError::Config(
            format!("Invalid {}: '{}' is not a number", name, raw)
        ))?;
        if value == 0 {
            return Err(BelcherError::Config(format!("{} must be greater than zero", name)));
        }
        Ok(value)
    }

    /// Get the database path from environment or use default.
    fn get_db_path() -> Result<String> {
        match env::var("DB_PATH") {
            Ok(path) => Ok(path),
            Err(_) => {
                let mut path = env::current_dir()
                    .map_err(|e| BelcherError::Config(
                        format!("Failed to determine current directory: {}", e)
                    ))?;

                path.push("data");
                path.push("cardbelcher.db");

                path.into_os_string()
                    .into_string()
                    .map_err(|os_str| BelcherError::Config(
                        format!("Database path contains invalid Unicode: {:?}", os_str)
                    ))
            }
        }
    }

    /// Validate a base URL format using proper URL parsing.
    fn validate_base_url(name: &str, url_str: &str) -> Result<()> {
        use url::Url;

        let parsed_url = Url::parse(url_str)
            .map_err(|e| BelcherError::Config(
                format!("Invalid {} '{}': {}", name, url_str, e)
            ))?;

        let scheme = parsed_url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(BelcherError::Config(
                format!("{} must use http:// or https:// scheme, got: '{}'", name, scheme)
            ));
        }

        if parsed_url.host_str().is_none() {
            return Err(BelcherError::Config(
                format!("{} must contain a valid host: '{}'", name, url_str)
            ));
        }

        Ok(())
    }
}
