//! The bot loop.
//!
//! Wires configuration, the forum, the card catalog, and the counter store
//! together and processes new items one at a time: extract the called cards,
//! check eligibility, compose, post, and follow a collectible's waiting
//! message with its art.

use crate::catalog::{CardCatalog, ScryfallClient};
use crate::compose::ReplyEngine;
use crate::config::Config;
use crate::counter::{self, CounterStore, SqliteCounterStore};
use crate::eligibility::EligibilityFilter;
use crate::error::{BelcherError, Result};
use crate::extract::extract;
use crate::images::{select_image_links, FillerLinkPool};
use crate::reddit::{Credentials, Forum, RedditClient};
use crate::timer::CooldownTimer;
use crate::types::{CandidateItem, ItemKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// Loop settings taken from [`Config`].
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub target_subreddits: Vec<String>,
    pub image_subreddits: Vec<String>,
    pub approved_flair: String,
    pub image_refresh_interval: Duration,
    pub poll_interval: Duration,
    pub login_attempts: u32,
}

impl BotSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            target_subreddits: config.target_subreddits.clone(),
            image_subreddits: config.image_subreddits.clone(),
            approved_flair: config.approved_flair.clone(),
            image_refresh_interval: config.image_refresh_interval,
            poll_interval: config.poll_interval,
            login_attempts: config.login_attempts,
        }
    }
}

/// Everything the loop owns.
pub struct Bot<F, C, S> {
    forum: F,
    engine: ReplyEngine<C>,
    counters: S,
    filter: EligibilityFilter,
    pool: FillerLinkPool,
    image_refresh: CooldownTimer,
    settings: BotSettings,
    rng: StdRng,
}

impl<F, C, S> Bot<F, C, S>
where
    F: Forum,
    C: CardCatalog,
    S: CounterStore,
{
    pub fn new(
        forum: F,
        engine: ReplyEngine<C>,
        counters: S,
        filter: EligibilityFilter,
        settings: BotSettings,
        rng: StdRng,
    ) -> Self {
        Self {
            forum,
            engine,
            counters,
            filter,
            pool: FillerLinkPool::new(),
            image_refresh: CooldownTimer::recurring(settings.image_refresh_interval),
            settings,
            rng,
        }
    }

    pub fn pool(&self) -> &FillerLinkPool {
        &self.pool
    }

    pub fn forum(&self) -> &F {
        &self.forum
    }

    /// Log in, retrying transient failures with their backoff.
    ///
    /// # Errors
    ///
    /// Returns the error at once if it is not retryable (bad credentials),
    /// or an [`BelcherError::Auth`] once the attempt budget is spent.
    pub async fn login_with_retries(&mut self) -> Result<()> {
        let attempts = self.settings.login_attempts.max(1);
        for attempt in 1..=attempts {
            match self.forum.login().await {
                Ok(()) => return Ok(()),
                Err(e) => match e.retry_delay() {
                    Some(delay) => {
                        tracing::warn!(attempt, attempts, error = %e, delay_secs = delay.as_secs(), "Login failed, retrying");
                        if attempt < attempts {
                            tokio::time::sleep(delay).await;
                        }
                    }
                    None => return Err(e),
                },
            }
        }
        Err(BelcherError::Auth(format!("Could not log in after {} attempts", attempts)))
    }

    /// Rebuild the filler pool if the refresh timer is due.
    ///
    /// A subreddit that fails to list is skipped; if none can be listed the
    /// previous pool stays in place.
    pub async fn refresh_images(&mut self) {
        if !self.image_refresh.fire() {
            return;
        }

        let mut links: Vec<String> = Vec::new();
        for subreddit in &self.settings.image_subreddits {
            match self.forum.image_submissions(subreddit).await {
                Ok(submissions) => {
                    for link in select_image_links(subreddit, &submissions, &self.settings.approved_flair) {
                        if !links.contains(&link) {
                            links.push(link);
                        }
                    }
                }
                Err(e) => tracing::warn!(subreddit = %subreddit, error = %e, "Could not fetch image submissions"),
            }
        }

        if links.is_empty() {
            tracing::warn!("No image subreddit could be listed, keeping previous filler pool");
            return;
        }
        tracing::info!(count = links.len(), "Filler pool refreshed");
        self.pool.replace(links);
    }

    /// Reply to a single item if it calls for it.
    ///
    /// # Errors
    ///
    /// Returns an error if posting fails. A failed collectible delivery is
    /// logged and leaves the collectible pending.
    pub async fn process_item(&mut self, item: &CandidateItem) -> Result<()> {
        let tokens = extract(&item.body);
        if !self.filter.requires_action(item, &tokens) {
            return Ok(());
        }

        let pending = self.engine.pending_collectible(&tokens);
        let links = self.pool.snapshot();
        let reply = self.engine.compose(&tokens, &links, &mut self.rng).await;
        self.forum.post_reply(item, &reply).await?;

        if let Some(collectible) = pending {
            match self
                .engine
                .deliver_collectible(collectible, &self.counters, &mut self.rng)
                .await
            {
                Ok(art) => self.forum.post_reply(item, &art).await?,
                Err(e) => tracing::error!(collectible = collectible.name(), error = %e, "Collectible delivery failed"),
            }
        }
        Ok(())
    }

    /// Process one polled batch to the end.
    ///
    /// Polled items are not handed out again, so a failing item never stops
    /// the rest of the batch. The first retryable error is returned once the
    /// batch is done.
    async fn process_stream(&mut self, subreddit: &str, kind: ItemKind) -> Result<()> {
        let items = self.forum.poll(subreddit, kind).await?;
        let mut retryable: Option<BelcherError> = None;
        for item in &items {
            if let Err(e) = self.process_item(item).await {
                tracing::error!(kind = %kind, id = %item.id, error = %e, "Skipping item");
                if e.is_retryable() && retryable.is_none() {
                    retryable = Some(e);
                }
            }
        }
        match retryable {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// One polling round over every target subreddit: comments, then submissions.
    ///
    /// # Errors
    ///
    /// Returns the first retryable forum error; the round stops there.
    pub async fn run_once(&mut self) -> Result<()> {
        self.refresh_images().await;
        let subreddits = self.settings.target_subreddits.clone();
        for subreddit in &subreddits {
            self.process_stream(subreddit, ItemKind::Comment).await?;
            self.process_stream(subreddit, ItemKind::Submission).await?;
        }
        Ok(())
    }

    /// Log in and poll until a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error only when logging in (initially or after a retryable
    /// failure) is impossible.
    pub async fn run_forever(&mut self) -> Result<()> {
        self.login_with_retries().await?;
        tracing::info!(subreddits = ?self.settings.target_subreddits, "Bot started");

        loop {
            if let Err(e) = self.run_once().await {
                match e.retry_delay() {
                    Some(delay) => {
                        tracing::warn!(error = %e, delay_secs = delay.as_secs(), "Forum error, reconnecting after backoff");
                        tokio::time::sleep(delay).await;
                        self.login_with_retries().await?;
                    }
                    None => tracing::error!(error = %e, "Skipping batch"),
                }
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }
}

/// Build every collaborator from `config` and run the bot.
///
/// # Errors
///
/// Returns an error if a collaborator cannot be built or the bot cannot log in.
pub async fn run(config: Config) -> Result<()> {
    counter::init_db(&config.db_path).await?;

    let catalog = ScryfallClient::new(&config.catalog_base_url, &config.user_agent, config.catalog_timeout)?;
    let forum = RedditClient::new(
        Credentials {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        },
        &config.user_agent,
    )?;
    let filter = EligibilityFilter::new(&config.ignored_authors)?;
    let engine = ReplyEngine::new(catalog, config.collectible_cooldown_secs.clone());
    let counters = SqliteCounterStore::new(config.db_path.clone());

    let mut bot = Bot::new(
        forum,
        engine,
        counters,
        filter,
        BotSettings::from_config(&config),
        StdRng::from_os_rng(),
    );
    bot.run_forever().await
}
