//! Reply composition.
//!
//! [`ReplyEngine`] turns the trigger tokens of one forum item into the reply
//! text. It owns every piece of state that outlives a single reply (the card
//! catalog and the cooldown timers), so one engine is built at startup and
//! threaded through the whole run.
//!
//! Composition order:
//!
//! 1. A called collectible whose cooldown has elapsed replaces the whole reply
//!    with its waiting message.
//! 2. A roll in `0..=1001` picks the header: `0` is a text-only reply with no
//!    card links, `1` an alternate header, anything else the generic
//!    creature header.
//! 3. Each token runs through the [`rules`] chain and appends one link line.
//! 4. A single-token reply with no flavour yet gets a random catalog flavour.
//! 5. The footer is always last.

mod rules;

use crate::catalog::CardCatalog;
use crate::collectible::{self, Collectible};
use crate::counter::CounterStore;
use crate::error::Result;
use crate::replies::{self, FOOTER, GENERIC_CREATURE_TYPES, LINKLESS_REPLIES, SPECIAL_HEADERS};
use crate::timer::CooldownTimer;
use rand::seq::IndexedRandom;
use rand::Rng;
use rules::{TokenContext, TOKEN_RULES};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Highest easter-egg roll; rolls are drawn uniformly from `0..=ROLL_MAX`.
pub const ROLL_MAX: u32 = 1001;
/// Roll that replaces every card link with a text-only reply.
pub const ROLL_LINKLESS: u32 = 0;
/// Roll that swaps the generic header for an alternate one.
pub const ROLL_SPECIAL_HEADER: u32 = 1;

/// A reply split into its sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyDocument {
    pub header: String,
    pub body: String,
    pub flavour: String,
    pub footer: String,
}

impl ReplyDocument {
    pub fn push_body(&mut self, text: &str) {
        self.body.push_str(text);
    }

    /// Concatenate the sections; each one carries its own spacing.
    pub fn render(&self) -> String {
        format!("{}{}{}{}", self.header, self.body, self.flavour, self.footer)
    }
}

/// Reply generation context: catalog client plus cooldown state.
pub struct ReplyEngine<C> {
    catalog: C,
    copypasta_timer: CooldownTimer,
    collectible_timers: HashMap<Collectible, CooldownTimer>,
    collectible_cooldown_secs: RangeInclusive<u64>,
}

impl<C: CardCatalog> ReplyEngine<C> {
    /// Create an engine whose timers are all usable immediately.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Card catalog consulted for images and flavour text
    /// * `collectible_cooldown_secs` - Range the cooldown after a collectible delivery is drawn from
    pub fn new(catalog: C, collectible_cooldown_secs: RangeInclusive<u64>) -> Self {
        let collectible_timers = Collectible::PRIORITY
            .iter()
            .map(|c| (*c, CooldownTimer::single(Duration::ZERO)))
            .collect();
        Self {
            catalog,
            copypasta_timer: CooldownTimer::single(Duration::ZERO),
            collectible_timers,
            collectible_cooldown_secs,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn copypasta_timer_mut(&mut self) -> &mut CooldownTimer {
        &mut self.copypasta_timer
    }

    pub fn collectible_timer_mut(&mut self, collectible: Collectible) -> &mut CooldownTimer {
        self.collectible_timers
            .entry(collectible)
            .or_insert_with(|| CooldownTimer::single(Duration::ZERO))
    }

    fn collectible_ready(&self, collectible: Collectible) -> bool {
        self.collectible_timers
            .get(&collectible)
            .map_or(true, |timer| timer.is_elapsed())
    }

    /// The highest-priority collectible called in `tokens` whose cooldown has elapsed.
    pub fn pending_collectible(&self, tokens: &[String]) -> Option<Collectible> {
        Collectible::PRIORITY.into_iter().find(|collectible| {
            tokens.iter().any(|token| collectible.is_called_by(token))
                && self.collectible_ready(*collectible)
        })
    }

    /// Compose the reply for `tokens`.
    ///
    /// `filler_links` is the pool joke images are drawn from for tokens that
    /// have no image of their own. Catalog failures never surface here; they
    /// only make the reply plainer.
    pub async fn compose<R>(&mut self, tokens: &[String], filler_links: &[String], rng: &mut R) -> String
    where
        R: Rng + ?Sized,
    {
        if let Some(collectible) = self.pending_collectible(tokens) {
            return waiting_reply(collectible).render();
        }

        let roll = rng.random_range(0..=ROLL_MAX);
        self.compose_rolled(tokens, filler_links, roll, rng).await
    }

    /// Steps 2 to 5 of composition with the easter-egg roll already drawn.
    pub(crate) async fn compose_rolled<R>(
        &mut self,
        tokens: &[String],
        filler_links: &[String],
        roll: u32,
        rng: &mut R,
    ) -> String
    where
        R: Rng + ?Sized,
    {
        let mut reply = ReplyDocument::default();

        match roll {
            ROLL_LINKLESS => {
                reply.body = pick(LINKLESS_REPLIES, rng).to_string();
                tracing::warn!("Easter egg with no image links delivered. Please investigate reception.");
            }
            ROLL_SPECIAL_HEADER => {
                reply.header = pick(SPECIAL_HEADERS, rng).to_string();
                tracing::info!("Easter egg header reply delivered.");
            }
            _ => {
                reply.header = replies::creature_header(pick(GENERIC_CREATURE_TYPES, rng));
            }
        }

        if roll != ROLL_LINKLESS {
            let mut ctx = TokenContext {
                catalog: &self.catalog,
                copypasta_timer: &mut self.copypasta_timer,
                filler_links,
                rng: &mut *rng,
            };
            for token in tokens {
                for rule in TOKEN_RULES {
                    if rule.apply(token, &mut ctx, &mut reply).await {
                        break;
                    }
                }
            }

            if tokens.len() == 1 && reply.flavour.is_empty() {
                let flavour = self.catalog.random_flavour_text().await;
                reply.flavour = replies::catalog_flavour(&flavour);
            }
        }

        reply.footer = FOOTER.to_string();
        reply.render()
    }

    /// Deliver the art for `collectible` and put it back on cooldown.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter store fails; the cooldown is left as it was.
    pub async fn deliver_collectible<S, R>(
        &mut self,
        collectible: Collectible,
        store: &S,
        rng: &mut R,
    ) -> Result<String>
    where
        S: CounterStore,
        R: Rng + ?Sized,
    {
        let cooldown = self.collectible_cooldown_secs.clone();
        let timer = self.collectible_timer_mut(collectible);
        collectible::deliver(collectible, store, timer, cooldown, rng).await
    }
}

fn pick<'a, R: Rng + ?Sized>(choices: &[&'a str], rng: &mut R) -> &'a str {
    choices.choose(rng).copied().unwrap_or_default()
}

fn waiting_reply(collectible: Collectible) -> ReplyDocument {
    tracing::info!(collectible = collectible.name(), "Collectible waiting message delivered.");
    ReplyDocument {
        header: collectible.waiting_header().to_string(),
        body: replies::link_line(collectible.name(), collectible.waiting_image()),
        flavour: collectible.waiting_flavour().to_string(),
        footer: FOOTER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::{KUKA_BEYO, TELL_THE_CHILDREN};
    use crate::replies::{
        FALLBACK_FILLER_LINK, GYANDU_FLAVOUR, NEGATE_HEADER, NEGATE_IMAGE, RASTAMON_HEADER,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::{Cell, RefCell};

    const GENERIC_ROLL: u32 = 500;

    /// In-memory catalog that records what it was asked.
    #[derive(Default)]
    struct StubCatalog {
        images: HashMap<String, String>,
        lookups: RefCell<Vec<String>>,
        flavour_calls: Cell<usize>,
    }

    impl StubCatalog {
        fn with_card(name: &str, image: &str) -> Self {
            let mut catalog = Self::default();
            catalog.images.insert(name.to_string(), image.to_string());
            catalog
        }
    }

    impl CardCatalog for StubCatalog {
        async fn lookup_by_exact_name(&self, name: &str) -> Option<String> {
            self.lookups.borrow_mut().push(name.to_string());
            self.images.get(name).cloned()
        }

        async fn random_flavour_text(&self) -> String {
            self.flavour_calls.set(self.flavour_calls.get() + 1);
            "Stub flavour".to_string()
        }
    }

    fn engine(catalog: StubCatalog) -> ReplyEngine<StubCatalog> {
        ReplyEngine::new(catalog, 300..=7200)
    }

    fn tokens(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn filler() -> Vec<String> {
        vec!["https://i.redd.it/filler.png".to_string()]
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[tokio::test]
    async fn test_footer_on_every_path() {
        let names = tokens(&["Lightning Bolt"]);
        for roll in [ROLL_LINKLESS, ROLL_SPECIAL_HEADER, GENERIC_ROLL, ROLL_MAX] {
            let mut engine = engine(StubCatalog::default());
            let reply = engine.compose_rolled(&names, &filler(), roll, &mut rng()).await;
            assert!(reply.ends_with(FOOTER), "roll {} lost the footer", roll);
        }

        let mut engine = engine(StubCatalog::default());
        let reply = engine.compose(&tokens(&["Storm Crow"]), &filler(), &mut rng()).await;
        assert!(reply.ends_with(FOOTER));
    }

    #[tokio::test]
    async fn test_generic_single_token() {
        let mut engine = engine(StubCatalog::default());
        let reply = engine
            .compose_rolled(&tokens(&["Lightning Bolt"]), &filler(), GENERIC_ROLL, &mut rng())
            .await;

        assert!(reply.starts_with("The "));
        assert!(reply.contains(" have delivered the cards you're looking for:\n\n"));
        assert!(reply.contains("[Lightning Bolt](https://i.redd.it/filler.png)\n\n"));
        assert!(reply.contains("_Stub flavour_\n\n"));
        assert_eq!(engine.catalog().flavour_calls.get(), 1);
    }

    #[tokio::test]
    async fn test_multiple_tokens_skip_catalog_flavour() {
        let mut engine = engine(StubCatalog::default());
        let reply = engine
            .compose_rolled(&tokens(&["Opt", "Shock"]), &filler(), GENERIC_ROLL, &mut rng())
            .await;

        assert_eq!(engine.catalog().flavour_calls.get(), 0);
        assert!(!reply.contains("Stub flavour"));
        let opt = reply.find("[Opt]").unwrap();
        let shock = reply.find("[Shock]").unwrap();
        assert!(opt < shock);
    }

    #[tokio::test]
    async fn test_duplicate_tokens_are_kept() {
        let mut engine = engine(StubCatalog::default());
        let reply = engine
            .compose_rolled(&tokens(&["Opt", "Opt"]), &filler(), GENERIC_ROLL, &mut rng())
            .await;
        assert_eq!(reply.matches("[Opt](").count(), 2);
    }

    #[tokio::test]
    async fn test_simbaba_alias() {
        let mut engine = engine(StubCatalog::default());
        let reply = engine
            .compose_rolled(&tokens(&["simbaba"]), &filler(), GENERIC_ROLL, &mut rng())
            .await;

        assert!(reply.starts_with(RASTAMON_HEADER));
        assert!(reply.contains("[Simbaba](https://i.redd.it/3acfd9iryqjd1.png)\n\n"));
        // alias matches fill the flavour slot themselves
        assert_eq!(engine.catalog().flavour_calls.get(), 0);
        assert!(engine.catalog().lookups.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_alias_header_replaces_special_header() {
        let mut engine = engine(StubCatalog::default());
        let reply = engine
            .compose_rolled(&tokens(&["Simbaba"]), &filler(), ROLL_SPECIAL_HEADER, &mut rng())
            .await;
        assert!(reply.starts_with(RASTAMON_HEADER));
    }

    #[tokio::test]
    async fn test_kuka_beyo_smiley() {
        let mut engine = engine(StubCatalog::default());
        let reply = engine
            .compose_rolled(&tokens(&["kuka beyo"]), &filler(), GENERIC_ROLL, &mut rng())
            .await;
        assert!(reply.contains(&format!("[{}](https://i.redd.it/7tg9y2u7mvfa1.jpg) :)\n\n", KUKA_BEYO)));
        assert!(!reply.contains("Stub flavour"));
    }

    #[tokio::test]
    async fn test_galatians_alias() {
        let mut engine = engine(StubCatalog::default());
        let reply = engine
            .compose_rolled(&tokens(&["Gal 4:16"]), &filler(), GENERIC_ROLL, &mut rng())
            .await;
        assert!(reply.contains(&format!("[*{}*](", TELL_THE_CHILDREN)));
        assert!(reply.contains(GYANDU_FLAVOUR));
    }

    #[tokio::test]
    async fn test_sebi_gyandu_flavour() {
        let mut engine = engine(StubCatalog::default());
        let reply = engine
            .compose_rolled(&tokens(&["Sebi Gyandu"]), &filler(), GENERIC_ROLL, &mut rng())
            .await;
        assert!(reply.contains("[Sebi Gyandu](https://i.redd.it/uvqqezzgp4dd1.jpeg)\n\n"));
        assert!(reply.contains(GYANDU_FLAVOUR));
    }

    #[tokio::test]
    async fn test_collectible_waiting_overrides_roll() {
        for seed in 0..20 {
            let mut engine = engine(StubCatalog::default());
            let mut rng = StdRng::seed_from_u64(seed);
            let reply = engine.compose(&tokens(&["Storm Crow"]), &filler(), &mut rng).await;

            assert!(reply.starts_with(Collectible::StormCrow.waiting_header()));
            assert_eq!(reply.matches("](").count(), 1);
            assert!(reply.contains(Collectible::StormCrow.waiting_image()));
            assert!(engine.catalog().lookups.borrow().is_empty());
        }
    }

    #[tokio::test]
    async fn test_waiting_does_not_consume_cooldown() {
        let mut engine = engine(StubCatalog::default());
        engine.compose(&tokens(&["storm crow"]), &filler(), &mut rng()).await;
        assert_eq!(
            engine.pending_collectible(&tokens(&["Storm Crow"])),
            Some(Collectible::StormCrow)
        );
    }

    #[tokio::test]
    async fn test_collectible_on_cooldown_takes_normal_path() {
        let mut engine = engine(StubCatalog::with_card("Storm Crow", "https://sf.example/crow.jpg"));
        engine
            .collectible_timer_mut(Collectible::StormCrow)
            .set_expiry_in(Duration::from_secs(3600));

        let reply = engine.compose(&tokens(&["Storm Crow"]), &filler(), &mut rng()).await;
        assert!(!reply.starts_with(Collectible::StormCrow.waiting_header()));
        assert!(reply.ends_with(FOOTER));
    }

    #[test]
    fn test_collectible_priority() {
        let engine = engine(StubCatalog::default());
        assert_eq!(
            engine.pending_collectible(&tokens(&["Storm Crow", "Colossal Dreadmaw"])),
            Some(Collectible::ColossalDreadmaw)
        );
        assert_eq!(engine.pending_collectible(&tokens(&["Opt"])), None);
    }

    #[tokio::test]
    async fn test_negate_once_a_day() {
        let mut engine = engine(StubCatalog::default());

        let first = engine
            .compose_rolled(&tokens(&["Negate"]), &filler(), GENERIC_ROLL, &mut rng())
            .await;
        assert!(first.starts_with(NEGATE_HEADER));
        assert!(first.contains(&format!("[Negate]({})", NEGATE_IMAGE)));
        assert!(!engine.copypasta_timer_mut().is_elapsed());

        let second = engine
            .compose_rolled(&tokens(&["negate"]), &filler(), GENERIC_ROLL, &mut rng())
            .await;
        assert!(!second.starts_with(NEGATE_HEADER));
        assert!(second.contains("[negate](https://i.redd.it/filler.png)"));
    }

    #[tokio::test]
    async fn test_fixed_image_card_skips_lookup() {
        let mut engine = engine(StubCatalog::with_card("Revel in Riches", "https://sf.example/revel.jpg"));
        let reply = engine
            .compose_rolled(&tokens(&["Revel in Riches"]), &filler(), GENERIC_ROLL, &mut rng())
            .await;

        assert!(reply.contains("[Revel in Riches](https://i.redd.it/7jkequbnkrzd1.png)\n\n"));
        assert!(engine.catalog().lookups.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_match_adds_source_link() {
        let mut engine = engine(StubCatalog::with_card("Opt", "https://sf.example/opt.jpg"));
        let reply = engine
            .compose_rolled(&tokens(&["Opt"]), &filler(), GENERIC_ROLL, &mut rng())
            .await;
        assert!(reply.contains("[Opt](https://i.redd.it/filler.png) - ([SF](https://sf.example/opt.jpg))\n\n"));
    }

    #[tokio::test]
    async fn test_catalog_miss_falls_back_to_filler() {
        let mut engine = engine(StubCatalog::default());
        let reply = engine
            .compose_rolled(&tokens(&["Not A Card"]), &filler(), GENERIC_ROLL, &mut rng())
            .await;
        assert!(reply.contains("[Not A Card](https://i.redd.it/filler.png)\n\n"));
        assert!(!reply.contains("[SF]"));
        assert_eq!(*engine.catalog().lookups.borrow(), vec!["Not A Card".to_string()]);
    }

    #[tokio::test]
    async fn test_linkless_roll() {
        let mut engine = engine(StubCatalog::default());
        let reply = engine
            .compose_rolled(&tokens(&["Opt"]), &filler(), ROLL_LINKLESS, &mut rng())
            .await;

        assert!(LINKLESS_REPLIES.iter().any(|body| reply.starts_with(body)));
        assert!(!reply.contains("[Opt]"));
        assert!(engine.catalog().lookups.borrow().is_empty());
        assert_eq!(engine.catalog().flavour_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_special_header_roll_keeps_links() {
        let mut engine = engine(StubCatalog::default());
        let reply = engine
            .compose_rolled(&tokens(&["Opt"]), &filler(), ROLL_SPECIAL_HEADER, &mut rng())
            .await;

        assert!(SPECIAL_HEADERS.iter().any(|header| reply.starts_with(header)));
        assert!(reply.contains("[Opt](https://i.redd.it/filler.png)"));
    }

    #[tokio::test]
    async fn test_empty_filler_pool_uses_fallback() {
        let mut engine = engine(StubCatalog::default());
        let reply = engine
            .compose_rolled(&tokens(&["Opt"]), &[], GENERIC_ROLL, &mut rng())
            .await;
        assert!(reply.contains(&format!("[Opt]({})", FALLBACK_FILLER_LINK)));
    }

    #[test]
    fn test_render_has_no_separators() {
        let doc = ReplyDocument {
            header: "h".into(),
            body: "b".into(),
            flavour: "f".into(),
            footer: "x".into(),
        };
        assert_eq!(doc.render(), "hbfx");
    }
}
