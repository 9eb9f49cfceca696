//! Per-token override rules.
//!
//! Each trigger token is offered to [`TOKEN_RULES`] in order; the first rule
//! that claims the token writes its link (and possibly header and flavour)
//! into the reply. [`TokenRule::Filler`] claims everything, so every token
//! produces exactly one link line.

use super::ReplyDocument;
use crate::alias::{self, KUKA_BEYO, SEBI_GYANDU, TELL_THE_CHILDREN};
use crate::catalog::CardCatalog;
use crate::replies::{
    self, FALLBACK_FILLER_LINK, FIXED_IMAGE_CARDS, GYANDU_FLAVOUR, NEGATE_FLAVOUR, NEGATE_HEADER,
    NEGATE_IMAGE, NEGATE_SPELLINGS, RASTAMON_HEADER, SPACER_FLAVOUR,
};
use crate::timer::CooldownTimer;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::time::Duration;

pub(crate) const COPYPASTA_COOLDOWN: Duration = Duration::from_secs(60 * 60 * 24);

/// Link generation strategies, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenRule {
    /// A card with its own static image; no lookups.
    FixedImage,
    /// The once-a-day copypasta easter egg.
    Copypasta,
    /// A card from the alias catalog.
    Alias,
    /// A real card the catalog knows: filler link plus a source link.
    CatalogMatch,
    /// Anything else: a filler link.
    Filler,
}

pub(crate) const TOKEN_RULES: &[TokenRule] = &[
    TokenRule::FixedImage,
    TokenRule::Copypasta,
    TokenRule::Alias,
    TokenRule::CatalogMatch,
    TokenRule::Filler,
];

/// Everything a rule may consult or mutate besides the reply itself.
pub(crate) struct TokenContext<'a, C, R: ?Sized> {
    pub catalog: &'a C,
    pub copypasta_timer: &'a mut CooldownTimer,
    pub filler_links: &'a [String],
    pub rng: &'a mut R,
}

impl<C, R> TokenContext<'_, C, R>
where
    C: CardCatalog,
    R: Rng + ?Sized,
{
    fn pick_filler(&mut self) -> String {
        self.filler_links
            .choose(&mut *self.rng)
            .cloned()
            .unwrap_or_else(|| FALLBACK_FILLER_LINK.to_string())
    }
}

impl TokenRule {
    /// Apply this rule to `token` if it claims it. Returns whether it did.
    pub(crate) async fn apply<C, R>(
        self,
        token: &str,
        ctx: &mut TokenContext<'_, C, R>,
        reply: &mut ReplyDocument,
    ) -> bool
    where
        C: CardCatalog,
        R: Rng + ?Sized,
    {
        let folded = token.to_lowercase();
        match self {
            Self::FixedImage => {
                let Some((_, image)) = FIXED_IMAGE_CARDS.iter().find(|(name, _)| *name == folded)
                else {
                    return false;
                };
                reply.push_body(&replies::link_line(token, image));
                true
            }
            Self::Copypasta => {
                if !NEGATE_SPELLINGS.contains(&folded.as_str()) || !ctx.copypasta_timer.is_elapsed() {
                    return false;
                }
                ctx.copypasta_timer.set_expiry_in(COPYPASTA_COOLDOWN);
                reply.header = NEGATE_HEADER.to_string();
                reply.push_body(&replies::link_line(token, NEGATE_IMAGE));
                reply.flavour = NEGATE_FLAVOUR.to_string();
                tracing::info!("Negate flavour used up for today. See you tomorrow!");
                true
            }
            Self::Alias => {
                let entry = alias::find(token);
                if !entry.is_found() {
                    return false;
                }
                reply.header = RASTAMON_HEADER.to_string();
                let line = match entry.canonical_name {
                    KUKA_BEYO => format!("[{}]({}) :)\n\n", entry.canonical_name, entry.image_url),
                    TELL_THE_CHILDREN => {
                        format!("[*{}*]({})\n\n", entry.canonical_name, entry.image_url)
                    }
                    name => replies::link_line(name, entry.image_url),
                };
                reply.push_body(&line);
                reply.flavour = match entry.canonical_name {
                    SEBI_GYANDU | TELL_THE_CHILDREN => {
                        tracing::info!("Tell the children the truth.");
                        GYANDU_FLAVOUR.to_string()
                    }
                    _ => SPACER_FLAVOUR.to_string(),
                };
                true
            }
            Self::CatalogMatch => {
                let Some(source) = ctx.catalog.lookup_by_exact_name(token).await else {
                    return false;
                };
                let filler = ctx.pick_filler();
                reply.push_body(&replies::link_line_with_source(token, &filler, &source));
                true
            }
            Self::Filler => {
                let filler = ctx.pick_filler();
                reply.push_body(&replies::link_line(token, &filler));
                true
            }
        }
    }
}
