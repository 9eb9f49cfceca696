//! Collectible cards.
//!
//! Calling a collectible by name while its cooldown has elapsed gets a
//! "waiting" reply from the composer, followed by the card itself: ASCII art
//! stamped with a collector number that counts every delivery.

use crate::counter::CounterStore;
use crate::error::{BelcherError, Result};
use crate::replies::FOOTER;
use crate::timer::CooldownTimer;
use rand::Rng;
use std::ops::RangeInclusive;

/// Cards that are delivered as numbered ASCII art.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collectible {
    ColossalDreadmaw,
    StormCrow,
}

impl Collectible {
    /// All collectibles, in the order they win when several are called at once.
    pub const PRIORITY: [Collectible; 2] = [Collectible::ColossalDreadmaw, Collectible::StormCrow];

    pub fn name(self) -> &'static str {
        match self {
            Self::ColossalDreadmaw => "Colossal Dreadmaw",
            Self::StormCrow => "Storm Crow",
        }
    }

    /// Key of this collectible's delivery counter.
    pub fn counter_id(self) -> &'static str {
        match self {
            Self::ColossalDreadmaw => "me0tbmp",
            Self::StormCrow => "mlnqxci",
        }
    }

    pub fn waiting_header(self) -> &'static str {
        match self {
            Self::ColossalDreadmaw => {
                "The ground trembles. A Colossal Dreadmaw is lumbering towards you with the cards you're looking for:\n\n"
            }
            Self::StormCrow => {
                "A cold wind picks up. A Storm Crow is on its way with the cards you're looking for:\n\n"
            }
        }
    }

    pub fn waiting_image(self) -> &'static str {
        match self {
            Self::ColossalDreadmaw => "https://i.redd.it/bvjzb0rfaike1.png",
            Self::StormCrow => "https://i.redd.it/ykxjrafd13te1.png",
        }
    }

    pub fn waiting_flavour(self) -> &'static str {
        match self {
            Self::ColossalDreadmaw => "_You see its teeth. It's too late._\n\n",
            Self::StormCrow => "_Descending, winter unending._\n\n",
        }
    }

    /// Whether `token` calls this collectible, ignoring case.
    pub fn is_called_by(self, token: &str) -> bool {
        token.to_lowercase() == self.name().to_lowercase()
    }

    /// The card art with the given four-digit collector number.
    pub fn art(self, number: &str) -> String {
        match self {
            Self::ColossalDreadmaw => format!(
                r"
     ______________________________
    /                              \
    | Colossal Dreadmaw  (4)(Ψ)(Ψ) |
    |.____________________________.|
    ||  /    ______/_/|/^>>  \    ||
    || |    /     o  ,    >>  \   ||
    || |    \WWW   _/| ,_>>    \  ||
    ||/        \__// |/|  \___/V  ||
    ||            /  / |,  V/ \   ||
    ||\          /__/__/|      \  ||
    ||_\__________(____)________|_||
    | (Creature ── Dinosaur   M19) |
    |                              |
    | Trample                      |
    |                              |
    | You see its teeth.           |
    | It's too late.               |
    |                      / 6 /  \|
    | #{number} C              \  / 6 /|
    | M19•EN  ==>Jesper Ejsing     |
    \______________________________/

"
            ),
            Self::StormCrow => format!(
                r"
     ______________________________
    /                              \
    | Storm Crow            (1)(ô) |
    |.____________________________.|
    ||                ,-`'´.      ||
    ||               /    .'      ||
    ||    '--....__ /____/_       ||
    ||     ``''''>__)    _°Ì>     ||
    ||     ..-''´ __..--´         ||
    ||    ´´´´ ```^^              ||
    ||____________________________||
    | (Creature ── Bird        9ED) |
    |                              |
    | Flying                       |
    |                              |
    | Descending,                  |
    | Winter unending.             |
    |                      / 1 /  \|
    | #{number} C              \  / 2 /|
    | 9ED•EN  ==>John Matson       |
    \______________________________/

"
            ),
        }
    }
}

/// Format a delivery count as a four-digit collector number.
///
/// # Errors
///
/// Returns a validation error for counts outside `0..=9999`.
///
/// # Examples
///
/// ```
/// use cardbelcher::collectible::collector_number;
///
/// assert_eq!(collector_number(7).unwrap(), "0007");
/// assert!(collector_number(10_000).is_err());
/// ```
pub fn collector_number(count: i64) -> Result<String> {
    if !(0..=9999).contains(&count) {
        return Err(BelcherError::Validation(format!(
            "Collector number {} does not fit in four digits",
            count
        )));
    }
    Ok(format!("{:04}", count))
}

/// Deliver a collectible: count the call, render the art and put the
/// collectible back on cooldown.
///
/// The art carries the count from before this delivery. The cooldown is only
/// advanced once the counter has been updated, so a failing store leaves the
/// collectible available for the next call.
///
/// # Errors
///
/// Returns an error if the counter cannot be read or written, or the count no
/// longer fits a collector number.
pub async fn deliver<S, R>(
    collectible: Collectible,
    store: &S,
    timer: &mut CooldownTimer,
    cooldown_secs: RangeInclusive<u64>,
    rng: &mut R,
) -> Result<String>
where
    S: CounterStore,
    R: Rng + ?Sized,
{
    let previous = store.read(collectible.counter_id()).await?;
    let number = collector_number(previous)?;
    store.write(collectible.counter_id(), previous + 1).await?;

    let wait = timer.set_random_expiry_in(cooldown_secs, rng);
    tracing::info!(
        collectible = collectible.name(),
        number = %number,
        cooldown_secs = wait.as_secs(),
        "Collectible delivered"
    );

    Ok(format!("{}{}", collectible.art(&number), FOOTER))
}
