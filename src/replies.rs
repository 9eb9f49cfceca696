//! Reply texts.
//!
//! Static header, body, flavour and footer strings. Every piece ends with its
//! own blank-line markup so the composer can concatenate them directly.

/// Appended to every reply, whatever path produced it.
pub const FOOTER: &str = "*********\n\nSubmit your content at: r/MTGCardBelcher";

/// Always part of the filler pool, and used when the pool is somehow empty.
pub const FALLBACK_FILLER_LINK: &str = "https://i.redd.it/pcmd6d3o1oad1.png";

/// Creature types for the generic delivery header.
pub const GENERIC_CREATURE_TYPES: &[&str] = &[
    "Horrors",
    "Kobolds",
    "Goblins",
    "Zombies",
    "Vampires",
    "Werewolves",
    "Legitimate Businesspeople",
    "Brushwaggs",
    "Camarids",
    "Giants",
    "Devils",
    "Hydras",
    "Krakens",
    "Nightmares",
    "Dragons",
    "Cyclopes",
    "Skeletons",
    "Dreadnoughts",
    "Wurms",
    "Leviathans",
];

/// The generic delivery header for a creature type.
pub fn creature_header(creature_type: &str) -> String {
    format!("The {} have delivered the cards you're looking for:\n\n", creature_type)
}

/// Alternate headers; the per-token links still follow.
pub const SPECIAL_HEADERS: &[&str] = &[
    "You find the cards you're looking for, but they're covered in that strange oil... It's probably nothing.\n\n",
    "The Licids have imprinted the cards you're looking for into your mind:\n\n",
    "You feel the ground quake. You see the cards you're looking for, but it's too late.\n\n",
    "The Frog Spirit had the cards... But it was hungry and ate them. Worry not, it tells you what they were: 'Gnshhagghkkapphribbit'.\n\n",
    "You! Yes, you! I'm tired of your and your friends' crap. Go fetch. _Throws the cards on the floor:_\n\n",
    "Gruul? Gruul!\n\n",
];

/// Text-only bodies that replace every card link.
pub const LINKLESS_REPLIES: &[&str] = &[
    "The Invasion annihilated the cards you were looking for.\n\nNothing but ashes and pain remain. Somehow you survive.\n\n",
    "Instead of looking for any cards you stop to admire the marvels of nature:\n\n[The Nature Is Wonderful](https://i.redd.it/cwhcrm1b74fd1.png)\n\n",
    "Turns out bottled mail takes forever to arrive...\n\n[You See a Messenger in the Distance](https://i.redd.it/tzcajj1wcjed1.jpeg)\n\n",
];

pub const RASTAMON_HEADER: &str = "Rastamonliveup has delivered the cards you're looking for:\n\n";

/// Flavour slot filler for alias matches; non-empty so no catalog flavour is fetched.
pub const SPACER_FLAVOUR: &str = "\n";

pub const GYANDU_FLAVOUR: &str = "_Tell the children the truth_\n\n";

/// Cards with their own fixed image, bypassing every lookup.
pub const FIXED_IMAGE_CARDS: &[(&str, &str)] = &[(
    "revel in riches",
    "https://i.redd.it/7jkequbnkrzd1.png",
)];

/// Spellings that trigger the once-a-day Negate copypasta.
pub const NEGATE_SPELLINGS: &[&str] = &["negate", "negates", "negated"];

pub const NEGATE_IMAGE: &str = "https://i.redd.it/ebgrvw7grwzd1.png";

pub const NEGATE_HEADER: &str = "Desolatormagic is fuming at you and your stupid cards:\n\n";

pub const NEGATE_FLAVOUR: &str = concat!(
    "_Before this gets deleted by reddit admins, this asshole took it completely out of context. ",
    "First of all, the idiot thinks it was a marionette deck. It wasn't. That card's not even in the deck. ",
    "He was running counterspell draw, this was approximately turn 25, ",
    "every single creature and spell I cast was countered or removed up until that point ",
    "and this dumbass who copied his deck from MTG Salvation or Goldfish used one of his last copies of negate ",
    "to counter a Revel in Riches when he had 0 creatures on the field and I had 0 treasures in play, ",
    "thus the 'this spell does literally nothing' and he should have let it resolve. ",
    "I love it when people copy a deck and have no idea how to run it or play MTG. ",
    "I was just throwing it out because I had 5 mana and it was the only card left in my hand ",
    "and the game was already over anyway. ",
    "So on the way out I let him know what an idiot he was for countering a spell ",
    "that does nothing in the current board state. ",
    "NOBODY wants to watch a recording of a game where I cast something ",
    "and he counters it or removes it x30 turns. That's idiotic. ",
    "I should have left the game the second I saw what he was running. ",
    "This was the 5th attempt at getting a recording of something resembling watchable MTG gameplay ",
    "and 5 people in a row were playing Karn draw control loop ",
    "or free cast torrential graveyard resurrection control or approach control loop. ",
    "So yeah, I was pissed and he was an asshole for playing this. ",
    "He's one of those idiots who doesn't care about the other players one bit, it's all about winning. ",
    "So running 35 control spells seems reasonable because NOTHING matters but winning. ",
    "Thanks for not showing the board state with library counts or the full log, asshole. ",
    "Enjoy your temporary ban from reddit._\n\n",
);

/// Wrap a catalog flavour line in emphasis markup.
pub fn catalog_flavour(text: &str) -> String {
    format!("_{}_\n\n", text)
}

/// A plain card link line.
pub fn link_line(text: &str, url: &str) -> String {
    format!("[{}]({})\n\n", text, url)
}

/// A card link line with a secondary link to the catalog's own image.
pub fn link_line_with_source(text: &str, url: &str, source_url: &str) -> String {
    format!("[{}]({}) - ([SF]({}))\n\n", text, url, source_url)
}
