//! Alias catalog.
//!
//! A static table of Rastamonliveup cards: each canonical name, the spellings
//! people actually type, and the card image. Lookups fold case before
//! comparing, so every stored spelling is lowercase.

/// One named entity in the alias catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasEntry {
    /// Proper spelling of the card.
    pub canonical_name: &'static str,
    /// Accepted spellings, lowercase.
    pub known_spellings: &'static [&'static str],
    /// Link to the card image.
    pub image_url: &'static str,
}

impl AliasEntry {
    /// The "no match" sentinel.
    pub const EMPTY: AliasEntry = AliasEntry {
        canonical_name: "",
        known_spellings: &[],
        image_url: "",
    };

    /// Whether this is a real entry rather than the sentinel.
    pub fn is_found(&self) -> bool {
        !self.canonical_name.is_empty()
    }

    fn matches(&self, folded: &str) -> bool {
        self.known_spellings.iter().any(|spelling| *spelling == folded)
    }
}

pub const KUKA_BEYO: &str = "Kuka Beyo";
pub const SEBI_GYANDU: &str = "Sebi Gyandu";
/// Only reachable through the Galatians 4:16 aliases, never by its own name.
pub const TELL_THE_CHILDREN: &str = "Tell the children the truth";

const SEBI_GYANDU_IMAGE: &str = "https://i.redd.it/uvqqezzgp4dd1.jpeg";

/// The whole table, in lookup order.
pub static ALIASES: &[AliasEntry] = &[
    AliasEntry {
        canonical_name: "Simbaba",
        known_spellings: &["simbaba"],
        image_url: "https://i.redd.it/3acfd9iryqjd1.png",
    },
    AliasEntry {
        canonical_name: "Japudi",
        known_spellings: &["japudi"],
        image_url: "https://i.redd.it/ln92vcaxjnfa1.jpg",
    },
    AliasEntry {
        canonical_name: KUKA_BEYO,
        known_spellings: &["kuka beyo"],
        image_url: "https://i.redd.it/7tg9y2u7mvfa1.jpg",
    },
    AliasEntry {
        canonical_name: "Tōbō Dibi",
        known_spellings: &["tobo dibi", "tōbō dibi"],
        image_url: "https://i.redd.it/his9093feaga1.jpg",
    },
    AliasEntry {
        canonical_name: "Bôsgwan",
        known_spellings: &["bosgwan", "bôsgwan"],
        image_url: "https://i.redd.it/b8ti2tcf9wga1.jpg",
    },
    AliasEntry {
        canonical_name: "Mwabdi",
        known_spellings: &["mwabdi"],
        image_url: "https://i.redd.it/v7tpor93xuha1.jpg",
    },
    AliasEntry {
        canonical_name: "Kadÿoba",
        known_spellings: &["kadyoba", "kadÿoba"],
        image_url: "https://i.redd.it/on1zb0bu42ja1.jpg",
    },
    AliasEntry {
        canonical_name: "Komdegé Swígu",
        known_spellings: &[
            "komdege swigu",
            "komdegé swigu",
            "komdege swígu",
            "komdegé swígu",
        ],
        image_url: "https://i.redd.it/kte28a4yk8ka1.jpg",
    },
    AliasEntry {
        canonical_name: "Dodonbè Dugdjita",
        known_spellings: &["dodonbe dugdjita", "dodonbè dugdjita"],
        image_url: "https://i.redd.it/p5ywsh4yk8ka1.jpg",
    },
    AliasEntry {
        canonical_name: "Sembizi Wamdeyo",
        known_spellings: &["sembizi wamdeyo"],
        image_url: "https://i.redd.it/q3ybd1udokra1.jpg",
    },
    AliasEntry {
        canonical_name: SEBI_GYANDU,
        known_spellings: &["sebi gyandu"],
        image_url: SEBI_GYANDU_IMAGE,
    },
    AliasEntry {
        canonical_name: TELL_THE_CHILDREN,
        known_spellings: &["gal 4:16", "gal. 4:16", "galatians 4:16", "4:16"],
        image_url: SEBI_GYANDU_IMAGE,
    },
];

/// Find the entry that lists `token` among its spellings, ignoring case.
///
/// The first matching entry wins. Returns [`AliasEntry::EMPTY`] when nothing
/// matches.
///
/// # Examples
///
/// ```
/// use cardbelcher::alias::find;
///
/// assert_eq!(find("KUKA BEYO").canonical_name, "Kuka Beyo");
/// assert!(!find("Lightning Bolt").is_found());
/// ```
pub fn find(token: &str) -> AliasEntry {
    let folded = token.to_lowercase();
    ALIASES
        .iter()
        .find(|entry| entry.matches(&folded))
        .copied()
        .unwrap_or(AliasEntry::EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("KUKA BEYO"), find("kuka beyo"));
        assert_eq!(find("Kuka Beyo").canonical_name, KUKA_BEYO);
        assert_eq!(find("sImBaBa").image_url, "https://i.redd.it/3acfd9iryqjd1.png");
    }

    #[test]
    fn test_find_accented_and_plain_spellings() {
        assert_eq!(find("tobo dibi").canonical_name, "Tōbō Dibi");
        assert_eq!(find("TŌBŌ DIBI").canonical_name, "Tōbō Dibi");
        assert_eq!(find("Komdege Swígu").canonical_name, "Komdegé Swígu");
    }

    #[test]
    fn test_unregistered_returns_sentinel() {
        let entry = find("Storm Crow");
        assert_eq!(entry.canonical_name, "");
        assert!(!entry.is_found());
        assert_eq!(entry, AliasEntry::EMPTY);
    }

    #[test]
    fn test_alternate_alias_only() {
        assert_eq!(find("Galatians 4:16").canonical_name, TELL_THE_CHILDREN);
        assert_eq!(find("4:16").image_url, find("Sebi Gyandu").image_url);
        // the canonical name itself is not a registered spelling
        assert!(!find(TELL_THE_CHILDREN).is_found());
    }

    #[test]
    fn test_spellings_are_folded() {
        for entry in ALIASES {
            for spelling in entry.known_spellings {
                assert_eq!(*spelling, spelling.to_lowercase());
            }
        }
    }
}
