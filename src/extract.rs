//! Trigger extraction.
//!
//! Finds every `[[card name]]` call in a block of forum text. The same call
//! arrives in two encodings depending on which client rendered it: the
//! markdown-escaped `\[\[name\]\]` form and the plain `[[name]]` form.

use regex::Regex;
use std::sync::LazyLock;

static ESCAPED_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\[\\\[([^\\\[\]]+)\\\]\\\]").expect("valid escaped call pattern"));
static PLAIN_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("valid plain call pattern"));

/// Extract all trigger tokens from `text`.
///
/// Escaped-form matches come first, then plain-form matches, each group in
/// document order. The two lists are concatenated as-is: a text that carries
/// the same call in both encodings yields that token twice.
///
/// # Examples
///
/// ```
/// use cardbelcher::extract::extract;
///
/// assert_eq!(extract("fetch [[Storm Crow]] please"), vec!["Storm Crow"]);
/// assert!(extract("no calls here").is_empty());
/// ```
pub fn extract(text: &str) -> Vec<String> {
    let escaped = ESCAPED_CALL
        .captures_iter(text)
        .map(|caps| caps[1].to_string());
    let plain = PLAIN_CALL.captures_iter(text).map(|caps| caps[1].to_string());
    escaped.chain(plain).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_brackets() {
        assert!(extract("").is_empty());
        assert!(extract("Just a regular comment about Negate.").is_empty());
        assert!(extract("[single] brackets [do not] count").is_empty());
        assert!(extract("unterminated [[Negate").is_empty());
    }

    #[test]
    fn test_plain_form() {
        assert_eq!(extract("[[Negate]]"), vec!["Negate"]);
        assert_eq!(
            extract("I want [[Storm Crow]] and [[Colossal Dreadmaw]]."),
            vec!["Storm Crow", "Colossal Dreadmaw"]
        );
    }

    #[test]
    fn test_escaped_form() {
        assert_eq!(extract(r"\[\[Negate\]\]"), vec!["Negate"]);
        assert_eq!(
            extract(r"gimme \[\[Kuka Beyo\]\] and \[\[Simbaba\]\]"),
            vec!["Kuka Beyo", "Simbaba"]
        );
    }

    #[test]
    fn test_escaped_matches_come_first_without_dedup() {
        let text = r"[[Negate]] then \[\[Negate\]\] then [[Japudi]]";
        assert_eq!(extract(text), vec!["Negate", "Negate", "Japudi"]);
    }

    #[test]
    fn test_nested_brackets_are_rejected() {
        assert_eq!(extract("[[[Negate]]]"), vec!["Negate"]);
        assert!(extract("[[Neg[a]te]]").is_empty());
    }

    #[test]
    fn test_case_is_preserved() {
        assert_eq!(extract("[[sToRm CrOw]]"), vec!["sToRm CrOw"]);
    }
}
