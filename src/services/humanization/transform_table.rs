// Transform Table
// Per-mode word substitution rules used when the remote rewriter is unavailable.
// Every rule is a global, case-insensitive, whole-word match with a literal
// replacement. Rules run in order; each sees the output of the previous one.

use crate::models::HumanizationMode;
use regex::{NoExpand, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

type RuleSpec = (&'static [&'static str], &'static str);

const STANDARD_RULES: &[RuleSpec] = &[
    (&["AI", "artificial intelligence"], "automated systems"),
    (&["generate", "creating", "producing"], "develop"),
    (&["furthermore", "moreover"], "additionally"),
    (&["implementation", "execution"], "application"),
    (&["utilize", "employ"], "use"),
    (&["facilitate"], "help"),
    (&["demonstrate"], "show"),
    (&["subsequently"], "then"),
];

const FORMAL_RULES: &[RuleSpec] = &[
    (&["I think", "I believe", "maybe", "kinda", "sorta"], "it appears that"),
    (&["very", "really", "super"], "considerably"),
    (&["big", "huge", "massive"], "substantial"),
    (&["good", "great"], "excellent"),
    (&["bad", "awful"], "inadequate"),
    (&["get", "got"], "obtain"),
    (&["show"], "demonstrate"),
];

const CASUAL_RULES: &[RuleSpec] = &[
    (&["therefore", "consequently", "thus"], "so"),
    (&["however", "nevertheless"], "but"),
    (&["utilize", "employ"], "use"),
    (&["demonstrate"], "show"),
    (&["obtain"], "get"),
    (&["substantial"], "big"),
    (&["considerably"], "really"),
];

const SIMPLIFY_RULES: &[RuleSpec] = &[
    (&["utilize", "employ"], "use"),
    (&["facilitate", "enable"], "help"),
    (&["approximately", "roughly"], "about"),
    (&["demonstrate"], "show"),
    (&["substantial"], "big"),
    (&["obtain"], "get"),
    (&["commence"], "start"),
];

const EXPAND_RULES: &[RuleSpec] = &[
    (&["good"], "excellent and beneficial"),
    (&["fast"], "remarkably quick and efficient"),
    (&["easily"], "without difficulty or complexity"),
    (&["important"], "critically significant and valuable"),
    (&["help"], "provide assistance and support"),
];

const SHORTEN_RULES: &[RuleSpec] = &[
    (&["in order to", "so as to"], "to"),
    (&["due to the fact that", "because of the fact that"], "because"),
    (&["at this point in time", "at the present time"], "now"),
    (&["in the event that"], "if"),
    (&["for the purpose of"], "for"),
];

const ACADEMIC_RULES: &[RuleSpec] = &[
    (&["show"], "demonstrate"),
    (&["use"], "utilize"),
    (&["help"], "facilitate"),
    (&["start"], "commence"),
    (&["end"], "conclude"),
    (&["find"], "ascertain"),
    (&["think"], "postulate"),
];

const PLAIN_RULES: &[RuleSpec] = &[
    (&["utilize", "employ"], "use"),
    (&["demonstrate"], "show"),
    (&["facilitate"], "help"),
    (&["commence"], "start"),
    (&["conclude"], "end"),
    (&["ascertain"], "find"),
    (&["postulate"], "think"),
];

/// One compiled substitution.
#[derive(Debug)]
pub struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn compile(alternatives: &[&str], replacement: &'static str) -> Self {
        let body = alternatives
            .iter()
            .map(|a| regex::escape(a))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", body))
            .expect("transform rule patterns are escaped literals");
        Self {
            pattern,
            replacement,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, NoExpand(self.replacement))
            .into_owned()
    }
}

fn specs_for(mode: HumanizationMode) -> Option<&'static [RuleSpec]> {
    match mode {
        HumanizationMode::Standard => Some(STANDARD_RULES),
        HumanizationMode::Formal => Some(FORMAL_RULES),
        HumanizationMode::Casual => Some(CASUAL_RULES),
        HumanizationMode::Simplify => Some(SIMPLIFY_RULES),
        HumanizationMode::Expand => Some(EXPAND_RULES),
        HumanizationMode::Shorten => Some(SHORTEN_RULES),
        HumanizationMode::Academic => Some(ACADEMIC_RULES),
        HumanizationMode::Plain => Some(PLAIN_RULES),
        // No dedicated list; shares the standard rules.
        HumanizationMode::Advanced => None,
    }
}

fn table() -> &'static HashMap<HumanizationMode, Vec<Rule>> {
    static TABLE: OnceLock<HashMap<HumanizationMode, Vec<Rule>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        HumanizationMode::ALL
            .iter()
            .filter_map(|mode| {
                specs_for(*mode).map(|specs| {
                    let rules = specs
                        .iter()
                        .map(|&(alts, replacement)| Rule::compile(alts, replacement))
                        .collect();
                    (*mode, rules)
                })
            })
            .collect()
    })
}

/// Rule list for a mode id. Unknown ids and modes without a list get the
/// standard rules.
pub fn rules_for(mode: &str) -> &'static [Rule] {
    let table = table();
    HumanizationMode::from_id(mode)
        .and_then(|m| table.get(&m))
        .or_else(|| table.get(&HumanizationMode::Standard))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Apply the mode's rules to `text` in order.
pub fn apply_rules(text: &str, mode: &str) -> String {
    rules_for(mode)
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rules() {
        let out = apply_rules(
            "Furthermore, AI can generate text and utilize artificial intelligence.",
            "standard",
        );
        assert_eq!(
            out,
            "additionally, automated systems can develop text and use automated systems."
        );
    }

    #[test]
    fn test_matching_is_whole_word_and_case_insensitive() {
        assert_eq!(apply_rules("SHOW the showcase", "academic"), "demonstrate the showcase");
        assert_eq!(apply_rules("Said the AIDE", "standard"), "Said the AIDE");
    }

    #[test]
    fn test_formal_rules() {
        let out = apply_rules("I think this is a really big deal, maybe", "formal");
        assert_eq!(
            out,
            "it appears that this is a considerably substantial deal, it appears that"
        );
    }

    #[test]
    fn test_casual_rules() {
        let out = apply_rules("However, we obtain substantial gains; thus we win.", "casual");
        assert_eq!(out, "but, we get big gains; so we win.");
    }

    #[test]
    fn test_simplify_rules() {
        let out = apply_rules("Commence with approximately ten steps to enable it", "simplify");
        assert_eq!(out, "start with about ten steps to help it");
    }

    #[test]
    fn test_expand_rules() {
        let out = apply_rules("A good tool can help you work fast", "expand");
        assert_eq!(
            out,
            "A excellent and beneficial tool can provide assistance and support you work remarkably quick and efficient"
        );
    }

    #[test]
    fn test_shorten_rules() {
        let out = apply_rules(
            "In order to win, due to the fact that time matters, act at this point in time",
            "shorten",
        );
        assert_eq!(out, "to win, because time matters, act now");
        assert_eq!(
            apply_rules("in the event that rain falls, for the purpose of safety", "shorten"),
            "if rain falls, for safety"
        );
    }

    #[test]
    fn test_academic_rules_apply_in_order() {
        assert_eq!(apply_rules("use help", "academic"), "utilize facilitate");
    }

    #[test]
    fn test_plain_rules() {
        let out = apply_rules("We postulate and ascertain before we conclude", "plain");
        assert_eq!(out, "We think and find before we end");
    }

    #[test]
    fn test_advanced_and_unknown_use_standard_rules() {
        let text = "Moreover, we demonstrate the implementation";
        let standard = apply_rules(text, "standard");
        assert_eq!(apply_rules(text, "advanced"), standard);
        assert_eq!(apply_rules(text, "no-such-mode"), standard);
        assert!(std::ptr::eq(rules_for("advanced"), rules_for("standard")));
        assert!(!std::ptr::eq(rules_for("plain"), rules_for("standard")));
    }

    #[test]
    fn test_every_mode_resolves_rules() {
        for mode in HumanizationMode::ALL {
            assert!(!rules_for(mode.id()).is_empty(), "{} has no rules", mode);
        }
    }

    #[test]
    fn test_replacement_is_literal() {
        let rule = Rule::compile(&["cost"], "$1 dollars");
        assert_eq!(rule.apply("the cost"), "the $1 dollars");
        assert_eq!(rule.apply("COST and costs"), "$1 dollars and costs");
    }

    #[test]
    fn test_deterministic() {
        let text = "I think we should utilize good help to commence";
        for mode in HumanizationMode::ALL {
            assert_eq!(apply_rules(text, mode.id()), apply_rules(text, mode.id()));
        }
    }

    #[test]
    fn test_rules_are_not_idempotent() {
        // "so as to" -> "to" exposes an "in order to" that only the next pass rewrites.
        let once = apply_rules("in order so as to", "shorten");
        assert_eq!(once, "in order to");
        let twice = apply_rules(&once, "shorten");
        assert_eq!(twice, "to");
        assert_ne!(once, twice);
    }
}
