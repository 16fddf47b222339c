// Prompt Builder
// Turns (text, mode, language) into the instruction sent to the chat provider.

use crate::models::{language_name, HumanizationMode, DEFAULT_LANGUAGE};

const GENERIC_INSTRUCTION: &str = "Use a natural, human-like writing style.";

/// Instruction fragment for a mode id; unknown ids get the generic one.
pub fn mode_instruction(mode: &str) -> &'static str {
    HumanizationMode::from_id(mode)
        .map(|m| m.instruction())
        .unwrap_or(GENERIC_INSTRUCTION)
}

fn language_note(language: &str) -> String {
    if language.trim().eq_ignore_ascii_case(DEFAULT_LANGUAGE) {
        String::new()
    } else {
        format!(" The output should be in {}.", language_name(language))
    }
}

pub fn build_prompt(text: &str, mode: &str, language: &str) -> String {
    format!(
        "Please humanize the following AI-generated text to make it sound more natural and human-written. \
{} Make sure to bypass AI detectors while preserving the original meaning and context.{} \
Only return the humanized text without any explanations or additional comments.\n\nOriginal text:\n{}",
        mode_instruction(mode),
        language_note(language),
        text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formal_spanish_prompt() {
        let prompt = build_prompt("Hello world", "formal", "es");
        assert!(prompt.contains("Use professional, academic language and formal tone."));
        assert!(prompt.contains("The output should be in Spanish."));
        assert!(prompt.ends_with("Original text:\nHello world"));
    }

    #[test]
    fn test_english_has_no_language_note() {
        let prompt = build_prompt("Hi", "standard", "en");
        assert!(!prompt.contains("The output should be in"));
        assert!(prompt.contains(
            "preserving the original meaning and context. Only return the humanized text"
        ));
    }

    #[test]
    fn test_unknown_mode_and_language_fall_back() {
        let prompt = build_prompt("Hi", "mystery", "xx");
        assert!(prompt.contains(GENERIC_INSTRUCTION));
        assert!(prompt.contains("The output should be in English."));
    }

    #[test]
    fn test_prompt_is_deterministic_and_keeps_text_verbatim() {
        let text = "  Line one\n\nLine   two  ";
        let a = build_prompt(text, "casual", "fr");
        let b = build_prompt(text, "casual", "fr");
        assert_eq!(a, b);
        assert!(a.contains(text));
    }

    #[test]
    fn test_every_mode_has_its_own_instruction() {
        for mode in HumanizationMode::ALL {
            assert_ne!(mode_instruction(mode.id()), GENERIC_INSTRUCTION);
        }
    }
}
