// Text Processing Service
// Word counting and input validation shared by the UI surface and the pipeline

use crate::models::HumanizeError;

/// Count words the way the input box does: trim, split on whitespace runs,
/// ignore empty pieces.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().filter(|w| !w.is_empty()).count()
}

/// Reject input that must never reach the pipeline.
pub fn validate_input(text: &str, max_words: usize) -> Result<usize, HumanizeError> {
    if text.trim().is_empty() {
        return Err(HumanizeError::EmptyInput);
    }

    let count = count_words(text);
    if count > max_words {
        return Err(HumanizeError::TooManyWords {
            count,
            limit: max_words,
        });
    }

    Ok(count)
}

/// Single-line preview for log messages.
pub fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("Hello World"), 2);
        assert_eq!(count_words("  leading and trailing  "), 3);
        assert_eq!(count_words("tabs\tand\nnewlines  here"), 4);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words(" \n\t "), 0);
    }

    #[test]
    fn test_validate_input_limits() {
        assert_eq!(validate_input("one two three", 3), Ok(3));
        assert_eq!(
            validate_input("one two three four", 3),
            Err(HumanizeError::TooManyWords { count: 4, limit: 3 })
        );
        assert_eq!(validate_input("", 3), Err(HumanizeError::EmptyInput));
    }

    #[test]
    fn test_preview_truncates_and_flattens() {
        assert_eq!(preview("abc\ndef", 10), "abc def");
        assert_eq!(preview("abcdef", 3), "abc...");
    }
}
