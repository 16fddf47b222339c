// Venba Data Models
// Requests, results, mode and language registries, usage ledger

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============ Humanization Modes ============

/// Style preset controlling tone and vocabulary of a rewrite.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanizationMode {
    Standard,
    Formal,
    Casual,
    Simplify,
    Expand,
    Shorten,
    Advanced,
    Academic,
    Plain,
}

/// Icon tag shown next to a mode. Resolved statically from the mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum ModeIcon {
    Zap,
    FileText,
    MessageCircle,
    Minus,
    Plus,
    Minimize,
    Sparkles,
    GraduationCap,
    Type,
}

impl HumanizationMode {
    pub const ALL: [HumanizationMode; 9] = [
        Self::Standard,
        Self::Formal,
        Self::Casual,
        Self::Simplify,
        Self::Expand,
        Self::Shorten,
        Self::Advanced,
        Self::Academic,
        Self::Plain,
    ];

    /// Parse a mode id, ignoring case and surrounding whitespace.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "formal" => Some(Self::Formal),
            "casual" => Some(Self::Casual),
            "simplify" => Some(Self::Simplify),
            "expand" => Some(Self::Expand),
            "shorten" => Some(Self::Shorten),
            "advanced" => Some(Self::Advanced),
            "academic" => Some(Self::Academic),
            "plain" => Some(Self::Plain),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Formal => "formal",
            Self::Casual => "casual",
            Self::Simplify => "simplify",
            Self::Expand => "expand",
            Self::Shorten => "shorten",
            Self::Advanced => "advanced",
            Self::Academic => "academic",
            Self::Plain => "plain",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Formal => "Formal",
            Self::Casual => "Casual",
            Self::Simplify => "Simplify",
            Self::Expand => "Expand",
            Self::Shorten => "Shorten",
            Self::Advanced => "Advanced",
            Self::Academic => "Academic",
            Self::Plain => "Plain",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Standard => "Balanced humanization for general use",
            Self::Formal => "Professional and academic writing",
            Self::Casual => "Conversational and friendly tone",
            Self::Simplify => "Make text easier to understand",
            Self::Expand => "Add more detail and context",
            Self::Shorten => "Make text more concise",
            Self::Advanced => "Maximum humanization power",
            Self::Academic => "Scholarly and research-focused",
            Self::Plain => "Simple and straightforward",
        }
    }

    pub fn icon(&self) -> ModeIcon {
        match self {
            Self::Standard => ModeIcon::Zap,
            Self::Formal => ModeIcon::FileText,
            Self::Casual => ModeIcon::MessageCircle,
            Self::Simplify => ModeIcon::Minus,
            Self::Expand => ModeIcon::Plus,
            Self::Shorten => ModeIcon::Minimize,
            Self::Advanced => ModeIcon::Sparkles,
            Self::Academic => ModeIcon::GraduationCap,
            Self::Plain => ModeIcon::Type,
        }
    }

    pub fn target_tone(&self) -> &'static str {
        match self {
            Self::Standard => "natural and balanced",
            Self::Formal => "professional and academic",
            Self::Casual => "conversational and friendly",
            Self::Simplify => "clear and accessible",
            Self::Expand => "detailed and comprehensive",
            Self::Shorten => "concise and direct",
            Self::Advanced => "sophisticated and nuanced",
            Self::Academic => "scholarly and research-focused",
            Self::Plain => "simple and straightforward",
        }
    }

    /// Instruction fragment handed to the LLM for this mode.
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Standard => "Use a balanced, natural writing style.",
            Self::Formal => "Use professional, academic language and formal tone.",
            Self::Casual => "Use conversational, friendly language with a relaxed tone.",
            Self::Simplify => {
                "Make the text easier to understand using simple words and shorter sentences."
            }
            Self::Expand => {
                "Add more detail, context, and elaboration to make the text more comprehensive."
            }
            Self::Shorten => "Make the text more concise and direct while keeping the key points.",
            Self::Advanced => "Use sophisticated vocabulary and complex sentence structures.",
            Self::Academic => {
                "Use scholarly language appropriate for research papers and academic writing."
            }
            Self::Plain => "Use simple, straightforward language that anyone can understand.",
        }
    }
}

impl fmt::Display for HumanizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: ModeIcon,
    pub target_tone: &'static str,
}

impl From<HumanizationMode> for ModeInfo {
    fn from(mode: HumanizationMode) -> Self {
        Self {
            id: mode.id(),
            name: mode.display_name(),
            description: mode.description(),
            icon: mode.icon(),
            target_tone: mode.target_tone(),
        }
    }
}

// ============ Languages ============

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

pub const DEFAULT_LANGUAGE: &str = "en";

pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English", flag: "🇺🇸" },
    Language { code: "es", name: "Spanish", flag: "🇪🇸" },
    Language { code: "fr", name: "French", flag: "🇫🇷" },
    Language { code: "de", name: "German", flag: "🇩🇪" },
    Language { code: "it", name: "Italian", flag: "🇮🇹" },
    Language { code: "pt", name: "Portuguese", flag: "🇵🇹" },
    Language { code: "ru", name: "Russian", flag: "🇷🇺" },
    Language { code: "ja", name: "Japanese", flag: "🇯🇵" },
    Language { code: "ko", name: "Korean", flag: "🇰🇷" },
    Language { code: "zh", name: "Chinese", flag: "🇨🇳" },
    Language { code: "ar", name: "Arabic", flag: "🇸🇦" },
    Language { code: "hi", name: "Hindi", flag: "🇮🇳" },
    Language { code: "nl", name: "Dutch", flag: "🇳🇱" },
    Language { code: "sv", name: "Swedish", flag: "🇸🇪" },
    Language { code: "no", name: "Norwegian", flag: "🇳🇴" },
    Language { code: "da", name: "Danish", flag: "🇩🇰" },
    Language { code: "fi", name: "Finnish", flag: "🇫🇮" },
    Language { code: "pl", name: "Polish", flag: "🇵🇱" },
    Language { code: "cs", name: "Czech", flag: "🇨🇿" },
    Language { code: "hu", name: "Hungarian", flag: "🇭🇺" },
    Language { code: "ro", name: "Romanian", flag: "🇷🇴" },
    Language { code: "bg", name: "Bulgarian", flag: "🇧🇬" },
    Language { code: "hr", name: "Croatian", flag: "🇭🇷" },
    Language { code: "sk", name: "Slovak", flag: "🇸🇰" },
    Language { code: "sl", name: "Slovenian", flag: "🇸🇮" },
    Language { code: "et", name: "Estonian", flag: "🇪🇪" },
    Language { code: "lv", name: "Latvian", flag: "🇱🇻" },
    Language { code: "lt", name: "Lithuanian", flag: "🇱🇹" },
    Language { code: "el", name: "Greek", flag: "🇬🇷" },
    Language { code: "tr", name: "Turkish", flag: "🇹🇷" },
    Language { code: "he", name: "Hebrew", flag: "🇮🇱" },
    Language { code: "th", name: "Thai", flag: "🇹🇭" },
    Language { code: "vi", name: "Vietnamese", flag: "🇻🇳" },
    Language { code: "id", name: "Indonesian", flag: "🇮🇩" },
    Language { code: "ms", name: "Malay", flag: "🇲🇾" },
    Language { code: "tl", name: "Filipino", flag: "🇵🇭" },
    Language { code: "sw", name: "Swahili", flag: "🇰🇪" },
    Language { code: "af", name: "Afrikaans", flag: "🇿🇦" },
    Language { code: "am", name: "Amharic", flag: "🇪🇹" },
    Language { code: "bn", name: "Bengali", flag: "🇧🇩" },
    Language { code: "gu", name: "Gujarati", flag: "🇮🇳" },
    Language { code: "kn", name: "Kannada", flag: "🇮🇳" },
    Language { code: "ml", name: "Malayalam", flag: "🇮🇳" },
    Language { code: "mr", name: "Marathi", flag: "🇮🇳" },
    Language { code: "ne", name: "Nepali", flag: "🇳🇵" },
    Language { code: "or", name: "Odia", flag: "🇮🇳" },
    Language { code: "pa", name: "Punjabi", flag: "🇮🇳" },
    Language { code: "si", name: "Sinhala", flag: "🇱🇰" },
    Language { code: "ta", name: "Tamil", flag: "🇮🇳" },
    Language { code: "te", name: "Telugu", flag: "🇮🇳" },
    Language { code: "ur", name: "Urdu", flag: "🇵🇰" },
    Language { code: "fa", name: "Persian", flag: "🇮🇷" },
    Language { code: "ps", name: "Pashto", flag: "🇦🇫" },
    Language { code: "ku", name: "Kurdish", flag: "🏴" },
];

/// Resolve a language code to its English name. Unknown codes resolve to English.
pub fn language_name(code: &str) -> &'static str {
    let code = code.trim().to_lowercase();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|l| l.code == code)
        .map(|l| l.name)
        .unwrap_or("English")
}

// ============ Request / Result ============

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HumanizeError {
    #[error("input text is empty")]
    EmptyInput,
    #[error("input has {count} words, limit is {limit}")]
    TooManyWords { count: usize, limit: usize },
}

/// One humanization invocation. Construct through [`HumanizationRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanizationRequest {
    text: String,
    mode: String,
    language: String,
}

impl HumanizationRequest {
    /// Validates the text against `max_words` before accepting it.
    pub fn new(
        text: impl Into<String>,
        mode: impl Into<String>,
        language: impl Into<String>,
        max_words: usize,
    ) -> Result<Self, HumanizeError> {
        let text = text.into();
        crate::services::text_processor::validate_input(&text, max_words)?;

        let language = language.into();
        let language = if language.trim().is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else {
            language.trim().to_string()
        };

        Ok(Self {
            text,
            mode: mode.into().trim().to_string(),
            language,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

/// Which terminal state produced a result.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteSource {
    Remote,
    RuleBased,
}

/// Output of one humanization.
///
/// `confidence_score` is synthetic: it is drawn at random from a range that
/// depends on `source` and measures nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizationResult {
    pub request_id: String,
    pub original_text: String,
    pub humanized_text: String,
    pub mode: String,
    pub language: String,
    pub processing_time_seconds: f64,
    pub word_count: usize,
    pub confidence_score: f64,
    pub source: RewriteSource,
}

// ============ Detection (simulated) ============

/// Simulated AI-detection score. Not produced by any real detector.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionScore {
    pub score: f64,
    pub detector: &'static str,
    pub simulated: bool,
}

// ============ Usage Ledger ============

/// Running word counters for one session. Never persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageLedger {
    pub words_today: u64,
    pub words_month: u64,
    pub monthly_limit: u64,
}

impl UsageLedger {
    pub fn new(monthly_limit: u64) -> Self {
        Self {
            words_today: 0,
            words_month: 0,
            monthly_limit,
        }
    }

    #[must_use]
    pub fn record(self, words: usize) -> Self {
        let words = words as u64;
        Self {
            words_today: self.words_today.saturating_add(words),
            words_month: self.words_month.saturating_add(words),
            monthly_limit: self.monthly_limit,
        }
    }

    pub fn remaining_words(&self) -> u64 {
        self.monthly_limit.saturating_sub(self.words_month)
    }

    pub fn percentage_used(&self) -> f64 {
        if self.monthly_limit == 0 {
            return 100.0;
        }
        (self.words_month as f64 / self.monthly_limit as f64 * 100.0).min(100.0)
    }
}

impl Default for UsageLedger {
    fn default() -> Self {
        Self::new(150_000)
    }
}
