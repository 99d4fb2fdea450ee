use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static HIGH_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:high|urgent|emergency)\b").unwrap());

static MEDIUM_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:medium|moderate)\b").unwrap());

/// Coarse urgency of a symptom analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    /// Reported when there is no analysis to classify.
    pub const UNASSESSED: Urgency = Urgency::Medium;

    /// Classify a free-text analysis by its wording.
    ///
    /// Whole words only: high-urgency words win over medium ones, and text
    /// mentioning neither is `Low`. Blank text is [`Urgency::UNASSESSED`].
    pub fn classify(text: &str) -> Self {
        if text.trim().is_empty() {
            Urgency::UNASSESSED
        } else if HIGH_WORDS.is_match(text) {
            Urgency::High
        } else if MEDIUM_WORDS.is_match(text) {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_prefers_high() {
        assert_eq!(Urgency::classify("Moderate pain, seek URGENT care"), Urgency::High);
        assert_eq!(Urgency::classify("Urgency level: moderate"), Urgency::Medium);
        assert_eq!(Urgency::classify("Rest at home"), Urgency::Low);
    }

    #[test]
    fn nothing_to_classify_is_not_low() {
        assert_eq!(Urgency::classify(""), Urgency::Medium);
        assert_eq!(Urgency::classify(" \n\t"), Urgency::Medium);
    }

    #[test]
    fn matches_whole_words_only() {
        assert_eq!(Urgency::classify("Stay hydrated, highly recommended"), Urgency::Low);
        assert_eq!(Urgency::classify("Swelling is higher than yesterday"), Urgency::Low);
        assert_eq!(Urgency::classify("Urgency: High."), Urgency::High);
        assert_eq!(Urgency::classify("- Medium: persistent"), Urgency::Medium);
    }
}
