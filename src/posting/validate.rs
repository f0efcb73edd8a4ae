//! Message content policy.

use thiserror::Error;

use crate::config::PostingConfig;

/// A content rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentViolation {
    #[error("message is empty")]
    Empty,

    #[error("message too long ({length} characters, max {max})")]
    TooLong { length: usize, max: usize },

    #[error("message contains prohibited content")]
    Prohibited,
}

/// Validates message content against the configured rules.
#[derive(Debug, Clone)]
pub struct ContentPolicy {
    max_length: usize,
    /// Lowercased at construction so checks are case-insensitive.
    prohibited: Vec<String>,
}

impl ContentPolicy {
    pub fn new(config: &PostingConfig) -> Self {
        Self {
            max_length: config.max_message_length,
            prohibited: config
                .prohibited_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
        }
    }

    /// Check content, returning the first violation found.
    ///
    /// Checks run in order of cheapness: emptiness, length, substrings.
    pub fn check(&self, content: &str) -> Result<(), ContentViolation> {
        if content.trim().is_empty() {
            return Err(ContentViolation::Empty);
        }

        let length = content.chars().count();
        if length > self.max_length {
            return Err(ContentViolation::TooLong {
                length,
                max: self.max_length,
            });
        }

        let lowered = content.to_lowercase();
        if self.prohibited.iter().any(|word| lowered.contains(word)) {
            return Err(ContentViolation::Prohibited);
        }

        Ok(())
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ContentPolicy {
        ContentPolicy::new(&PostingConfig::default())
    }

    #[test]
    fn test_accepts_normal_message() {
        assert!(policy().check("gm from the billboard").is_ok());
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert_eq!(policy().check(""), Err(ContentViolation::Empty));
        assert_eq!(policy().check("   \t\n"), Err(ContentViolation::Empty));
    }

    #[test]
    fn test_rejects_over_length() {
        let long = "x".repeat(101);
        assert_eq!(
            policy().check(&long),
            Err(ContentViolation::TooLong {
                length: 101,
                max: 100
            })
        );
        // Exactly at the limit passes.
        assert!(policy().check(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 100 multibyte characters are within a 100-character limit.
        let content = "é".repeat(100);
        assert!(policy().check(&content).is_ok());
    }

    #[test]
    fn test_prohibited_words_case_insensitive() {
        assert_eq!(policy().check("free SPAM here"), Err(ContentViolation::Prohibited));
        assert_eq!(policy().check("this is a Scam"), Err(ContentViolation::Prohibited));
        assert!(policy().check("this is fine").is_ok());
    }

    #[test]
    fn test_prohibited_matches_substrings() {
        // Embedded occurrences count, matching the contract-side filter.
        assert_eq!(policy().check("antispammer"), Err(ContentViolation::Prohibited));
    }

    #[test]
    fn test_custom_word_list() {
        let config = PostingConfig {
            prohibited_words: vec!["Bogus".to_string()],
            ..PostingConfig::default()
        };
        let policy = ContentPolicy::new(&config);
        assert_eq!(policy.check("totally bogus"), Err(ContentViolation::Prohibited));
        assert!(policy.check("spam is allowed now").is_ok());
    }
}
