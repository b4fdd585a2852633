//! Maps free-text backend error bodies to error videos.
//!
//! Patterns are plain substrings compared case-insensitively. Configuration
//! order decides precedence: the first configured pattern that occurs anywhere
//! in the body wins, regardless of where in the body it occurs. When nothing
//! configured matches, a single built-in fallback phrase is tried last.

use std::fmt;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use hyper::StatusCode;

use crate::config::ErrorMapping;
use crate::error::ConfigError;

/// Phrase checked after all configured patterns have missed.
pub const FALLBACK_PHRASE: &str = "failed to unrestrict link";

/// Video served when only the fallback phrase matched.
pub const FALLBACK_VIDEO: &str = "cannot_unrestrict_file.mp4";

/// Which rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedRule<'a> {
    /// A configured pattern (lowercased form)
    Pattern(&'a str),
    /// The built-in fallback phrase
    Fallback,
}

impl fmt::Display for MatchedRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchedRule::Pattern(pattern) => write!(f, "pattern '{pattern}'"),
            MatchedRule::Fallback => write!(f, "fallback '{FALLBACK_PHRASE}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    pub rule: MatchedRule<'a>,
    pub video: &'a str,
}

/// Compiled, read-only rule set.
#[derive(Debug)]
pub struct ErrorClassifier {
    rules: Vec<ErrorMapping>,
    automaton: AhoCorasick,
}

impl ErrorClassifier {
    pub fn new(mappings: &[ErrorMapping]) -> Result<Self, ConfigError> {
        let rules: Vec<ErrorMapping> = mappings
            .iter()
            .map(|m| ErrorMapping::new(m.pattern.to_lowercase(), m.video.clone()))
            .collect();

        // Standard semantics so overlapping search reports every pattern
        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::Standard)
            .build(rules.iter().map(|r| r.pattern.as_str()))?;

        Ok(Self { rules, automaton })
    }

    /// Classify a captured response. Only a 500 status is ever classified.
    pub fn classify(&self, status: StatusCode, body: &[u8]) -> Option<Classification<'_>> {
        if status != StatusCode::INTERNAL_SERVER_ERROR {
            return None;
        }
        self.match_body(body)
    }

    /// Match a body regardless of status. Invalid UTF-8 is replaced, not rejected.
    pub fn match_body(&self, body: &[u8]) -> Option<Classification<'_>> {
        let text = String::from_utf8_lossy(body).to_lowercase();

        let first_configured = self
            .automaton
            .find_overlapping_iter(text.as_str())
            .map(|m| m.pattern().as_usize())
            .min();

        if let Some(index) = first_configured {
            let rule = &self.rules[index];
            return Some(Classification {
                rule: MatchedRule::Pattern(&rule.pattern),
                video: &rule.video,
            });
        }

        if text.contains(FALLBACK_PHRASE) {
            return Some(Classification {
                rule: MatchedRule::Fallback,
                video: FALLBACK_VIDEO,
            });
        }

        None
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_error_mappings;

    fn defaults() -> ErrorClassifier {
        ErrorClassifier::new(&default_error_mappings()).unwrap()
    }

    fn video_for(classifier: &ErrorClassifier, body: &str) -> Option<String> {
        classifier
            .classify(StatusCode::INTERNAL_SERVER_ERROR, body.as_bytes())
            .map(|c| c.video.to_string())
    }

    #[test]
    fn test_expired_tokens() {
        assert_eq!(
            video_for(&defaults(), "Error: all tokens are expired"),
            Some("token_expired.mp4".to_string())
        );
    }

    #[test]
    fn test_case_insensitive_body() {
        assert_eq!(
            video_for(&defaults(), "connection RESET by peer"),
            Some("network_error.mp4".to_string())
        );
    }

    #[test]
    fn test_case_insensitive_pattern() {
        // "EOF" is configured upper-case
        assert_eq!(
            video_for(&defaults(), "read tcp: unexpected eof"),
            Some("network_error.mp4".to_string())
        );
    }

    #[test]
    fn test_unknown_error_is_unclassified() {
        assert_eq!(video_for(&defaults(), "unknown failure XYZ"), None);
    }

    #[test]
    fn test_non_500_never_classified() {
        let classifier = defaults();
        for status in [StatusCode::OK, StatusCode::BAD_GATEWAY, StatusCode::NOT_FOUND] {
            assert!(classifier
                .classify(status, b"all tokens are expired")
                .is_none());
        }
    }

    #[test]
    fn test_configuration_order_wins_over_body_position() {
        let classifier = ErrorClassifier::new(&[
            ErrorMapping::new("quota", "quota.mp4"),
            ErrorMapping::new("token", "token.mp4"),
        ])
        .unwrap();

        // "token" appears first in the body but "quota" is configured first
        let result = classifier
            .classify(
                StatusCode::INTERNAL_SERVER_ERROR,
                b"token refresh failed: quota exceeded",
            )
            .unwrap();
        assert_eq!(result.video, "quota.mp4");
        assert_eq!(result.rule, MatchedRule::Pattern("quota"));
    }

    #[test]
    fn test_overlapping_patterns_respect_order() {
        let classifier = ErrorClassifier::new(&[
            ErrorMapping::new("reset by peer", "specific.mp4"),
            ErrorMapping::new("reset", "generic.mp4"),
        ])
        .unwrap();
        assert_eq!(
            video_for(&classifier, "connection reset by peer"),
            Some("specific.mp4".to_string())
        );

        let reversed = ErrorClassifier::new(&[
            ErrorMapping::new("reset", "generic.mp4"),
            ErrorMapping::new("reset by peer", "specific.mp4"),
        ])
        .unwrap();
        assert_eq!(
            video_for(&reversed, "connection reset by peer"),
            Some("generic.mp4".to_string())
        );
    }

    #[test]
    fn test_fallback_only_when_no_pattern_matches() {
        let classifier = defaults();
        let result = classifier
            .classify(
                StatusCode::INTERNAL_SERVER_ERROR,
                b"Failed To Unrestrict Link for torrent 42",
            )
            .unwrap();
        assert_eq!(result.video, FALLBACK_VIDEO);
        assert_eq!(result.rule, MatchedRule::Fallback);

        // A configured pattern in the same body takes precedence
        assert_eq!(
            video_for(&classifier, "failed to unrestrict link: timeout"),
            Some("timeout_error.mp4".to_string())
        );
    }

    #[test]
    fn test_fallback_with_empty_rule_set() {
        let classifier = ErrorClassifier::new(&[]).unwrap();
        assert!(classifier.is_empty());
        assert_eq!(
            video_for(&classifier, "failed to unrestrict link"),
            Some(FALLBACK_VIDEO.to_string())
        );
        assert_eq!(video_for(&classifier, "all tokens are expired"), None);
    }

    #[test]
    fn test_broad_pattern_matches_inside_other_words() {
        // Plain substring semantics: "timeout" inside a longer message still counts
        assert_eq!(
            video_for(&defaults(), "the user configured a connect_timeout of 0"),
            Some("timeout_error.mp4".to_string())
        );
    }

    #[test]
    fn test_invalid_utf8_still_matches_ascii() {
        let mut body = vec![0xff, 0xfe, b' '];
        body.extend_from_slice(b"BROKEN PIPE");
        body.push(0xc3);
        assert_eq!(
            defaults()
                .classify(StatusCode::INTERNAL_SERVER_ERROR, &body)
                .map(|c| c.video),
            Some("network_error.mp4")
        );
    }

    #[test]
    fn test_duplicate_patterns_first_wins() {
        let classifier = ErrorClassifier::new(&[
            ErrorMapping::new("expired", "first.mp4"),
            ErrorMapping::new("EXPIRED", "second.mp4"),
        ])
        .unwrap();
        assert_eq!(classifier.len(), 2);
        assert_eq!(
            video_for(&classifier, "link expired"),
            Some("first.mp4".to_string())
        );
    }

    #[test]
    fn test_matched_rule_display() {
        assert_eq!(
            MatchedRule::Pattern("broken pipe").to_string(),
            "pattern 'broken pipe'"
        );
        assert_eq!(
            MatchedRule::Fallback.to_string(),
            "fallback 'failed to unrestrict link'"
        );
    }
}
