//! Text requirements for leaf controls
//!
//! Requirements are advisory: a control always emits what the user typed and
//! reports violations alongside, leaving it to the page to decide whether to
//! block navigation.

use std::fmt;

use smallvec::SmallVec;

/// Character/word limits and character-class rules for a text field
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Requirements {
    /// Minimum number of characters
    pub min_char: Option<usize>,
    /// Maximum number of characters
    pub max_char: Option<usize>,
    /// Minimum number of whitespace-separated words
    pub min_words: Option<usize>,
    /// Maximum number of whitespace-separated words
    pub max_words: Option<usize>,
    /// Only alphabetic characters (whitespace aside)
    pub only_alpha: bool,
    /// No whitespace at all
    pub disable_spaces: bool,
}

impl Requirements {
    /// Create an empty requirement set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum character count
    pub fn min_char(mut self, min: usize) -> Self {
        self.min_char = Some(min);
        self
    }

    /// Set the maximum character count
    pub fn max_char(mut self, max: usize) -> Self {
        self.max_char = Some(max);
        self
    }

    /// Set the minimum word count
    pub fn min_words(mut self, min: usize) -> Self {
        self.min_words = Some(min);
        self
    }

    /// Set the maximum word count
    pub fn max_words(mut self, max: usize) -> Self {
        self.max_words = Some(max);
        self
    }

    /// Allow only alphabetic characters
    pub fn only_alpha(mut self) -> Self {
        self.only_alpha = true;
        self
    }

    /// Reject whitespace
    pub fn disable_spaces(mut self) -> Self {
        self.disable_spaces = true;
        self
    }

    /// Whether no requirement is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check `text` against every requirement
    pub fn check(&self, text: &str) -> SmallVec<[RequirementViolation; 2]> {
        let mut violations = SmallVec::new();

        let chars = text.chars().count();
        if let Some(min) = self.min_char {
            if chars < min {
                violations.push(RequirementViolation::TooFewChars { min, actual: chars });
            }
        }
        if let Some(max) = self.max_char {
            if chars > max {
                violations.push(RequirementViolation::TooManyChars { max, actual: chars });
            }
        }

        let words = text.split_whitespace().count();
        if let Some(min) = self.min_words {
            if words < min {
                violations.push(RequirementViolation::TooFewWords { min, actual: words });
            }
        }
        if let Some(max) = self.max_words {
            if words > max {
                violations.push(RequirementViolation::TooManyWords { max, actual: words });
            }
        }

        if self.only_alpha
            && !text
                .chars()
                .all(|c| c.is_alphabetic() || c.is_whitespace())
        {
            violations.push(RequirementViolation::NotAlphabetic);
        }
        if self.disable_spaces && text.chars().any(char::is_whitespace) {
            violations.push(RequirementViolation::ContainsSpaces);
        }

        violations
    }
}

/// A single failed requirement
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequirementViolation {
    /// Required field left empty
    Missing,
    TooFewChars { min: usize, actual: usize },
    TooManyChars { max: usize, actual: usize },
    TooFewWords { min: usize, actual: usize },
    TooManyWords { max: usize, actual: usize },
    NotAlphabetic,
    ContainsSpaces,
    /// Picked file's content type is not accepted by the upload
    UnacceptedFileType { content_type: String },
}

impl fmt::Display for RequirementViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementViolation::Missing => write!(f, "This field is required"),
            RequirementViolation::TooFewChars { min, actual } => {
                write!(f, "Must be at least {min} characters ({actual}/{min})")
            }
            RequirementViolation::TooManyChars { max, actual } => {
                write!(f, "Must be at most {max} characters ({actual}/{max})")
            }
            RequirementViolation::TooFewWords { min, actual } => {
                write!(f, "Must be at least {min} words ({actual}/{min})")
            }
            RequirementViolation::TooManyWords { max, actual } => {
                write!(f, "Must be at most {max} words ({actual}/{max})")
            }
            RequirementViolation::NotAlphabetic => write!(f, "Only letters are allowed"),
            RequirementViolation::ContainsSpaces => write!(f, "Spaces are not allowed"),
            RequirementViolation::UnacceptedFileType { content_type } => {
                write!(f, "Files of type {content_type} are not accepted")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_requirements_accept_anything() {
        let reqs = Requirements::new();
        assert!(reqs.is_empty());
        assert!(reqs.check("anything at all 123").is_empty());
    }

    #[test]
    fn test_char_bounds() {
        let reqs = Requirements::new().min_char(3).max_char(5);
        assert_eq!(
            reqs.check("ab").as_slice(),
            &[RequirementViolation::TooFewChars { min: 3, actual: 2 }]
        );
        assert!(reqs.check("abcd").is_empty());
        assert_eq!(
            reqs.check("abcdef").as_slice(),
            &[RequirementViolation::TooManyChars { max: 5, actual: 6 }]
        );
    }

    #[test]
    fn test_chars_are_counted_not_bytes() {
        let reqs = Requirements::new().max_char(4);
        assert!(reqs.check("café").is_empty());
    }

    #[test]
    fn test_word_bounds() {
        let reqs = Requirements::new().min_words(3).max_words(4);
        assert_eq!(
            reqs.check("two  words").as_slice(),
            &[RequirementViolation::TooFewWords { min: 3, actual: 2 }]
        );
        assert!(reqs.check("one two three").is_empty());
        assert_eq!(
            reqs.check("a b c d e").as_slice(),
            &[RequirementViolation::TooManyWords { max: 4, actual: 5 }]
        );
    }

    #[test]
    fn test_character_classes() {
        let reqs = Requirements::new().only_alpha().disable_spaces();
        assert!(reqs.check("chess").is_empty());
        assert_eq!(
            reqs.check("chess club").as_slice(),
            &[RequirementViolation::ContainsSpaces]
        );
        assert_eq!(
            reqs.check("chess2").as_slice(),
            &[RequirementViolation::NotAlphabetic]
        );
    }

    #[test]
    fn test_only_alpha_allows_spaces_when_not_disabled() {
        let reqs = Requirements::new().only_alpha();
        assert!(reqs.check("Chess Club").is_empty());
    }

    #[test]
    fn test_violation_messages() {
        assert_eq!(
            RequirementViolation::TooFewChars { min: 3, actual: 1 }.to_string(),
            "Must be at least 3 characters (1/3)"
        );
        assert_eq!(
            RequirementViolation::Missing.to_string(),
            "This field is required"
        );
    }
}
