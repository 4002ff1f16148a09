use regex::Regex;

use crate::errors::{ImportGraphError, Result};

/// Regex filter applied to imported symbols.
///
/// A symbol is kept only when the whole symbol matches the pattern, so
/// `.*Map` keeps `java.util.HashMap` but not `java.util.MapEntry`.
#[derive(Debug, Clone)]
pub struct ImportFilter {
    pattern: String,
    regex: Regex,
}

impl ImportFilter {
    /// Compiles `pattern` as a full-string match.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
            ImportGraphError::FilterPattern {
                message: e.to_string(),
                pattern: pattern.to_string(),
            }
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Returns the pattern as written by the caller.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, symbol: &str) -> bool {
        self.regex.is_match(symbol)
    }
}
