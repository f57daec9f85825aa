//! Decimal reading extraction from appliance status messages
//!
//! The appliance formats readings with a locale-specific decimal separator
//! (`"Temperature 21,5 degrees"`). Extraction is a single separator substitution
//! ahead of regular float parsing.

use crate::error::{MonitorError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Separator used by the appliance when none is configured
pub const DEFAULT_DECIMAL_SEPARATOR: char = ',';

/// Extracts the first decimal reading from free-text messages
#[derive(Debug, Clone)]
pub struct DecimalExtractor {
    separator: char,
    pattern: Regex,
}

impl Default for DecimalExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_DECIMAL_SEPARATOR)
    }
}

impl DecimalExtractor {
    /// Create an extractor for the given decimal separator
    pub fn new(separator: char) -> Self {
        let escaped = regex::escape(&separator.to_string());
        // Digits on both sides of the separator
        let pattern = Regex::new(&format!(r"[0-9]+{escaped}[0-9]+"))
            .expect("escaped separator forms a valid pattern");

        Self { separator, pattern }
    }

    /// Decimal separator this extractor recognizes
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Extract the leftmost reading from `message`
    ///
    /// Returns [`MonitorError::NoValue`] when the message carries no reading. A
    /// matched substring that does not parse to a finite number is reported the same
    /// way.
    pub fn extract(&self, message: &str) -> Result<f64> {
        let found = self
            .pattern
            .find(message)
            .ok_or(MonitorError::NoValue)?;

        let value = found
            .as_str()
            .replace(self.separator, ".")
            .parse::<f64>()
            .map_err(|_| MonitorError::NoValue)?;

        // Digit runs too long for f64 parse to infinity
        if value.is_finite() {
            Ok(value)
        } else {
            Err(MonitorError::NoValue)
        }
    }
}

/// Extract a reading using the appliance's default comma separator
pub fn extract_value(message: &str) -> Result<f64> {
    static DEFAULT_EXTRACTOR: OnceLock<DecimalExtractor> = OnceLock::new();
    DEFAULT_EXTRACTOR
        .get_or_init(DecimalExtractor::default)
        .extract(message)
}
