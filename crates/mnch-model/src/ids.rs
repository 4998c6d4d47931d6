use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical country key: an uppercase three-letter ISO3 code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryKey(String);

impl CountryKey {
    /// Builds a key from anything that trims to three ASCII letters.
    ///
    /// Returns `None` otherwise. Membership in the ISO3 table is checked by
    /// the key normalizer, not here.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
            Some(Self(trimmed.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CountryKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("not an ISO3 code: {value}"))
    }
}

impl From<CountryKey> for String {
    fn from(key: CountryKey) -> Self {
        key.0
    }
}

impl AsRef<str> for CountryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
