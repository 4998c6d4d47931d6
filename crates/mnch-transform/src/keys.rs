//! Country identifier normalization.
//!
//! Each source names countries its own way: bare ISO3 codes, `CODE: Label`
//! strings from SDMX exports, or free-text names. [`KeyNormalizer`] turns all
//! of them into a [`CountryKey`] validated against the embedded ISO3 table.

use std::collections::{BTreeMap, HashMap, HashSet};

use mnch_model::{CountryKey, CoverageError, KeyExtraction, Result, TableSource};

use crate::countries;

/// Folds a country name for lookup: trimmed, single-spaced, lowercase.
fn fold_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Maps raw identifiers of one source to canonical country keys.
#[derive(Debug, Clone)]
pub struct KeyNormalizer {
    extraction: KeyExtraction,
    delimiter: char,
    codes: HashSet<&'static str>,
    names: HashMap<String, CountryKey>,
}

impl KeyNormalizer {
    /// Builds a normalizer with the embedded name table and extra aliases.
    ///
    /// Alias targets must be known ISO3 codes.
    pub fn new(
        extraction: KeyExtraction,
        delimiter: char,
        aliases: &BTreeMap<String, String>,
    ) -> Result<Self> {
        let codes: HashSet<&'static str> = countries::countries().map(|(code, _)| code).collect();
        let mut names = HashMap::new();
        for (code, name) in countries::countries().chain(countries::aliases()) {
            if let Some(key) = CountryKey::parse(code) {
                names.insert(fold_name(name), key);
            }
        }
        for (name, code) in aliases {
            let key = CountryKey::parse(code)
                .filter(|key| codes.contains(key.as_str()))
                .ok_or_else(|| CoverageError::UnknownCountry {
                    identifier: code.clone(),
                })?;
            names.insert(fold_name(name), key);
        }
        Ok(Self {
            extraction,
            delimiter,
            codes,
            names,
        })
    }

    /// Builds a normalizer from a source's key settings.
    pub fn for_source(table: &TableSource, aliases: &BTreeMap<String, String>) -> Result<Self> {
        Self::new(table.key_extraction, table.key_delimiter, aliases)
    }

    /// Returns the key when `code` is a known ISO3 code.
    pub fn known_code(&self, code: &str) -> Option<CountryKey> {
        CountryKey::parse(code).filter(|key| self.codes.contains(key.as_str()))
    }

    /// Resolves a raw identifier.
    ///
    /// An identifier that already is a known ISO3 code is accepted under
    /// every strategy, so normalizing a key returns the same key.
    pub fn normalize(&self, raw: &str) -> Result<CountryKey> {
        let trimmed = raw.trim();
        if let Some(key) = self.known_code(trimmed) {
            return Ok(key);
        }
        let resolved = match self.extraction {
            KeyExtraction::Iso3 => None,
            KeyExtraction::CodePrefix => match trimmed.split_once(self.delimiter) {
                Some((code, _)) => self.known_code(code),
                None => self.leading_letters(trimmed),
            },
            KeyExtraction::LeadingLetters => self.leading_letters(trimmed),
            KeyExtraction::Name => self.names.get(&fold_name(trimmed)).cloned(),
        };
        resolved.ok_or_else(|| CoverageError::UnknownCountry {
            identifier: trimmed.to_string(),
        })
    }

    fn leading_letters(&self, value: &str) -> Option<CountryKey> {
        let head: String = value.chars().take(3).collect();
        self.known_code(&head)
    }
}
