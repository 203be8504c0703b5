//! Tiered stop-word reference and cumulative filtering.
//!
//! The reference maps filter levels (1, 2, ...) to sets of common words.
//! Applying level *k* removes every word listed at levels 1 through *k*.
//! On the wire it is a JSON object keyed by level:
//!
//! ```json
//! { "1": ["den", "var"], "2": ["och", "att"] }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::dedupe::{fold_case, subtract_case_insensitive};
use crate::error::{SessionError, StopwordError};
use crate::normalize::Token;

/// How many cumulative tiers of the reference to apply. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FilterLevel(u32);

impl FilterLevel {
    pub const LOWEST: FilterLevel = FilterLevel(1);

    pub fn new(level: u32) -> Result<Self, SessionError> {
        if level == 0 {
            return Err(SessionError::InvalidFilterLevel(level));
        }
        Ok(FilterLevel(level))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for FilterLevel {
    fn default() -> Self {
        Self::LOWEST
    }
}

impl TryFrom<u32> for FilterLevel {
    type Error = SessionError;

    fn try_from(level: u32) -> Result<Self, Self::Error> {
        FilterLevel::new(level)
    }
}

impl From<FilterLevel> for u32 {
    fn from(level: FilterLevel) -> u32 {
        level.0
    }
}

impl fmt::Display for FilterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only once built. Words are stored folded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordReference {
    levels: BTreeMap<u32, HashSet<String>>,
}

impl StopwordReference {
    pub fn from_levels<I, W>(levels: I) -> Result<Self, StopwordError>
    where
        I: IntoIterator<Item = (u32, W)>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        let mut map: BTreeMap<u32, HashSet<String>> = BTreeMap::new();
        for (level, words) in levels {
            if level == 0 {
                return Err(StopwordError::InvalidLevel(level.to_string()));
            }
            map.entry(level)
                .or_default()
                .extend(words.into_iter().map(|w| fold_case(w.as_ref().trim())));
        }
        Ok(Self { levels: map })
    }

    pub fn from_json_str(json: &str) -> Result<Self, StopwordError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Load the reference from a JSON file.
    pub fn load(path: &Path) -> Result<Self, StopwordError> {
        let content = fs::read_to_string(path).map_err(|source| StopwordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reference = Self::from_json_str(&content)?;
        info!("Loaded stop-word reference from {}: {}", path.display(), reference.stats());
        Ok(reference)
    }

    /// Fetch the reference over HTTP.
    pub async fn fetch(url: &str) -> Result<Self, StopwordError> {
        let raw: BTreeMap<String, Vec<String>> = reqwest::get(url)
            .await?
            .error_for_status()?
            .json()
            .await?;
        let reference = Self::from_raw(raw)?;
        info!("Fetched stop-word reference from {}: {}", url, reference.stats());
        Ok(reference)
    }

    fn from_raw(raw: BTreeMap<String, Vec<String>>) -> Result<Self, StopwordError> {
        let mut levels = Vec::with_capacity(raw.len());
        for (key, words) in raw {
            let level: u32 = key
                .trim()
                .parse()
                .map_err(|_| StopwordError::InvalidLevel(key.clone()))?;
            levels.push((level, words));
        }
        Self::from_levels(levels)
    }

    /// Words listed at exactly `level`; a missing level is empty.
    pub fn words_at(&self, level: u32) -> Option<&HashSet<String>> {
        self.levels.get(&level)
    }

    pub fn max_level(&self) -> Option<FilterLevel> {
        self.levels.keys().next_back().map(|&level| FilterLevel(level))
    }

    /// Whether applying `level` would remove `word`.
    pub fn is_stopword(&self, word: &str, level: FilterLevel) -> bool {
        let folded = fold_case(word);
        self.levels
            .range(1..=level.get())
            .any(|(_, words)| words.contains(&folded))
    }

    pub fn stats(&self) -> String {
        let counts: Vec<String> = self
            .levels
            .iter()
            .map(|(level, words)| format!("{}={}", level, words.len()))
            .collect();
        format!("levels: {}", counts.join(", "))
    }
}

/// Apply levels 1 through `level` cumulatively, chaining each level's
/// result into the next.
pub fn filter(list: &[Token], level: FilterLevel, reference: &StopwordReference) -> Vec<Token> {
    let mut current = list.to_vec();
    for (tier, words) in reference.levels.range(1..=level.get()) {
        let before = current.len();
        current = subtract_case_insensitive(&current, words);
        debug!("Filter level {}: removed {} words", tier, before - current.len());
    }
    current
}
