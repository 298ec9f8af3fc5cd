//! Status reclassification from message substrings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status assigned when no tier matches
pub const DEFAULT_MAPPED_STATUS: u16 = 500;

/// Mapping from status tier to the substrings that select it.
///
/// Tiers are kept in ascending numeric order, so when several tiers match a
/// message the lowest code is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusMap(BTreeMap<u16, Vec<String>>);

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add substrings for `status`, appending to any already registered
    #[must_use = "builder methods return a new value"]
    pub fn with<I, S>(mut self, status: u16, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(status, needles);
        self
    }

    pub fn insert<I, S>(&mut self, status: u16, needles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(status)
            .or_default()
            .extend(needles.into_iter().map(Into::into));
    }

    /// First tier (ascending) with a substring present in `message`
    pub fn classify(&self, message: &str) -> Option<u16> {
        self.0
            .iter()
            .find(|(_, needles)| needles.iter().any(|n| message.contains(n.as_str())))
            .map(|(status, _)| *status)
    }

    /// Like [`classify`](Self::classify), falling back to 500
    pub fn status_for(&self, message: &str) -> u16 {
        self.classify(message).unwrap_or(DEFAULT_MAPPED_STATUS)
    }

    /// Every registered substring, in tier order
    pub fn needles(&self) -> Vec<String> {
        self.0.values().flatten().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<(u16, Vec<S>)> for StatusMap {
    fn from_iter<T: IntoIterator<Item = (u16, Vec<S>)>>(iter: T) -> Self {
        let mut map = StatusMap::new();
        for (status, needles) in iter {
            map.insert(status, needles);
        }
        map
    }
}
