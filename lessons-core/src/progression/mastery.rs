//! Keyword practice
//!
//! Each keyword carries a mastery score between 0 and [`MAX_MASTERY`].
//! Practicing raises it by [`MASTERY_STEP`] and grants [`PRACTICE_XP`] to
//! the progression store. A mastered keyword is closed to practice.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::store::{ProgressionStore, XpGain};
use crate::error::MasteryError;

pub const MAX_MASTERY: u32 = 100;

/// Mastery gained per practice
pub const MASTERY_STEP: u32 = 10;

/// XP granted per practice
pub const PRACTICE_XP: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub name: String,
    #[serde(default)]
    pub mastery: u32,
}

impl Keyword {
    pub fn new(name: impl Into<String>, mastery: u32) -> Self {
        Self {
            name: name.into(),
            mastery: mastery.min(MAX_MASTERY),
        }
    }

    pub fn is_mastered(&self) -> bool {
        self.mastery >= MAX_MASTERY
    }
}

/// What a practice attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Practice {
    /// Mastery went up and XP was granted
    Practiced { mastery: u32, gain: XpGain },
    /// Nothing changed
    AlreadyMastered,
}

impl Practice {
    /// True when this practice brought the keyword to full mastery
    pub fn reached_mastery(&self) -> bool {
        matches!(self, Self::Practiced { mastery, .. } if *mastery >= MAX_MASTERY)
    }
}

/// Ordered set of keywords with their mastery
#[derive(Debug, Clone, Default)]
pub struct KeywordMastery {
    keywords: Vec<Keyword>,
}

impl KeywordMastery {
    /// Build from a keyword list; mastery above the cap is clamped.
    pub fn new(keywords: Vec<Keyword>) -> Result<Self, MasteryError> {
        let mut seen = HashSet::new();
        let mut clamped = Vec::with_capacity(keywords.len());

        for keyword in keywords {
            if keyword.name.trim().is_empty() {
                return Err(MasteryError::EmptyName(clamped.len()));
            }
            if !seen.insert(keyword.name.clone()) {
                return Err(MasteryError::DuplicateKeyword(keyword.name));
            }
            clamped.push(Keyword::new(keyword.name, keyword.mastery));
        }

        Ok(Self { keywords: clamped })
    }

    /// Parse a JSON array of `{"name", "mastery"}` objects
    pub fn from_json_str(json: &str) -> Result<Self, MasteryError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn get(&self, name: &str) -> Option<&Keyword> {
        self.keywords.iter().find(|k| k.name == name)
    }

    pub fn mastered_count(&self) -> usize {
        self.keywords.iter().filter(|k| k.is_mastered()).count()
    }

    /// Practice `name` once, crediting the store unless already mastered.
    pub fn practice(
        &mut self,
        name: &str,
        store: &mut ProgressionStore,
    ) -> Result<Practice, MasteryError> {
        let keyword = self
            .keywords
            .iter_mut()
            .find(|k| k.name == name)
            .ok_or_else(|| MasteryError::UnknownKeyword(name.to_string()))?;

        if keyword.is_mastered() {
            debug!(keyword = name, "Keyword already mastered");
            return Ok(Practice::AlreadyMastered);
        }

        keyword.mastery = (keyword.mastery + MASTERY_STEP).min(MAX_MASTERY);
        let gain = store.add_xp(PRACTICE_XP);
        if keyword.is_mastered() {
            info!(keyword = name, "Keyword mastered");
        }

        Ok(Practice::Practiced {
            mastery: keyword.mastery,
            gain,
        })
    }
}
