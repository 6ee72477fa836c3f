//! Ranking derivation: participant records, projection of raw snapshots,
//! and summary figures over a ranking.

mod projector;
mod record;

pub use projector::{RESERVED_KEY, project};
pub use record::{Record, fields, parse_score};

use serde::Serialize;

/// A record annotated with its 1-based position after sorting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub position: usize,
    /// Parsed numeric score the entry was ranked by.
    pub score: f64,
    pub record: Record,
}

impl RankingEntry {
    pub fn medal(&self) -> Option<Medal> {
        Medal::for_position(self.position)
    }
}

/// Podium marker for the top three positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_position(position: usize) -> Option<Self> {
        match position {
            1 => Some(Self::Gold),
            2 => Some(Self::Silver),
            3 => Some(Self::Bronze),
            _ => None,
        }
    }
}

/// Ordered ranking, best score first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankingList {
    entries: Vec<RankingEntry>,
}

impl RankingList {
    pub(crate) fn new(entries: Vec<RankingEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankingEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> RankingSummary {
        RankingSummary::from_list(self)
    }
}

impl<'a> IntoIterator for &'a RankingList {
    type Item = &'a RankingEntry;
    type IntoIter = std::slice::Iter<'a, RankingEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Headline figures shown above the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RankingSummary {
    pub participants: usize,
    pub top_score: f64,
    /// Mean score rounded to the nearest integer.
    pub average_score: i64,
}

impl RankingSummary {
    pub fn from_list(list: &RankingList) -> Self {
        let Some(first) = list.entries.first() else {
            return Self::default();
        };

        let total: f64 = list.entries.iter().map(|e| e.score).sum();
        let average = total / list.len() as f64;

        Self {
            participants: list.len(),
            top_score: first.score,
            average_score: average.round() as i64,
        }
    }
}
