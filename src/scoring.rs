//! Point aggregation and the final leaderboard
//!
//! Slot i of a judged level awards `V - 1 - i` points to the variant
//! owning the image in it, so the top slot of a 5-variant level is worth
//! 4 points and the bottom slot 0. Totals accumulate per variant across
//! levels; the leaderboard is built once, after the last level, and never
//! mutated.

use std::fs;
use std::io;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::LevelResult;

/// Points the image in `slot` earns in a level of `variant_count` slots
#[inline]
pub fn slot_points(variant_count: usize, slot: usize) -> u64 {
    (variant_count - 1 - slot) as u64
}

/// Accumulated totals per variant index across every judged level
pub fn tally(variant_count: usize, results: &[LevelResult]) -> Vec<u64> {
    let mut totals = vec![0u64; variant_count];
    for result in results {
        debug_assert_eq!(result.order.len(), variant_count);
        for (slot, image) in result.order.iter().enumerate() {
            totals[image.variant()] += slot_points(variant_count, slot);
        }
    }
    totals
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub variant: usize,
    pub score: u64,
}

/// Final standings, best first.
///
/// Equal scores rank by ascending variant index, so ties keep the set's
/// original variant order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

/// Why a leaderboard export failed
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode leaderboard")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write leaderboard file")]
    Write(#[from] io::Error),
}

impl Leaderboard {
    /// Build the standings from every judged level
    pub fn build(variant_names: &[String], results: &[LevelResult]) -> Self {
        let totals = tally(variant_names.len(), results);
        let mut entries: Vec<LeaderboardEntry> = variant_names
            .iter()
            .zip(&totals)
            .enumerate()
            .map(|(variant, (name, score))| LeaderboardEntry {
                name: name.clone(),
                variant,
                score: *score,
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.variant.cmp(&b.variant)));

        info!(
            "leaderboard built over {} levels, winner {:?}",
            results.len(),
            entries.first().map(|e| e.name.as_str())
        );
        Self { entries }
    }

    /// The top entry, if the board is non-empty
    pub fn winner(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the standings to `path` as pretty JSON
    pub fn export(&self, path: &Path) -> Result<(), ExportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("leaderboard exported to {:?}", path);
        Ok(())
    }
}
