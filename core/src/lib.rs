#![no_std]

extern crate alloc;
#[cfg(test)]
#[macro_use]
extern crate std;

use alloc::collections::BTreeSet;
use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use record::*;
pub use session::*;
pub use storage::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod generator;
mod record;
mod session;
mod storage;
mod types;

/// Grid dimensions plus the tunables of a single game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: u8,
    pub cols: u8,
    pub scoring: ScoringRules,
    pub timing: SettleTiming,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(2, 3)
    }
}

impl GameConfig {
    pub const fn new_unchecked(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            scoring: ScoringRules::DEFAULT,
            timing: SettleTiming::DEFAULT,
        }
    }

    pub fn new(rows: u8, cols: u8) -> Self {
        Self::new_unchecked(rows.max(1), cols.max(1))
    }

    pub const fn total_cells(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Number of pairs a board dealt from a pool of `pool_len` symbols holds.
    pub const fn pairs_for(&self, pool_len: usize) -> usize {
        let half = self.total_cells() / 2;
        if pool_len < half { pool_len } else { half }
    }

    /// Strict check that every cell of the grid will hold one card of a pair.
    ///
    /// The generator itself never fails and truncates instead, so callers that
    /// want a full grid should run this first.
    pub fn validate(&self, symbol_pool: &[SymbolId]) -> Result<()> {
        let cells = self.total_cells();
        if cells % 2 != 0 {
            return Err(ConfigError::OddCellCount.into());
        }
        if symbol_pool.len() < cells / 2 {
            return Err(ConfigError::NotEnoughSymbols.into());
        }

        let mut seen = BTreeSet::new();
        if !symbol_pool.iter().all(|&symbol| seen.insert(symbol)) {
            return Err(ConfigError::DuplicateSymbol.into());
        }

        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Points per match, multiplied by the combo in effect when the match resolves.
    pub match_points: Score,
    /// Deducted on every mismatch, clamped at zero.
    pub mismatch_penalty: Score,
}

impl ScoringRules {
    pub const DEFAULT: Self = Self {
        match_points: 100,
        mismatch_penalty: 5,
    };
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Presentation delays handed back to the caller. The engine never waits on them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleTiming {
    pub match_settle_ms: u32,
    pub mismatch_settle_ms: u32,
}

impl SettleTiming {
    pub const DEFAULT: Self = Self {
        match_settle_ms: 200,
        mismatch_settle_ms: 600,
    };

    pub const fn match_settle(&self) -> Duration {
        Duration::from_millis(self.match_settle_ms as u64)
    }

    pub const fn mismatch_settle(&self) -> Duration {
        Duration::from_millis(self.mismatch_settle_ms as u64)
    }
}

impl Default for SettleTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Instruction to turn a mismatched pair face down once `delay` has elapsed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlipBack {
    pub pair: Pair,
    pub delay: Duration,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// First card of a pair is face up, waiting for the second.
    Pending,
    Matched {
        pair: Pair,
        bonus: Score,
        combo: Combo,
    },
    Mismatch(FlipBack),
}

impl SelectionOutcome {
    /// Whether a pair was resolved, which is when the game state should be persisted.
    pub const fn is_resolved(&self) -> bool {
        use SelectionOutcome::*;
        match self {
            Pending => false,
            Matched { .. } => true,
            Mismatch(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_dimensions_to_one() {
        let config = GameConfig::new(0, 0);

        assert_eq!((config.rows, config.cols), (1, 1));
        assert_eq!(config.total_cells(), 1);
    }

    #[test]
    fn pairs_are_capped_by_pool_and_grid() {
        let config = GameConfig::new(3, 3);

        assert_eq!(config.pairs_for(10), 4);
        assert_eq!(config.pairs_for(2), 2);
        assert_eq!(config.pairs_for(0), 0);
    }

    #[test]
    fn validate_rejects_odd_grid() {
        let config = GameConfig::new(3, 3);

        assert_eq!(
            config.validate(&[0, 1, 2, 3, 4]),
            Err(GameError::InvalidConfig(ConfigError::OddCellCount))
        );
    }

    #[test]
    fn validate_rejects_small_or_duplicated_pool() {
        let config = GameConfig::new(2, 3);

        assert_eq!(
            config.validate(&[0, 1]),
            Err(GameError::InvalidConfig(ConfigError::NotEnoughSymbols))
        );
        assert_eq!(
            config.validate(&[0, 1, 1]),
            Err(GameError::InvalidConfig(ConfigError::DuplicateSymbol))
        );
        assert_eq!(config.validate(&[7, 8, 9]), Ok(()));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"rows": 4, "cols": 4}"#).unwrap();

        assert_eq!(config.total_cells(), 16);
        assert_eq!(config.scoring, ScoringRules::DEFAULT);
        assert_eq!(config.timing.mismatch_settle(), Duration::from_millis(600));
    }
}
