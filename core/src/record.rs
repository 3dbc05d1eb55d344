use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Flat snapshot of a game in progress, the only thing that is ever persisted.
///
/// Serialized as `{"score", "combo", "cardOrder", "matchedIndexes"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub score: Score,
    pub combo: Combo,
    #[serde(rename = "cardOrder")]
    pub symbol_order: Vec<SymbolId>,
    #[serde(rename = "matchedIndexes")]
    pub matched_positions: BTreeSet<Position>,
}

impl SaveRecord {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| GameError::SaveEncoding(err.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| {
            log::debug!("Failed to parse save record: {}", err);
            GameError::CorruptSaveData(CorruptionKind::Malformed)
        })
    }

    /// Checks the record against the board it is about to replace.
    ///
    /// `board_len` is the size of the current board and `symbol_pool` the symbols the
    /// game is allowed to show.
    pub fn validate(&self, board_len: usize, symbol_pool: &[SymbolId]) -> Result<()> {
        if self.symbol_order.len() != board_len {
            return Err(CorruptionKind::BoardSizeMismatch.into());
        }
        if self.combo == 0 {
            return Err(CorruptionKind::ZeroCombo.into());
        }
        if self
            .symbol_order
            .iter()
            .any(|symbol| !symbol_pool.contains(symbol))
        {
            return Err(CorruptionKind::UnknownSymbol.into());
        }
        if self
            .matched_positions
            .iter()
            .any(|&position| position >= board_len)
        {
            return Err(CorruptionKind::MatchedOutOfRange.into());
        }

        let board = Board::from_symbols(&self.symbol_order);
        board.check_pairing()?;

        let half_matched = self.matched_positions.iter().any(|&position| {
            board
                .partner_of(position)
                .is_none_or(|partner| !self.matched_positions.contains(&partner))
        });
        if half_matched {
            return Err(CorruptionKind::HalfMatchedPair.into());
        }

        Ok(())
    }
}
