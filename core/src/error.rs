use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid selection: {0}")]
    InvalidSelection(SelectionError),
    #[error("Corrupt save data: {0}")]
    CorruptSaveData(CorruptionKind),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(ConfigError),
    #[error("Cards to flip back are not face up and unmatched")]
    InvalidFlipBack,
    #[error("Failed to encode save record: {0}")]
    SaveEncoding(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("position is outside the board")]
    OutOfRange,
    #[error("card is already matched")]
    AlreadyMatched,
    #[error("card is already face up")]
    AlreadyFlipped,
    #[error("two cards are already pending")]
    SelectionFull,
    #[error("game already won, no new moves are accepted")]
    GameOver,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CorruptionKind {
    #[error("record is not valid save JSON")]
    Malformed,
    #[error("card order length does not match the board size")]
    BoardSizeMismatch,
    #[error("matched index outside the board")]
    MatchedOutOfRange,
    #[error("symbol is not part of the symbol pool")]
    UnknownSymbol,
    #[error("symbol does not appear exactly twice")]
    UnpairedSymbol,
    #[error("only one card of a pair is matched")]
    HalfMatchedPair,
    #[error("combo must be at least 1")]
    ZeroCombo,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid has an odd number of cells")]
    OddCellCount,
    #[error("symbol pool is smaller than the number of pairs")]
    NotEnoughSymbols,
    #[error("symbol pool contains duplicates")]
    DuplicateSymbol,
}

/// Failure reported by a [`KeyValueStore`](crate::KeyValueStore) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Storage failure: {0}")]
pub struct StorageError(pub String);

impl From<SelectionError> for GameError {
    fn from(err: SelectionError) -> Self {
        Self::InvalidSelection(err)
    }
}

impl From<CorruptionKind> for GameError {
    fn from(kind: CorruptionKind) -> Self {
        Self::CorruptSaveData(kind)
    }
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
