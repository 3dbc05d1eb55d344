/// Stable index of a card slot, assigned at generation and never changed.
pub type Position = usize;

/// Identifier of a card face. Each one present on a board appears exactly twice.
pub type SymbolId = u32;

/// Running score. Never negative.
pub type Score = u32;

/// Consecutive-match streak counter, always `>= 1`.
pub type Combo = u32;

/// The two positions resolved together as one pair.
pub type Pair = [Position; 2];
