use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use rand::Rng;

use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self, config: &GameConfig, symbol_pool: &[SymbolId]) -> Board;
}

/// Deals a face-down board holding each of the first `pairs` distinct symbols of the
/// pool twice. Repeated pool entries are skipped.
///
/// Never fails. When the grid has an odd cell count or the pool is too small to fill
/// it, the leftover cells are left out of the board entirely, so the board can be
/// shorter than `config.total_cells()`.
pub fn deal<R: Rng + ?Sized>(config: &GameConfig, symbol_pool: &[SymbolId], rng: &mut R) -> Board {
    let total_cells = config.total_cells();
    let distinct = distinct_symbols(symbol_pool);
    if distinct.len() < symbol_pool.len() {
        log::warn!(
            "Ignoring {} repeated entries in the symbol pool",
            symbol_pool.len() - distinct.len()
        );
    }
    let pairs = config.pairs_for(distinct.len());

    if pairs * 2 < total_cells {
        log::warn!(
            "Board truncated, {} cells requested but only {} pairs available from a pool of {}",
            total_cells,
            pairs,
            distinct.len()
        );
    }

    let mut symbols: Vec<SymbolId> = distinct[..pairs]
        .iter()
        .flat_map(|&symbol| [symbol, symbol])
        .collect();
    shuffle(&mut symbols, rng);

    log::debug!("Dealt {} cards ({} pairs)", symbols.len(), pairs);
    Board::from_symbols(&symbols)
}

fn distinct_symbols(symbol_pool: &[SymbolId]) -> Vec<SymbolId> {
    let mut seen = BTreeSet::new();
    symbol_pool
        .iter()
        .copied()
        .filter(|&symbol| seen.insert(symbol))
        .collect()
}

/// Fisher-Yates, walking from the last index down and swapping with a uniformly
/// chosen index at or below it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
