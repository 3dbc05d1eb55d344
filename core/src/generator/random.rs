use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::*;

/// Seeded generator, the same seed always deals the same board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: &GameConfig, symbol_pool: &[SymbolId]) -> Board {
        let mut rng = Pcg32::seed_from_u64(self.seed);
        deal(config, symbol_pool, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn deals_each_symbol_twice() {
        let pool = [10, 11, 12, 13, 14, 15, 16, 17];
        let board = RandomBoardGenerator::new(7).generate(&GameConfig::new(4, 4), &pool);

        assert_eq!(board.len(), 16);
        assert_eq!(board.check_pairing(), Ok(()));
        assert!(board.iter().all(|card| !card.is_flipped() && !card.is_matched()));
    }

    #[test]
    fn only_the_first_pairs_of_the_pool_are_used() {
        let board = RandomBoardGenerator::new(1).generate(&GameConfig::new(2, 2), &[3, 4, 5, 6]);

        let mut symbols = board.symbol_order();
        symbols.sort_unstable();
        assert_eq!(symbols, [3, 3, 4, 4]);
    }

    #[test]
    fn odd_grid_omits_leftover_cell() {
        let pool = [0, 1, 2, 3, 4, 5];
        let board = RandomBoardGenerator::new(3).generate(&GameConfig::new(3, 3), &pool);

        assert_eq!(board.len(), 8);
        assert_eq!(board.check_pairing(), Ok(()));
    }

    #[test]
    fn small_pool_truncates_board() {
        let board = RandomBoardGenerator::new(3).generate(&GameConfig::new(2, 3), &[9]);

        assert_eq!(board.symbol_order(), [9, 9]);
    }

    #[test]
    fn repeated_pool_entries_are_dealt_once() {
        let single = RandomBoardGenerator::new(5).generate(&GameConfig::new(2, 2), &[7, 7]);
        assert_eq!(single.symbol_order(), [7, 7]);

        let board = RandomBoardGenerator::new(5).generate(&GameConfig::new(2, 2), &[7, 7, 8]);
        let mut symbols = board.symbol_order();
        symbols.sort_unstable();
        assert_eq!(symbols, [7, 7, 8, 8]);
        assert_eq!(board.check_pairing(), Ok(()));
    }

    #[test]
    fn degenerate_inputs_yield_empty_board() {
        let no_symbols = RandomBoardGenerator::new(0).generate(&GameConfig::new(4, 4), &[]);
        let single_cell = RandomBoardGenerator::new(0).generate(&GameConfig::new(1, 1), &[1]);

        assert!(no_symbols.is_empty());
        assert!(single_cell.is_empty());
    }

    #[test]
    fn same_seed_same_board() {
        let config = GameConfig::new(4, 5);
        let pool: Vec<SymbolId> = (0..10).collect();

        let a = RandomBoardGenerator::new(42).generate(&config, &pool);
        let b = RandomBoardGenerator::new(42).generate(&config, &pool);

        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_is_close_to_uniform() {
        const ROUNDS: u32 = 9000;
        let config = GameConfig::new(2, 3);
        let pool = [0, 1, 2];
        let mut rng = Pcg32::seed_from_u64(0x5eed);
        let mut counts: BTreeMap<(Position, SymbolId), u32> = BTreeMap::new();

        for _ in 0..ROUNDS {
            let board = deal(&config, &pool, &mut rng);
            for card in board.iter() {
                *counts.entry((card.position(), card.symbol_id())).or_default() += 1;
            }
        }

        // 6 positions x 3 symbols, each expected in a third of the rounds
        assert_eq!(counts.len(), 18);
        let expected = f64::from(ROUNDS) / 3.0;
        let chi_square: f64 = counts
            .values()
            .map(|&observed| {
                let diff = f64::from(observed) - expected;
                diff * diff / expected
            })
            .sum();
        assert!(chi_square < 45.0, "chi-square {chi_square} too large: {counts:?}");
    }

    #[test]
    fn shuffle_keeps_every_item() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut items = vec![1, 2, 3, 4, 5, 6, 7];

        shuffle(&mut items, &mut rng);
        items.sort_unstable();

        assert_eq!(items, [1, 2, 3, 4, 5, 6, 7]);
    }

    proptest! {
        #[test]
        fn generated_boards_pair_every_symbol(
            rows in 1u8..8,
            cols in 1u8..8,
            pool_len in 0u32..40,
            seed in any::<u64>(),
        ) {
            let config = GameConfig::new(rows, cols);
            let pool: Vec<SymbolId> = (0..pool_len).collect();

            let board = RandomBoardGenerator::new(seed).generate(&config, &pool);

            prop_assert_eq!(board.len(), 2 * config.pairs_for(pool.len()));
            prop_assert!(board.len() <= config.total_cells());
            prop_assert_eq!(board.check_pairing(), Ok(()));
        }
    }
}
