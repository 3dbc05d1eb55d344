use alloc::collections::VecDeque;
use core::num::Saturating;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Active,
    Won,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Active
    }
}

/// Notifications for the view layer, queued in the order they happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Flipped { position: Position },
    Matched { pair: Pair, bonus: Score, combo: Combo },
    Mismatch { pair: Pair },
    FlippedBack { pair: Pair },
    Won { score: Score },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScoreState {
    score: Saturating<Score>,
    combo: Combo,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            score: Saturating(0),
            combo: 1,
        }
    }
}

impl ScoreState {
    pub fn new(score: Score, combo: Combo) -> Self {
        Self {
            score: Saturating(score),
            combo: combo.max(1),
        }
    }

    pub fn score(&self) -> Score {
        self.score.0
    }

    pub fn combo(&self) -> Combo {
        self.combo
    }

    /// Awards `points * combo` and then extends the streak. Returns the bonus.
    fn award_match(&mut self, points: Score) -> Score {
        let bonus = points.saturating_mul(self.combo);
        self.score += Saturating(bonus);
        self.combo = self.combo.saturating_add(1);
        bonus
    }

    fn penalize(&mut self, penalty: Score) {
        self.score -= Saturating(penalty);
        self.combo = 1;
    }
}

/// Owns the board, the pending selection and the score of one game, and resolves
/// selected cards two at a time.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchEngine {
    board: Board,
    selection: SmallVec<[Position; 2]>,
    score: ScoreState,
    scoring: ScoringRules,
    timing: SettleTiming,
    state: EngineState,
    events: VecDeque<GameEvent>,
}

impl MatchEngine {
    pub fn new(board: Board, config: &GameConfig) -> Self {
        Self {
            board,
            selection: SmallVec::new(),
            score: ScoreState::default(),
            scoring: config.scoring,
            timing: config.timing,
            state: EngineState::default(),
            events: VecDeque::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn score(&self) -> Score {
        self.score.score()
    }

    pub fn combo(&self) -> Combo {
        self.score.combo()
    }

    pub fn score_state(&self) -> ScoreState {
        self.score
    }

    /// Positions selected but not yet resolved, at most one between calls to `select`.
    pub fn pending_selection(&self) -> &[Position] {
        &self.selection
    }

    /// True once every card is matched, an empty board is trivially won.
    pub fn is_won(&self) -> bool {
        self.board.all_matched()
    }

    pub fn can_select(&self, position: Position) -> bool {
        self.check_selectable(position).is_ok()
    }

    /// Turns the card at `position` face up and resolves the pair once two are up.
    pub fn select(&mut self, position: Position) -> Result<SelectionOutcome> {
        self.check_selectable(position)?;

        if let Some(card) = self.board.card_mut(position) {
            card.flip_up();
        }
        self.selection.push(position);
        self.events.push_back(GameEvent::Flipped { position });
        log::debug!("Flipped card at {}", position);

        match *self.selection.as_slice() {
            [first, second] => Ok(self.resolve([first, second])),
            _ => Ok(SelectionOutcome::Pending),
        }
    }

    /// Turns a mismatched pair face down again, once the caller's delay has elapsed.
    pub fn apply_flip_back(&mut self, flip_back: &FlipBack) -> Result<()> {
        let settles = flip_back.pair.iter().all(|&position| {
            !self.selection.contains(&position)
                && self
                    .board
                    .card(position)
                    .is_some_and(CardState::is_pending)
        });
        if !settles {
            return Err(GameError::InvalidFlipBack);
        }

        for position in flip_back.pair {
            if let Some(card) = self.board.card_mut(position) {
                card.flip_down();
            }
        }
        self.events.push_back(GameEvent::FlippedBack {
            pair: flip_back.pair,
        });
        Ok(())
    }

    /// Hands over queued notifications, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Projects the current board and score into a record. Pending selections are not
    /// part of it.
    pub fn save(&self) -> SaveRecord {
        SaveRecord {
            score: self.score.score(),
            combo: self.score.combo(),
            symbol_order: self.board.symbol_order(),
            matched_positions: self.board.matched_positions(),
        }
    }

    /// Replaces board and score with the ones in `record`.
    ///
    /// The record must describe a board of the current size using only symbols from
    /// `symbol_pool`. Nothing changes unless the whole record is valid.
    pub fn load(&mut self, record: &SaveRecord, symbol_pool: &[SymbolId]) -> Result<()> {
        record.validate(self.board.len(), symbol_pool)?;

        let mut board = Board::from_symbols(&record.symbol_order);
        for &position in &record.matched_positions {
            if let Some(card) = board.card_mut(position) {
                card.mark_matched();
            }
        }

        self.board = board;
        self.score = ScoreState::new(record.score, record.combo);
        self.selection.clear();
        self.events.clear();
        self.state = EngineState::Active;

        log::info!(
            "Restored game: {} of {} cards matched, score {}, combo {}",
            record.matched_positions.len(),
            self.board.len(),
            record.score,
            record.combo
        );
        Ok(())
    }

    fn resolve(&mut self, pair: Pair) -> SelectionOutcome {
        let [first, second] = pair;
        self.selection.clear();

        if self.board[first].symbol_id() == self.board[second].symbol_id() {
            for position in pair {
                if let Some(card) = self.board.card_mut(position) {
                    card.mark_matched();
                }
            }

            let bonus = self.score.award_match(self.scoring.match_points);
            let combo = self.score.combo();
            self.events
                .push_back(GameEvent::Matched { pair, bonus, combo });
            log::debug!(
                "Matched {:?} for {} points, combo now {}",
                pair,
                bonus,
                combo
            );

            if self.is_won() {
                self.state = EngineState::Won;
                self.events.push_back(GameEvent::Won {
                    score: self.score.score(),
                });
                log::info!("Game won with score {}", self.score.score());
            }

            SelectionOutcome::Matched { pair, bonus, combo }
        } else {
            self.score.penalize(self.scoring.mismatch_penalty);
            self.events.push_back(GameEvent::Mismatch { pair });
            log::debug!("Mismatch {:?}, score now {}", pair, self.score.score());

            SelectionOutcome::Mismatch(FlipBack {
                pair,
                delay: self.timing.mismatch_settle(),
            })
        }
    }

    fn check_selectable(&self, position: Position) -> core::result::Result<(), SelectionError> {
        if self.state.is_finished() {
            return Err(SelectionError::GameOver);
        }
        if self.selection.len() >= 2 {
            return Err(SelectionError::SelectionFull);
        }

        let card = self
            .board
            .card(position)
            .ok_or(SelectionError::OutOfRange)?;
        if card.is_matched() {
            Err(SelectionError::AlreadyMatched)
        } else if card.is_flipped() {
            Err(SelectionError::AlreadyFlipped)
        } else {
            Ok(())
        }
    }
}
