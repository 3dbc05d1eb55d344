use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::ops::Index;
use serde::{Deserialize, Serialize};

use crate::*;

/// One card slot on the board.
///
/// `is_matched` only ever goes from `false` to `true`, and a matched card stays face up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardState {
    position: Position,
    symbol_id: SymbolId,
    is_flipped: bool,
    is_matched: bool,
}

impl CardState {
    pub const fn face_down(position: Position, symbol_id: SymbolId) -> Self {
        Self {
            position,
            symbol_id,
            is_flipped: false,
            is_matched: false,
        }
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub const fn symbol_id(&self) -> SymbolId {
        self.symbol_id
    }

    pub const fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub const fn is_matched(&self) -> bool {
        self.is_matched
    }

    /// Face up but not yet part of a matched pair.
    pub const fn is_pending(&self) -> bool {
        self.is_flipped && !self.is_matched
    }

    pub(crate) fn flip_up(&mut self) {
        self.is_flipped = true;
    }

    pub(crate) fn flip_down(&mut self) {
        if !self.is_matched {
            self.is_flipped = false;
        }
    }

    pub(crate) fn mark_matched(&mut self) {
        self.is_matched = true;
        self.is_flipped = true;
    }
}

/// Ordered card slots; index equals [`CardState::position`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cards: Vec<CardState>,
}

impl Board {
    /// Lays out face-down cards, one per entry of `symbol_order`.
    pub fn from_symbols(symbol_order: &[SymbolId]) -> Self {
        let cards = symbol_order
            .iter()
            .enumerate()
            .map(|(position, &symbol_id)| CardState::face_down(position, symbol_id))
            .collect();
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, position: Position) -> Option<&CardState> {
        self.cards.get(position)
    }

    pub(crate) fn card_mut(&mut self, position: Position) -> Option<&mut CardState> {
        self.cards.get_mut(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardState> {
        self.cards.iter()
    }

    pub fn symbol_order(&self) -> Vec<SymbolId> {
        self.cards.iter().map(CardState::symbol_id).collect()
    }

    pub fn matched_positions(&self) -> BTreeSet<Position> {
        self.cards
            .iter()
            .filter(|card| card.is_matched())
            .map(CardState::position)
            .collect()
    }

    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_matched()).count()
    }

    /// True once every card is matched. An empty board counts as matched.
    pub fn all_matched(&self) -> bool {
        self.cards.iter().all(CardState::is_matched)
    }

    /// Checks that every symbol on the board appears exactly twice.
    pub fn check_pairing(&self) -> core::result::Result<(), CorruptionKind> {
        let mut counts: BTreeMap<SymbolId, u8> = BTreeMap::new();
        for card in &self.cards {
            let count = counts.entry(card.symbol_id).or_default();
            *count = count.saturating_add(1);
        }

        if counts.values().all(|&count| count == 2) {
            Ok(())
        } else {
            Err(CorruptionKind::UnpairedSymbol)
        }
    }

    /// Position of the other card carrying the same symbol as `position`.
    pub fn partner_of(&self, position: Position) -> Option<Position> {
        let symbol_id = self.card(position)?.symbol_id;
        self.cards
            .iter()
            .find(|card| card.position != position && card.symbol_id == symbol_id)
            .map(CardState::position)
    }
}

impl Index<Position> for Board {
    type Output = CardState;

    fn index(&self, position: Position) -> &Self::Output {
        &self.cards[position]
    }
}
