use std::fmt::Write;

use pairs_core::{CardState, GameEvent, MatchEngine, SymbolId};

pub const DEFAULT_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn label(labels: &[char], symbol_id: SymbolId) -> char {
    usize::try_from(symbol_id)
        .ok()
        .and_then(|index| labels.get(index))
        .copied()
        .unwrap_or('?')
}

fn cell(card: &CardState, labels: &[char]) -> String {
    let face = label(labels, card.symbol_id());
    if card.is_matched() {
        format!("({face} )")
    } else if card.is_flipped() {
        format!("<{face} >")
    } else {
        format!("[{:>2}]", card.position() + 1)
    }
}

/// Draws the board `cols` cards per row, followed by the score line.
pub fn render_board(engine: &MatchEngine, cols: u8, labels: &[char]) -> String {
    let mut out = String::new();
    let cards: Vec<&CardState> = engine.board().iter().collect();

    for row in cards.chunks(usize::from(cols.max(1))) {
        let cells: Vec<String> = row.iter().map(|card| cell(card, labels)).collect();
        let _ = writeln!(out, "{}", cells.join(" "));
    }
    let _ = write!(out, "Score: {}  Combo: x{}", engine.score(), engine.combo());
    out
}

/// Text shown to the player for an event, if any.
pub fn describe(event: &GameEvent) -> Option<String> {
    match *event {
        GameEvent::Matched { bonus, combo, .. } => {
            Some(format!("Match! +{bonus} points, combo x{combo}"))
        }
        GameEvent::Mismatch { .. } => Some("No match.".to_string()),
        GameEvent::Won { score } => Some(format!("All pairs found! Final score: {score}")),
        GameEvent::Flipped { .. } | GameEvent::FlippedBack { .. } => None,
    }
}
