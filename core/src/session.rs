use alloc::string::{String, ToString};
use alloc::vec::Vec;
use rand::Rng;

use crate::*;

/// Storage slot used when the host does not pick one.
pub const DEFAULT_SAVE_KEY: &str = "pairs_save";

/// A [`MatchEngine`] wired to a durable slot: restores on start, saves after every
/// resolved pair and clears the slot once the game is won.
#[derive(Debug)]
pub struct GameSession<S> {
    config: GameConfig,
    symbol_pool: Vec<SymbolId>,
    engine: MatchEngine,
    store: S,
    save_key: String,
    resumed: bool,
}

impl<S: KeyValueStore> GameSession<S> {
    pub fn start<R: Rng + ?Sized>(
        config: GameConfig,
        symbol_pool: Vec<SymbolId>,
        store: S,
        rng: &mut R,
    ) -> Result<Self> {
        Self::start_with_key(config, symbol_pool, store, DEFAULT_SAVE_KEY, rng)
    }

    /// Deals a fresh board, then resumes from the slot at `save_key` if it holds a
    /// usable record. A corrupt record is deleted and the fresh board kept.
    pub fn start_with_key<R: Rng + ?Sized>(
        config: GameConfig,
        symbol_pool: Vec<SymbolId>,
        mut store: S,
        save_key: &str,
        rng: &mut R,
    ) -> Result<Self> {
        let board = deal(&config, &symbol_pool, rng);
        let mut engine = MatchEngine::new(board, &config);

        let resumed = match store.read(save_key)? {
            None => false,
            Some(json) => {
                match SaveRecord::from_json(&json).and_then(|record| engine.load(&record, &symbol_pool)) {
                    Ok(()) => true,
                    Err(GameError::CorruptSaveData(kind)) => {
                        log::warn!("Discarding saved game ({}), starting fresh", kind);
                        store.delete(save_key)?;
                        false
                    }
                    Err(err) => return Err(err),
                }
            }
        };

        Ok(Self {
            config,
            symbol_pool,
            engine,
            store,
            save_key: save_key.to_string(),
            resumed,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn symbol_pool(&self) -> &[SymbolId] {
        &self.symbol_pool
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save_key(&self) -> &str {
        &self.save_key
    }

    /// Whether the current game was restored from the slot rather than freshly dealt.
    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    /// Selects a card, autosaving once a pair resolves.
    ///
    /// A failed autosave is logged and does not undo the outcome.
    pub fn select(&mut self, position: Position) -> Result<SelectionOutcome> {
        let outcome = self.engine.select(position)?;

        if outcome.is_resolved() {
            let persisted = if self.engine.state().is_finished() {
                self.clear()
            } else {
                self.persist()
            };
            if let Err(err) = persisted {
                log::error!("Autosave failed: {}", err);
            }
        }

        Ok(outcome)
    }

    pub fn apply_flip_back(&mut self, flip_back: &FlipBack) -> Result<()> {
        self.engine.apply_flip_back(flip_back)
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.engine.drain_events()
    }

    /// Abandons the current game and deals a new one with score and combo reset.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.store.delete(&self.save_key)?;
        let board = deal(&self.config, &self.symbol_pool, rng);
        self.engine = MatchEngine::new(board, &self.config);
        self.resumed = false;
        log::info!("Started a new game with {} cards", self.engine.board().len());
        Ok(())
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) -> Result<()> {
        let json = self.engine.save().to_json()?;
        self.store.write(&self.save_key, &json)?;
        log::trace!("Saved game to {}", self.save_key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.store.delete(&self.save_key)?;
        log::debug!("Cleared saved game {}", self.save_key);
        Ok(())
    }
}
