//! Caught-creature collection and catch rolls
//!
//! The Pokedex lives only in process memory; nothing is persisted between runs.

use chrono::{DateTime, Local};
use rand::Rng;
use std::collections::HashMap;

use crate::data::Creature;

/// A roll below this value catches the creature
pub const CATCH_THRESHOLD: u32 = 50;

/// A creature in the Pokedex along with when it was caught
#[derive(Debug, Clone)]
pub struct CaughtCreature {
    pub creature: Creature,
    pub caught_at: DateTime<Local>,
}

/// Creatures caught during this session, keyed by name
#[derive(Debug, Default)]
pub struct Pokedex {
    caught: HashMap<String, CaughtCreature>,
}

impl Pokedex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a creature, replacing any earlier catch with the same name
    pub fn record(&mut self, creature: Creature) {
        let entry = CaughtCreature {
            creature,
            caught_at: Local::now(),
        };
        self.caught.insert(entry.creature.name.clone(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&CaughtCreature> {
        self.caught.get(name)
    }

    pub fn len(&self) -> usize {
        self.caught.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caught.is_empty()
    }

    /// All caught creatures sorted by name
    pub fn sorted(&self) -> Vec<&CaughtCreature> {
        let mut entries: Vec<_> = self.caught.values().collect();
        entries.sort_by(|a, b| a.creature.name.cmp(&b.creature.name));
        entries
    }
}

/// Rolls against a creature's base experience
///
/// The roll is uniform in `0..base_experience`, so creatures with more base
/// experience are harder to catch. Creatures at or below `CATCH_THRESHOLD`
/// are always caught.
pub fn roll_catch<R: Rng + ?Sized>(rng: &mut R, creature: &Creature) -> u32 {
    let ceiling = creature.base_experience.unwrap_or(0).max(1);
    rng.gen_range(0..ceiling)
}

/// Whether a roll catches the creature
pub fn is_caught(roll: u32) -> bool {
    roll < CATCH_THRESHOLD
}
