/*!
 * Pair Sources
 * Where the producer gets its next pair from
 */

use crate::core::types::{Ingredient, ItemPair};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies the pairs the producer places in the slot
pub trait PairSource: Send {
    fn next_pair(&mut self) -> ItemPair;
}

/// Two distinct ingredients drawn uniformly at random
pub struct RandomPairs {
    rng: StdRng,
}

impl RandomPairs {
    /// Seeded for reproducible runs, or from OS entropy when `seed` is `None`
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    fn draw(&mut self) -> Ingredient {
        Ingredient::ALL[self.rng.gen_range(0..Ingredient::ALL.len())]
    }
}

impl PairSource for RandomPairs {
    fn next_pair(&mut self) -> ItemPair {
        let first = self.draw();
        loop {
            if let Some(pair) = ItemPair::new(first, self.draw()) {
                return pair;
            }
        }
    }
}

/// Replays a fixed list of pairs, cycling when it runs out
pub struct ScriptedPairs {
    pairs: Vec<ItemPair>,
    next: usize,
}

impl ScriptedPairs {
    /// Returns `None` for an empty script
    pub fn new(pairs: Vec<ItemPair>) -> Option<Self> {
        (!pairs.is_empty()).then_some(Self { pairs, next: 0 })
    }
}

impl PairSource for ScriptedPairs {
    fn next_pair(&mut self) -> ItemPair {
        let pair = self.pairs[self.next % self.pairs.len()];
        self.next += 1;
        pair
    }
}
