/*!
 * Core Types
 * Identifiers and value types shared by both coordinators
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a room inside the admission coordinator
pub type RoomId = usize;

/// Identifier of an arrival worker
pub type ArrivalId = usize;

/// Sequence number stamped on every pair placed in the slot
pub type Ticket = u64;

/// Item identity; each consumer owns exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ingredient {
    Noodles,
    Water,
    Seeds,
}

impl Ingredient {
    /// Every identity, in index order
    pub const ALL: [Ingredient; 3] = [Ingredient::Noodles, Ingredient::Water, Ingredient::Seeds];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Ingredient::Noodles => 0,
            Ingredient::Water => 1,
            Ingredient::Seeds => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Ingredient::Noodles => "noodles",
            Ingredient::Water => "water",
            Ingredient::Seeds => "seeds",
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Two distinct ingredients placed together in the slot
///
/// With three identities, a pair of two distinct ingredients leaves exactly
/// one identity out; that consumer is the only one able to claim it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemPair {
    first: Ingredient,
    second: Ingredient,
}

impl ItemPair {
    /// Returns `None` when both items are the same ingredient
    pub fn new(first: Ingredient, second: Ingredient) -> Option<Self> {
        (first != second).then_some(Self { first, second })
    }

    #[inline]
    pub fn first(&self) -> Ingredient {
        self.first
    }

    #[inline]
    pub fn second(&self) -> Ingredient {
        self.second
    }

    #[inline]
    pub fn contains(&self, ingredient: Ingredient) -> bool {
        self.first == ingredient || self.second == ingredient
    }

    /// The single identity that appears in neither position
    pub fn claimant(&self) -> Ingredient {
        let missing = 3 - self.first.index() - self.second.index();
        Ingredient::ALL[missing]
    }

    /// Whether a consumer holding `identity` can use this pair
    #[inline]
    pub fn is_usable_by(&self, identity: Ingredient) -> bool {
        !self.contains(identity)
    }
}

impl fmt::Display for ItemPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// Lifecycle stage of a room: Open -> InSession -> Closed, never reopened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Open,
    InSession,
    Closed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Open => "open",
            Phase::InSession => "in_session",
            Phase::Closed => "closed",
        };
        f.write_str(s)
    }
}
