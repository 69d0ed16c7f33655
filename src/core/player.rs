//! Player identification and per-side data storage.
//!
//! ## PlayerId
//!
//! The battle always has exactly two sides, `A` and `B`. Topic bias is
//! expressed from A's point of view: positive favors A, negative favors B.
//!
//! ## PlayerMap
//!
//! Per-side storage with O(1) access, indexable by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two sides in a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    /// The side that moves first. Positive topic bias favors A.
    A,
    /// The second side. Negative topic bias favors B.
    B,
}

impl PlayerId {
    /// Both sides in turn order.
    pub const BOTH: [PlayerId; 2] = [PlayerId::A, PlayerId::B];

    /// Get the raw side index (A = 0, B = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerId::A => 0,
            PlayerId::B => 1,
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            PlayerId::A => PlayerId::B,
            PlayerId::B => PlayerId::A,
        }
    }

    /// Sign that converts a bias amount "toward this side" into A-positive bias.
    ///
    /// ```
    /// use debate_clash::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::A.bias_sign(), 1);
    /// assert_eq!(PlayerId::B.bias_sign(), -1);
    /// ```
    #[must_use]
    pub const fn bias_sign(self) -> i64 {
        match self {
            PlayerId::A => 1,
            PlayerId::B => -1,
        }
    }

    /// This side's advantage under an A-positive topic bias.
    #[must_use]
    pub const fn bias_advantage(self, topic_bias: i64) -> i64 {
        topic_bias * self.bias_sign()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerId::A => write!(f, "Player A"),
            PlayerId::B => write!(f, "Player B"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use debate_clash::core::{PlayerId, PlayerMap};
///
/// let mut reputation: PlayerMap<i64> = PlayerMap::new(|_| 30);
/// reputation[PlayerId::B] -= 4;
///
/// assert_eq!(reputation[PlayerId::A], 30);
/// assert_eq!(reputation[PlayerId::B], 26);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::A), factory(PlayerId::B)],
        }
    }

    /// Create a new PlayerMap from A's and B's values.
    pub fn from_parts(a: T, b: T) -> Self {
        Self { data: [a, b] }
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::BOTH.into_iter().zip(self.data.iter())
    }

    /// Iterate over (PlayerId, &mut T) pairs in turn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        PlayerId::BOTH.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
