//! Victory rules.
//!
//! Checks run in a fixed order and the first satisfied one decides:
//! 1. A's reputation at or below 0: B wins
//! 2. B's reputation at or below 0: A wins
//! 3. topic bias at or above the limit: A wins
//! 4. topic bias at or below minus the limit: B wins

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap, PlayerState};

/// Result of a completed battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }

    /// The winner, if any.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            GameResult::Winner(p) => Some(*p),
            GameResult::Draw => None,
        }
    }
}

/// Why the battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VictoryReason {
    /// The loser's reputation reached 0.
    Reputation,
    /// The topic bias reached a bound.
    TopicBias,
    /// Judged on reputation after the last turn.
    FinalDecision,
}

/// Recorded end of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameOutcome {
    pub result: GameResult,
    pub reason: VictoryReason,
}

impl GameOutcome {
    #[must_use]
    pub const fn new(result: GameResult, reason: VictoryReason) -> Self {
        Self { result, reason }
    }
}

/// Evaluate the victory conditions.
///
/// ```
/// use debate_clash::core::{PlayerId, PlayerMap, PlayerState};
/// use debate_clash::rules::{check_victory, GameResult, VictoryReason};
///
/// let mut players = PlayerMap::new(|_| PlayerState::new(30));
/// players[PlayerId::B].reputation = 0;
///
/// let outcome = check_victory(&players, 0, 10).unwrap();
/// assert_eq!(outcome.result, GameResult::Winner(PlayerId::A));
/// assert_eq!(outcome.reason, VictoryReason::Reputation);
/// ```
#[must_use]
pub fn check_victory(
    players: &PlayerMap<PlayerState>,
    topic_bias: i64,
    bias_limit: i64,
) -> Option<GameOutcome> {
    if players[PlayerId::A].reputation <= 0 {
        return Some(GameOutcome::new(
            GameResult::Winner(PlayerId::B),
            VictoryReason::Reputation,
        ));
    }
    if players[PlayerId::B].reputation <= 0 {
        return Some(GameOutcome::new(
            GameResult::Winner(PlayerId::A),
            VictoryReason::Reputation,
        ));
    }
    if topic_bias >= bias_limit {
        return Some(GameOutcome::new(
            GameResult::Winner(PlayerId::A),
            VictoryReason::TopicBias,
        ));
    }
    if topic_bias <= -bias_limit {
        return Some(GameOutcome::new(
            GameResult::Winner(PlayerId::B),
            VictoryReason::TopicBias,
        ));
    }
    None
}

/// Judge the battle on reputation: higher wins, equal is a draw.
#[must_use]
pub fn judge_final(players: &PlayerMap<PlayerState>) -> GameOutcome {
    let a = players[PlayerId::A].reputation;
    let b = players[PlayerId::B].reputation;
    let result = match a.cmp(&b) {
        std::cmp::Ordering::Greater => GameResult::Winner(PlayerId::A),
        std::cmp::Ordering::Less => GameResult::Winner(PlayerId::B),
        std::cmp::Ordering::Equal => GameResult::Draw,
    };
    GameOutcome::new(result, VictoryReason::FinalDecision)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(a: i64, b: i64) -> PlayerMap<PlayerState> {
        PlayerMap::new(|p| PlayerState::new(if p == PlayerId::A { a } else { b }))
    }

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::B);
        assert!(!result.is_winner(PlayerId::A));
        assert!(result.is_winner(PlayerId::B));
        assert_eq!(result.winner(), Some(PlayerId::B));

        let draw = GameResult::Draw;
        assert!(!draw.is_winner(PlayerId::A));
        assert_eq!(draw.winner(), None);
    }

    #[test]
    fn test_no_victory() {
        assert_eq!(check_victory(&players(30, 30), 9, 10), None);
        assert_eq!(check_victory(&players(1, 1), -9, 10), None);
    }

    #[test]
    fn test_check_order() {
        // Both sides depleted: A's check comes first.
        let outcome = check_victory(&players(0, -3), 10, 10).unwrap();
        assert_eq!(outcome.result, GameResult::Winner(PlayerId::B));
        assert_eq!(outcome.reason, VictoryReason::Reputation);

        // Reputation beats bias.
        let outcome = check_victory(&players(5, 0), -10, 10).unwrap();
        assert_eq!(outcome.result, GameResult::Winner(PlayerId::A));

        let outcome = check_victory(&players(5, 5), -10, 10).unwrap();
        assert_eq!(outcome, GameOutcome::new(GameResult::Winner(PlayerId::B), VictoryReason::TopicBias));
    }

    #[test]
    fn test_judge_final() {
        assert_eq!(judge_final(&players(14, 14)).result, GameResult::Draw);
        assert_eq!(judge_final(&players(15, 14)).result, GameResult::Winner(PlayerId::A));
        assert_eq!(judge_final(&players(2, 20)).result, GameResult::Winner(PlayerId::B));
        assert_eq!(judge_final(&players(2, 20)).reason, VictoryReason::FinalDecision);
    }
}
