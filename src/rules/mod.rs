//! Battle rules: victory conditions, results and the action vocabulary.

pub mod action;
pub mod victory;

pub use action::{ActionRecord, BattleAction};
pub use victory::{check_victory, judge_final, GameOutcome, GameResult, VictoryReason};
