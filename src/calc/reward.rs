//! Reward calculation.
//!
//! A fixed table keyed by attack style, defense style and the category of
//! the strength difference. A passed defense scores as `Agree` against
//! strength 0.

use serde::{Deserialize, Serialize};

use crate::core::{AttackStyle, ClashContext, ClashError, DefenseStyle, PlayerId};

/// Category of `attacker strength - defender strength`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrengthCategory {
    /// diff >= 5
    AttackerCrush,
    /// 1 <= diff <= 4
    AttackerAdvantage,
    /// diff == 0
    Draw,
    /// -4 <= diff <= -1
    DefenderAdvantage,
    /// diff <= -5
    DefenderCrush,
}

impl StrengthCategory {
    /// Categorize a strength difference.
    ///
    /// ```
    /// use debate_clash::calc::StrengthCategory;
    ///
    /// assert_eq!(StrengthCategory::from_diff(5), StrengthCategory::AttackerCrush);
    /// assert_eq!(StrengthCategory::from_diff(-4), StrengthCategory::DefenderAdvantage);
    /// ```
    #[must_use]
    pub const fn from_diff(diff: i64) -> Self {
        match diff {
            i64::MIN..=-5 => StrengthCategory::DefenderCrush,
            -4..=-1 => StrengthCategory::DefenderAdvantage,
            0 => StrengthCategory::Draw,
            1..=4 => StrengthCategory::AttackerAdvantage,
            5..=i64::MAX => StrengthCategory::AttackerCrush,
        }
    }
}

/// One cell of the reward table, relative to the attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RewardEntry {
    pub attacker_reputation: i64,
    pub defender_reputation: i64,
    /// Bias points toward the attacker's side.
    pub bias_toward_attacker: i64,
}

const fn entry(attacker: i64, defender: i64, bias: i64) -> RewardEntry {
    RewardEntry {
        attacker_reputation: attacker,
        defender_reputation: defender,
        bias_toward_attacker: bias,
    }
}

/// Look up the reward table.
#[must_use]
pub const fn reward_entry(
    attack: AttackStyle,
    defense: DefenseStyle,
    category: StrengthCategory,
) -> RewardEntry {
    use AttackStyle::{Friendly, Harsh};
    use DefenseStyle::{Agree, Disagree};
    use StrengthCategory::*;

    match (attack, defense, category) {
        (Friendly, Agree, AttackerCrush) => entry(1, -4, 2),
        (Friendly, Agree, AttackerAdvantage) => entry(3, 0, 1),
        (Friendly, Agree, Draw) => entry(2, 1, 0),
        (Friendly, Agree, DefenderAdvantage) => entry(1, 1, 0),
        (Friendly, Agree, DefenderCrush) => entry(0, 2, 0),

        (Friendly, Disagree, AttackerCrush) => entry(2, -2, 1),
        (Friendly, Disagree, AttackerAdvantage) => entry(1, -1, 0),
        (Friendly, Disagree, Draw) => entry(0, 0, -1),
        (Friendly, Disagree, DefenderAdvantage) => entry(-1, 2, -1),
        (Friendly, Disagree, DefenderCrush) => entry(-3, 4, -2),

        (Harsh, Agree, AttackerCrush) => entry(2, -2, 3),
        (Harsh, Agree, AttackerAdvantage) => entry(1, -1, 2),
        (Harsh, Agree, Draw) => entry(1, 0, 1),
        (Harsh, Agree, DefenderAdvantage) => entry(-1, 1, 1),
        (Harsh, Agree, DefenderCrush) => entry(-2, 2, 0),

        (Harsh, Disagree, AttackerCrush) => entry(1, -3, 2),
        (Harsh, Disagree, AttackerAdvantage) => entry(0, -2, 1),
        (Harsh, Disagree, Draw) => entry(-1, 1, -2),
        (Harsh, Disagree, DefenderAdvantage) => entry(-2, 1, -3),
        (Harsh, Disagree, DefenderCrush) => entry(-5, 0, 1),
    }
}

/// Resource deltas of a resolved clash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    pub category: StrengthCategory,
    pub attacker_reputation: i64,
    pub defender_reputation: i64,
    /// A-positive bias delta.
    pub topic_bias: i64,
}

/// Rewards for a scored clash.
///
/// Fails when the clash has no strengths yet, or has a defending card but
/// no defense style.
pub fn calculate_rewards(clash: &ClashContext) -> Result<Rewards, ClashError> {
    let strengths = clash.strengths.ok_or(ClashError::Incomplete("strengths"))?;
    let defense = match (&clash.defending_card, clash.defense_style) {
        (Some(_), Some(style)) => style,
        (Some(_), None) => return Err(ClashError::Incomplete("defense style")),
        (None, _) => DefenseStyle::Agree,
    };
    let defender_strength = if clash.defending_card.is_some() {
        strengths.defender
    } else {
        0
    };

    let category = StrengthCategory::from_diff(strengths.attacker.saturating_sub(defender_strength));
    let cell = reward_entry(clash.attack_style, defense, category);
    Ok(Rewards {
        category,
        attacker_reputation: cell.attacker_reputation,
        defender_reputation: cell.defender_reputation,
        topic_bias: cell.bias_toward_attacker * clash.attacker.bias_sign(),
    })
}

/// Reputation delta for `player` under `rewards` of a clash `attacker` opened.
#[must_use]
pub fn reputation_delta(rewards: &Rewards, attacker: PlayerId, player: PlayerId) -> i64 {
    if player == attacker {
        rewards.attacker_reputation
    } else {
        rewards.defender_reputation
    }
}
