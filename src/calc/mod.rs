//! Pure calculators: final card strength and clash rewards.

mod reward;
mod strength;

pub use reward::{
    calculate_rewards, reputation_delta, reward_entry, RewardEntry, Rewards, StrengthCategory,
};
pub use strength::{StrengthBreakdown, StrengthCalculator};
