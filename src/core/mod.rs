//! Core battle types: players, configuration, state, clash records, RNG,
//! errors.

pub mod clash;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use clash::{AttackStyle, ClashContext, ClashStrengths, DefenseStyle};
pub use config::{BattleConfig, PacingConfig};
pub use error::{ActionError, BattleError, BattleResult, ClashError, DataError};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use state::{DrawOutcome, GameState, Phase, PlayerState};
