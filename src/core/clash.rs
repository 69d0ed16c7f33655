//! Clash records.
//!
//! A `ClashContext` exists from a successful attack until the exchange
//! resolves. A passed defense is the state `defending_card == None` with
//! `defense_style == None`.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::cards::Card;

/// How the attacker presents the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackStyle {
    Friendly,
    Harsh,
}

impl AttackStyle {
    pub const ALL: [AttackStyle; 2] = [AttackStyle::Friendly, AttackStyle::Harsh];

    /// Extra TP on top of the card cost.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            AttackStyle::Friendly => 0,
            AttackStyle::Harsh => 1,
        }
    }
}

/// How the defender answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefenseStyle {
    Agree,
    Disagree,
}

impl DefenseStyle {
    pub const ALL: [DefenseStyle; 2] = [DefenseStyle::Agree, DefenseStyle::Disagree];

    /// Extra TP on top of the card cost.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            DefenseStyle::Agree => 0,
            DefenseStyle::Disagree => 1,
        }
    }
}

/// Final strengths of both sides of a clash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClashStrengths {
    pub attacker: i64,
    pub defender: i64,
}

impl ClashStrengths {
    /// Attacker strength minus defender strength.
    #[must_use]
    pub const fn diff(self) -> i64 {
        self.attacker - self.defender
    }
}

/// The single open attack-and-response exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClashContext {
    pub attacker: PlayerId,
    pub attacking_card: Card,
    pub attack_style: AttackStyle,

    pub defender: PlayerId,
    pub defending_card: Option<Card>,
    pub defense_style: Option<DefenseStyle>,

    /// Set once the clash is scored.
    pub strengths: Option<ClashStrengths>,

    /// The attacking card was played under "next card matches any tag".
    pub attacker_wildcard: bool,
    /// The defending card was played under "next card matches any tag".
    pub defender_wildcard: bool,
}

impl ClashContext {
    /// Open a clash for an attack.
    #[must_use]
    pub fn open(attacker: PlayerId, attacking_card: Card, attack_style: AttackStyle) -> Self {
        Self {
            attacker,
            attacking_card,
            attack_style,
            defender: attacker.opponent(),
            defending_card: None,
            defense_style: None,
            strengths: None,
            attacker_wildcard: false,
            defender_wildcard: false,
        }
    }

    /// Record the defender's response.
    pub fn respond(&mut self, card: Card, style: DefenseStyle) {
        self.defending_card = Some(card);
        self.defense_style = Some(style);
    }

    /// Check whether the defender passed (or has not answered yet).
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.defending_card.is_none()
    }
}
