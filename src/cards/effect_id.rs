//! Stable effect identifiers.
//!
//! Authoring data names effects with free-form keys (`TPL_DRAW_1`,
//! `KYON_TSUKKOMI`, ...). They are resolved to an `EffectId` once, at
//! data-load time, and the dispatcher is keyed by the enum.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::DataError;

/// Identifier of a skill effect handler or aura rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectId {
    /// Draw one card.
    Draw1,
    /// Gain 1 TP.
    GainTp1,
    /// Gain 2 TP.
    GainTp2,
    /// +1 strength for the acting role before resolution.
    StrengthPlus1,
    /// +2 strength for the acting role before resolution.
    StrengthPlus2,
    /// The next played card matches any tag.
    NextCardAnyType,
    /// Halve the opponent's bias advantage, rounded down.
    BiasHalveOpponent,
    /// One bias point toward the acting side after resolution.
    TopicBiasPlus1,
    /// Turn start: when not ahead on bias, 50% chance of 1 TP.
    HaruhiCommand,
    /// Aura: +1 to own cards sharing a tag with the active character.
    GenreExpert,
    /// Aura: +1 to own slice-of-life cards.
    SliceOfLifeBoost,
}

impl EffectId {
    /// Every effect id, in declaration order.
    pub const ALL: [EffectId; 11] = [
        EffectId::Draw1,
        EffectId::GainTp1,
        EffectId::GainTp2,
        EffectId::StrengthPlus1,
        EffectId::StrengthPlus2,
        EffectId::NextCardAnyType,
        EffectId::BiasHalveOpponent,
        EffectId::TopicBiasPlus1,
        EffectId::HaruhiCommand,
        EffectId::GenreExpert,
        EffectId::SliceOfLifeBoost,
    ];

    /// Canonical authoring key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EffectId::Draw1 => "DRAW_1",
            EffectId::GainTp1 => "GAIN_TP_1",
            EffectId::GainTp2 => "GAIN_TP_2",
            EffectId::StrengthPlus1 => "STRENGTH_PLUS_1",
            EffectId::StrengthPlus2 => "STRENGTH_PLUS_2",
            EffectId::NextCardAnyType => "NEXT_CARD_ANY_TYPE",
            EffectId::BiasHalveOpponent => "BIAS_HALVE_OPP",
            EffectId::TopicBiasPlus1 => "TOPIC_BIAS_PLUS_1",
            EffectId::HaruhiCommand => "HARUHI_COMMAND",
            EffectId::GenreExpert => "GENRE_EXPERT",
            EffectId::SliceOfLifeBoost => "SLICE_OF_LIFE_BOOST",
        }
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectId {
    type Err = DataError;

    /// Resolve an authoring key. Keys are case-insensitive and accept `-` or
    /// spaces in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        let id = match key.as_str() {
            "DRAW_1" | "TPL_DRAW_1" => EffectId::Draw1,
            "GAIN_TP_1" => EffectId::GainTp1,
            "GAIN_TP_2" | "TPL_GAIN_TP_2" => EffectId::GainTp2,
            "STRENGTH_PLUS_1" => EffectId::StrengthPlus1,
            "STRENGTH_PLUS_2" => EffectId::StrengthPlus2,
            "NEXT_CARD_ANY_TYPE" => EffectId::NextCardAnyType,
            "BIAS_HALVE_OPP" | "KYON_TSUKKOMI" => EffectId::BiasHalveOpponent,
            "TOPIC_BIAS_PLUS_1" => EffectId::TopicBiasPlus1,
            "HARUHI_COMMAND" | "HARUHI_AURA" => EffectId::HaruhiCommand,
            "GENRE_EXPERT" | "AURA_GENRE_EXPERT" => EffectId::GenreExpert,
            "SLICE_OF_LIFE_BOOST" | "KONATA_LUCKY" => EffectId::SliceOfLifeBoost,
            _ => return Err(DataError::UnknownEffect(s.to_string())),
        };
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_keys_resolve() {
        for id in EffectId::ALL {
            assert_eq!(id.as_str().parse::<EffectId>().unwrap(), id);
        }
    }

    #[test]
    fn test_authoring_aliases() {
        assert_eq!("TPL_DRAW_1".parse::<EffectId>().unwrap(), EffectId::Draw1);
        assert_eq!("kyon-tsukkomi".parse::<EffectId>().unwrap(), EffectId::BiasHalveOpponent);
        assert_eq!("HARUHI_AURA".parse::<EffectId>().unwrap(), EffectId::HaruhiCommand);
        assert_eq!("KONATA_LUCKY".parse::<EffectId>().unwrap(), EffectId::SliceOfLifeBoost);
    }

    #[test]
    fn test_unknown_key() {
        let err = "PASSIVE_PLACEHOLDER".parse::<EffectId>().unwrap_err();
        assert_eq!(err, DataError::UnknownEffect("PASSIVE_PLACEHOLDER".to_string()));
    }
}
