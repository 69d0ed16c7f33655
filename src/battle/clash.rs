//! The clash protocol: attack, defense or pass, then resolution.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::notify::Severity;
use super::pacing::PacingStep;
use super::session::{Battle, Injections};
use crate::calc::{calculate_rewards, Rewards};
use crate::cards::{BattleEvent, CardId, CardMatch};
use crate::core::{
    ActionError, AttackStyle, BattleResult, ClashContext, ClashError, ClashStrengths,
    DefenseStyle, Phase, PlayerId,
};
use crate::rules::GameOutcome;
use crate::skills::Role;

/// What a resolved clash did.
///
/// `strengths` and `rewards` are `None` when the battle ended before the
/// clash was scored (a passive reached a victory condition first).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClashOutcome {
    pub attacker: PlayerId,
    pub attack_style: AttackStyle,
    /// `None` for a passed defense.
    pub defense_style: Option<DefenseStyle>,
    pub card_match: CardMatch,
    pub strengths: Option<ClashStrengths>,
    pub rewards: Option<Rewards>,
    /// Set when this clash ended the battle.
    pub game_outcome: Option<GameOutcome>,
}

impl Battle {
    /// Validate an attack. Returns the TP it would cost.
    pub(crate) fn check_attack(
        &self,
        attacker: PlayerId,
        card: CardId,
        style: AttackStyle,
    ) -> Result<u32, ActionError> {
        self.ensure_acting(attacker)?;
        let state = &self.players[attacker];
        let card = state
            .find_in_hand(card)
            .ok_or(ActionError::CardNotInHand(card))?;
        if let Some(forced) = self.effects.forced_attack_style(attacker) {
            if forced != style {
                return Err(ActionError::StyleRestricted(style));
            }
        }
        let cost = self.effective_cost(attacker, card).saturating_add(style.cost());
        if state.tp < cost {
            return Err(ActionError::InsufficientTp {
                needed: cost,
                available: state.tp,
            });
        }
        Ok(cost)
    }

    /// Validate a defense. Returns the TP it would cost.
    pub(crate) fn check_defense(
        &self,
        defender: PlayerId,
        card: CardId,
        style: DefenseStyle,
    ) -> Result<u32, ActionError> {
        self.ensure_phase(Phase::Defense)?;
        let clash = self
            .clash
            .as_ref()
            .ok_or(ActionError::WrongPhase {
                expected: Phase::Defense,
                actual: self.state.phase,
            })?;
        if defender != clash.defender {
            return Err(ActionError::NotYourTurn(defender));
        }
        let state = &self.players[defender];
        let card = state
            .find_in_hand(card)
            .ok_or(ActionError::CardNotInHand(card))?;
        let cost = self.effective_cost(defender, card).saturating_add(style.cost());
        if state.tp < cost {
            return Err(ActionError::InsufficientTp {
                needed: cost,
                available: state.tp,
            });
        }
        Ok(cost)
    }

    /// Attack with a card from `attacker`'s hand.
    ///
    /// Costs the card's effective cost plus one TP for `Harsh`. On success
    /// the card is discarded, a clash opens and the battle waits in the
    /// `Defense` phase.
    pub fn initiate_clash(
        &mut self,
        attacker: PlayerId,
        card: CardId,
        style: AttackStyle,
    ) -> BattleResult<()> {
        let cost = self
            .check_attack(attacker, card, style)
            .or_else(|e| self.reject(e))?;

        let state = &mut self.players[attacker];
        let Some(played) = state.discard_from_hand(card) else {
            return self.reject(ActionError::CardNotInHand(card));
        };
        state.spend_tp(cost);
        let wildcard = std::mem::take(&mut state.next_card_any_type);

        let mut clash = ClashContext::open(attacker, played.clone(), style);
        clash.attacker_wildcard = wildcard;
        self.clash = Some(clash.clone());
        self.state.phase = Phase::Defense;

        info!(%attacker, card = %played.id, ?style, cost, "clash initiated");
        self.notify(
            Severity::Info,
            format!("{attacker} attacks with {} ({style:?})", played.name),
        );

        self.run_triggered(
            attacker,
            Role::Attacker,
            BattleEvent::OnPlay,
            Some(&played),
            Some(&clash),
        );
        if self.check_victory_conditions() {
            return Ok(());
        }
        self.pacer.schedule(PacingStep::AwaitDefense);
        Ok(())
    }

    /// Defend the open clash with a card from `defender`'s hand and resolve it.
    ///
    /// Costs the card's effective cost plus one TP for `Disagree`.
    pub fn respond_to_clash(
        &mut self,
        defender: PlayerId,
        card: CardId,
        style: DefenseStyle,
    ) -> BattleResult<ClashOutcome> {
        let cost = self
            .check_defense(defender, card, style)
            .or_else(|e| self.reject(e))?;

        let state = &mut self.players[defender];
        let Some(played) = state.discard_from_hand(card) else {
            return self.reject(ActionError::CardNotInHand(card));
        };
        state.spend_tp(cost);
        let wildcard = std::mem::take(&mut state.next_card_any_type);

        info!(%defender, card = %played.id, ?style, cost, "clash answered");
        self.notify(
            Severity::Info,
            format!("{defender} defends with {} ({style:?})", played.name),
        );

        let Some(clash) = self.clash.as_mut() else {
            return Err(ClashError::NoOpenClash.into());
        };
        clash.respond(played.clone(), style);
        clash.defender_wildcard = wildcard;

        let clash = clash.clone();
        self.run_triggered(
            defender,
            Role::Defender,
            BattleEvent::OnPlay,
            Some(&played),
            Some(&clash),
        );
        self.resolve(clash)
    }

    /// Decline to defend and resolve the open clash.
    ///
    /// Scores as `Agree` against a defender strength of 0.
    pub fn pass_defense(&mut self) -> BattleResult<ClashOutcome> {
        if let Err(err) = self.ensure_phase(Phase::Defense) {
            return self.reject(err);
        }
        let Some(clash) = self.clash.clone() else {
            return Err(ClashError::NoOpenClash.into());
        };
        let defender = clash.defender;
        debug!(%defender, "defense passed");
        self.notify(Severity::Info, format!("{defender} passes"));
        self.resolve(clash)
    }

    /// Score `clash` and close it.
    ///
    /// Takes the clash by value since an on-play passive may already have
    /// ended the battle and cleared the open clash.
    fn resolve(&mut self, mut clash: ClashContext) -> BattleResult<ClashOutcome> {
        let attacker = clash.attacker;
        let defender = clash.defender;

        let mut outcome = ClashOutcome {
            attacker,
            attack_style: clash.attack_style,
            defense_style: clash.defense_style,
            card_match: CardMatch::classify(&clash.attacking_card, clash.defending_card.as_ref()),
            strengths: None,
            rewards: None,
            game_outcome: None,
        };

        if !self.state.is_game_over() {
            let before = self.before_resolve(&clash);
            if !self.state.is_game_over() {
                let calculator = self.strength_calculator();
                let attack = calculator
                    .breakdown(&clash.attacking_card, attacker, clash.attacker_wildcard)
                    .total_with(before.attacker);
                let defense = match &clash.defending_card {
                    Some(card) => calculator
                        .breakdown(card, defender, clash.defender_wildcard)
                        .total_with(before.defender),
                    None => 0,
                };
                let strengths = ClashStrengths {
                    attacker: attack,
                    defender: defense,
                };
                clash.strengths = Some(strengths);
                outcome.strengths = Some(strengths);

                let rewards = calculate_rewards(&clash)?;
                self.apply_rewards(attacker, &rewards);
                outcome.rewards = Some(rewards);
                self.check_victory_conditions();

                if !self.state.is_game_over() {
                    self.run_triggered(
                        attacker,
                        Role::Attacker,
                        BattleEvent::AfterResolve,
                        Some(&clash.attacking_card),
                        Some(&clash),
                    );
                }
                if !self.state.is_game_over() {
                    self.run_triggered(
                        defender,
                        Role::Defender,
                        BattleEvent::AfterResolve,
                        clash.defending_card.as_ref(),
                        Some(&clash),
                    );
                }
            }
        }

        self.clash = None;
        if !self.state.is_game_over() {
            self.state.phase = Phase::Action;
            self.check_victory_conditions();
        }
        if self.state.is_game_over() {
            outcome.game_outcome = self.state.outcome;
        } else {
            self.pacer.schedule(PacingStep::Settle);
        }

        if let Some(rewards) = &outcome.rewards {
            info!(
                %attacker,
                category = ?rewards.category,
                attacker_reputation = rewards.attacker_reputation,
                defender_reputation = rewards.defender_reputation,
                topic_bias = self.state.topic_bias,
                "clash resolved"
            );
            self.notify(
                Severity::Info,
                format!(
                    "Clash resolved: {:?} ({attacker} {:+}, {defender} {:+})",
                    rewards.category, rewards.attacker_reputation, rewards.defender_reputation
                ),
            );
        }
        self.last_clash = Some(outcome.clone());
        Ok(outcome)
    }

    /// Before-resolve passives for both sides, attacker first.
    fn before_resolve(&mut self, clash: &ClashContext) -> Injections {
        let from_attacker = self.run_triggered(
            clash.attacker,
            Role::Attacker,
            BattleEvent::BeforeResolve,
            Some(&clash.attacking_card),
            Some(clash),
        );
        if self.state.is_game_over() {
            return from_attacker;
        }
        let from_defender = self.run_triggered(
            clash.defender,
            Role::Defender,
            BattleEvent::BeforeResolve,
            clash.defending_card.as_ref(),
            Some(clash),
        );
        Injections {
            attacker: from_attacker.attacker.saturating_add(from_defender.attacker),
            defender: from_attacker.defender.saturating_add(from_defender.defender),
        }
    }

    /// Both reputation deltas and the bias shift, then one victory check by
    /// the caller.
    fn apply_rewards(&mut self, attacker: PlayerId, rewards: &Rewards) {
        let defender = attacker.opponent();
        let a = &mut self.players[attacker];
        a.reputation = a.reputation.saturating_add(rewards.attacker_reputation);
        let d = &mut self.players[defender];
        d.reputation = d.reputation.saturating_add(rewards.defender_reputation);
        self.state
            .shift_topic_bias(rewards.topic_bias, self.config.topic_bias_limit);
    }
}
