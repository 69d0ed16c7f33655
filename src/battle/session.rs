//! The battle session.
//!
//! `Battle` owns every piece of mutable battle state: the game state, both
//! player states, the persistent effect registry, the open clash and the
//! RNG. All mutation goes through its methods, which are split by concern:
//!
//! - `turn.rs`: initialization, turn start/end, victory, skills, rotation
//! - `clash.rs`: attack, defense, pass and resolution
//! - this file: construction, accessors, command/hook application, legal
//!   actions and the generic `apply_action`
//!
//! Rejected actions return `Err`, leave state untouched, and are reported
//! to the notification sink.

use std::collections::VecDeque;

use tracing::{debug, warn};

use super::clash::ClashOutcome;
use super::notify::{Notification, NotificationSink, Severity, TracingSink, HISTORY_LIMIT};
use super::pacing::{Pacer, PacingToken, ScheduledStep};
use crate::calc::StrengthCalculator;
use crate::cards::{BattleEvent, Card, EffectId, Skill, SkillId};
use crate::core::{
    ActionError, AttackStyle, BattleConfig, BattleResult, ClashContext, DefenseStyle, DrawOutcome,
    GameRng, GameState, Phase, PlayerId, PlayerMap, PlayerState,
};
use crate::effects::{
    BonusId, Duration, HookAction, HookFiring, PersistentEffect, PersistentEffectId,
    PersistentEffectRegistry, RestrictionData, RestrictionKind, TemporaryBonus,
};
use crate::rules::{ActionRecord, BattleAction};
use crate::skills::{EffectContext, Role, SkillCommand, SkillDispatcher};

/// Strength injected before resolution, per role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Injections {
    pub attacker: i64,
    pub defender: i64,
}

/// Write access to a battle's bonuses and restrictions.
///
/// Neither carries hooks, so inserting them needs no application step.
pub struct EffectsMut<'a> {
    registry: &'a mut PersistentEffectRegistry,
}

impl EffectsMut<'_> {
    pub fn add_temporary_bonus(&mut self, bonus: TemporaryBonus) -> BonusId {
        self.registry.add_temporary_bonus(bonus)
    }

    pub fn add_restriction(
        &mut self,
        player: PlayerId,
        kind: RestrictionKind,
        data: RestrictionData,
        duration: Duration,
    ) {
        self.registry.add_restriction(player, kind, data, duration);
    }

    pub fn add_tag_strength_bonus(
        &mut self,
        player: PlayerId,
        tag: &str,
        amount: i64,
        turns: u32,
    ) -> BonusId {
        self.registry.add_tag_strength_bonus(player, tag, amount, turns)
    }

    pub fn add_tag_cost_reduction(
        &mut self,
        player: PlayerId,
        tag: &str,
        amount: i64,
        turns: u32,
    ) -> BonusId {
        self.registry.add_tag_cost_reduction(player, tag, amount, turns)
    }

    pub fn add_skill_disable(&mut self, player: PlayerId, skill: Option<SkillId>, turns: u32) {
        self.registry.add_skill_disable(player, skill, turns);
    }

    pub fn add_forced_attack_style(&mut self, player: PlayerId, style: AttackStyle, turns: u32) {
        self.registry.add_forced_attack_style(player, style, turns);
    }
}

/// A two-player battle.
///
/// ## Example
///
/// ```
/// use debate_clash::battle::Battle;
/// use debate_clash::cards::{Card, CardId, Deck};
/// use debate_clash::core::{AttackStyle, BattleConfig, PacingConfig, Phase, PlayerId};
///
/// let deck = || Deck::new((1..=8).map(|i| Card::new(CardId::new(i), "Card", 1, 3)).collect(), vec![]);
/// let config = BattleConfig::default().without_shuffle().with_pacing(PacingConfig::immediate());
///
/// let mut battle = Battle::new(config);
/// battle.initialize_game(deck(), deck());
/// assert_eq!(battle.game_state().phase, Phase::Action);
///
/// battle.initiate_clash(PlayerId::A, CardId::new(1), AttackStyle::Friendly).unwrap();
/// let outcome = battle.pass_defense().unwrap();
/// assert!(outcome.rewards.is_some());
/// ```
pub struct Battle {
    pub(crate) config: BattleConfig,
    pub(crate) state: GameState,
    pub(crate) players: PlayerMap<PlayerState>,
    pub(crate) effects: PersistentEffectRegistry,
    pub(crate) dispatcher: SkillDispatcher,
    /// The single open clash.
    pub(crate) clash: Option<ClashContext>,
    pub(crate) last_clash: Option<ClashOutcome>,
    pub(crate) rng: GameRng,
    pub(crate) pacer: Pacer,
    sink: Box<dyn NotificationSink>,
    history: VecDeque<Notification>,
    actions: Vec<ActionRecord>,
}

impl Battle {
    /// Create a battle with the built-in skill handlers and a tracing sink.
    ///
    /// The battle is in `Phase::Setup` until `initialize_game`.
    #[must_use]
    pub fn new(config: BattleConfig) -> Self {
        Self {
            state: GameState::default(),
            players: PlayerMap::new(|_| PlayerState::new(config.initial_reputation)),
            effects: PersistentEffectRegistry::new(),
            dispatcher: SkillDispatcher::with_builtins(),
            clash: None,
            last_clash: None,
            rng: GameRng::new(config.seed),
            pacer: Pacer::new(config.pacing),
            sink: Box::new(TracingSink),
            history: VecDeque::new(),
            actions: Vec::new(),
            config,
        }
    }

    /// Replace the notification sink (builder pattern).
    #[must_use]
    pub fn with_sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Replace the skill dispatcher (builder pattern).
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: SkillDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    // === Read-only accessors ===

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    #[must_use]
    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<PlayerState> {
        &self.players
    }

    /// The open clash, if any.
    #[must_use]
    pub fn open_clash(&self) -> Option<&ClashContext> {
        self.clash.as_ref()
    }

    /// The most recently resolved clash.
    #[must_use]
    pub fn last_clash(&self) -> Option<&ClashOutcome> {
        self.last_clash.as_ref()
    }

    #[must_use]
    pub fn effects(&self) -> &PersistentEffectRegistry {
        &self.effects
    }

    /// Bonus and restriction insertion on the registry.
    ///
    /// Persistent effects carry hooks and go through
    /// `add_persistent_effect` and `remove_persistent_effect`.
    pub fn effects_mut(&mut self) -> EffectsMut<'_> {
        EffectsMut {
            registry: &mut self.effects,
        }
    }

    #[must_use]
    pub fn dispatcher(&self) -> &SkillDispatcher {
        &self.dispatcher
    }

    /// The dispatcher, for registering custom handlers.
    pub fn dispatcher_mut(&mut self) -> &mut SkillDispatcher {
        &mut self.dispatcher
    }

    /// Recent notifications, oldest first. At most `HISTORY_LIMIT` entries.
    pub fn history(&self) -> impl Iterator<Item = &Notification> {
        self.history.iter()
    }

    /// Actions applied through `apply_action`.
    #[must_use]
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    /// Pending pacing steps, oldest first.
    pub fn pending_pacing(&self) -> impl Iterator<Item = &ScheduledStep> {
        self.pacer.pending()
    }

    /// Take every pending pacing step.
    pub fn drain_pacing(&mut self) -> Vec<ScheduledStep> {
        self.pacer.drain()
    }

    /// Cancel a pending pacing step.
    pub fn cancel_pacing(&mut self, token: PacingToken) -> bool {
        self.pacer.cancel(token)
    }

    /// Final strength `card` would have if `owner` played it now.
    #[must_use]
    pub fn calculate_final_strength(&self, card: &Card, owner: PlayerId) -> i64 {
        let wildcard = self.players[owner].next_card_any_type;
        self.strength_calculator()
            .calculate_final_strength(card, owner, wildcard)
    }

    pub(crate) fn strength_calculator(&self) -> StrengthCalculator<'_> {
        StrengthCalculator::new(
            self.state.topic_bias,
            &self.players,
            self.dispatcher.auras(),
            &self.effects,
        )
    }

    /// TP cost of `card` for `player` after registry cost reductions.
    #[must_use]
    pub fn effective_cost(&self, player: PlayerId, card: &Card) -> u32 {
        let wildcard = self.players[player].next_card_any_type;
        let reduction = self.effects.get_cost_reduction(player, card, wildcard);
        let cost = i64::from(card.cost).saturating_sub(reduction).max(0);
        u32::try_from(cost).unwrap_or(u32::MAX)
    }

    // === Notifications ===

    pub(crate) fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        let notification = Notification {
            message: message.into(),
            severity,
            turn: self.state.turn,
        };
        self.sink.notify(&notification);
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(notification);
    }

    /// Report a rejected action and return it as an error.
    pub(crate) fn reject<T>(&mut self, err: ActionError) -> BattleResult<T> {
        debug!(%err, "action rejected");
        self.notify(Severity::Warning, err.to_string());
        Err(err.into())
    }

    // === Shared validation ===

    pub(crate) fn ensure_not_over(&self) -> Result<(), ActionError> {
        if self.state.is_game_over() {
            return Err(ActionError::GameOver);
        }
        Ok(())
    }

    pub(crate) fn ensure_phase(&self, expected: Phase) -> Result<(), ActionError> {
        self.ensure_not_over()?;
        if self.state.phase != expected {
            if expected == Phase::Action && self.state.phase == Phase::Defense {
                return Err(ActionError::ClashAlreadyOpen);
            }
            return Err(ActionError::WrongPhase {
                expected,
                actual: self.state.phase,
            });
        }
        Ok(())
    }

    /// Validate the active side acting in the `Action` phase.
    pub(crate) fn ensure_acting(&self, player: PlayerId) -> Result<(), ActionError> {
        self.ensure_phase(Phase::Action)?;
        if player != self.state.active_player {
            return Err(ActionError::NotYourTurn(player));
        }
        Ok(())
    }

    // === State mutation helpers ===

    pub(crate) fn draw_card(&mut self, player: PlayerId) -> DrawOutcome {
        let outcome = self.players[player].draw(self.config.max_hand_size);
        match outcome {
            DrawOutcome::Drawn(card) => debug!(%player, %card, "card drawn"),
            DrawOutcome::PileEmpty => warn!(%player, "draw skipped: draw pile empty"),
            DrawOutcome::HandFull => warn!(%player, "draw skipped: hand full"),
        }
        outcome
    }

    pub(crate) fn shift_bias_toward(&mut self, toward: PlayerId, amount: i64) {
        let applied = self
            .state
            .shift_topic_bias(amount.saturating_mul(toward.bias_sign()), self.config.topic_bias_limit);
        debug!(%toward, amount, applied, topic_bias = self.state.topic_bias, "topic bias shifted");
    }

    /// Add a persistent effect and apply its apply hooks.
    pub fn add_persistent_effect(&mut self, effect: PersistentEffect) -> PersistentEffectId {
        let (id, firings) = self.effects.add_effect(effect);
        self.apply_hook_firings(firings);
        id
    }

    /// Remove a persistent effect early and apply its expire hooks.
    ///
    /// Returns `false` when no such effect is stored.
    pub fn remove_persistent_effect(&mut self, id: PersistentEffectId) -> bool {
        let Some(firings) = self.effects.remove_effect(id) else {
            return false;
        };
        self.apply_hook_firings(firings);
        true
    }

    /// Apply hook actions in order, stopping once the battle is over.
    pub(crate) fn apply_hook_firings(&mut self, firings: Vec<HookFiring>) {
        for firing in firings {
            for action in firing.actions {
                if self.state.is_game_over() {
                    return;
                }
                debug!(effect = %firing.effect, phase = ?firing.phase, ?action, "hook action");
                match action {
                    HookAction::ModifyTp { player, amount } => {
                        let magnitude = u32::try_from(amount.unsigned_abs()).unwrap_or(u32::MAX);
                        if amount >= 0 {
                            self.players[player].gain_tp(magnitude);
                        } else {
                            self.players[player].lose_tp(magnitude);
                        }
                    }
                    HookAction::ModifyReputation { player, amount } => {
                        let state = &mut self.players[player];
                        state.reputation = state.reputation.saturating_add(amount);
                    }
                    HookAction::ShiftTopicBias { toward, amount } => {
                        self.shift_bias_toward(toward, amount);
                    }
                    HookAction::DrawCards { player, count } => {
                        for _ in 0..count {
                            self.draw_card(player);
                        }
                    }
                }
                self.check_victory_conditions();
            }
        }
    }

    /// Apply skill commands in order, stopping once the battle is over.
    pub(crate) fn apply_skill_commands(&mut self, commands: Vec<SkillCommand>) -> Injections {
        let mut injections = Injections::default();
        for command in commands {
            if self.state.is_game_over() {
                break;
            }
            match command {
                SkillCommand::DrawCards { player, count } => {
                    for _ in 0..count {
                        self.draw_card(player);
                    }
                }
                SkillCommand::GainTp { player, amount } => {
                    let gained = self.players[player].gain_tp(amount);
                    debug!(%player, amount, gained, "tp gained");
                }
                SkillCommand::GainBonusTp { player, amount } => {
                    self.players[player].gain_bonus_tp(amount);
                    debug!(%player, amount, tp = self.players[player].tp, "bonus tp gained");
                }
                SkillCommand::ShiftTopicBias { toward, amount } => {
                    self.shift_bias_toward(toward, amount);
                }
                SkillCommand::AddStrengthBonus { role, amount } => match role {
                    Role::Attacker => injections.attacker += amount,
                    Role::Defender => injections.defender += amount,
                },
                SkillCommand::GrantNextCardAnyType { player } => {
                    self.players[player].next_card_any_type = true;
                }
                SkillCommand::AddTemporaryBonus(bonus) => {
                    self.effects.add_temporary_bonus(bonus);
                }
                SkillCommand::AddRestriction {
                    player,
                    kind,
                    data,
                    duration,
                } => {
                    self.effects.add_restriction(player, kind, data, duration);
                }
            }
            self.check_victory_conditions();
        }
        injections
    }

    /// Passive skills of `player`'s active character reacting to `event`.
    pub(crate) fn triggered_passives(&self, player: PlayerId, event: BattleEvent) -> Vec<Skill> {
        self.players[player]
            .active_character()
            .map(|c| {
                c.passives()
                    .filter(|s| s.trigger == Some(event))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Run the effects reacting to `event` for `player` and apply what they
    /// queue: the played card's own effects first, then the active
    /// character's passives.
    pub(crate) fn run_triggered(
        &mut self,
        player: PlayerId,
        role: Role,
        event: BattleEvent,
        card: Option<&Card>,
        clash: Option<&ClashContext>,
    ) -> Injections {
        let card_effects: Vec<EffectId> = card
            .map(|c| c.effects_for(event).collect())
            .unwrap_or_default();
        let skills = self.triggered_passives(player, event);
        if card_effects.is_empty() && skills.is_empty() {
            return Injections::default();
        }

        let mut ctx = EffectContext::new(event, player, role, self.state.topic_bias, &mut self.rng);
        ctx.card = card;
        ctx.clash = clash;
        if let Some(card) = card {
            for effect in &card_effects {
                debug!(%player, card = %card.id, %effect, ?event, "card effect triggered");
                self.dispatcher.run_effect(*effect, &mut ctx);
            }
        }
        for skill in &skills {
            debug!(%player, skill = %skill.id, ?event, "passive triggered");
            self.dispatcher.run_effect(skill.effect, &mut ctx);
        }
        let commands = ctx.into_commands();
        self.apply_skill_commands(commands)
    }

    /// Run an active skill's effect and apply what it queues.
    pub(crate) fn run_active(&mut self, player: PlayerId, skill: &Skill) {
        let mut ctx = EffectContext::new(
            BattleEvent::Activate,
            player,
            Role::Attacker,
            self.state.topic_bias,
            &mut self.rng,
        );
        self.dispatcher.run_effect(skill.effect, &mut ctx);
        let commands = ctx.into_commands();
        self.apply_skill_commands(commands);
    }

    // === Legal actions ===

    /// Every action `player` may take now.
    ///
    /// Attacks and defenses are listed once per distinct card in hand.
    #[must_use]
    pub fn legal_actions(&self, player: PlayerId) -> Vec<BattleAction> {
        let mut actions = Vec::new();
        if self.state.is_game_over() {
            return actions;
        }

        let state = &self.players[player];
        let mut seen = Vec::new();
        let distinct_cards: Vec<&Card> = state
            .hand
            .iter()
            .filter(|c| {
                if seen.contains(&c.id) {
                    false
                } else {
                    seen.push(c.id);
                    true
                }
            })
            .collect();

        match self.state.phase {
            Phase::Action if player == self.state.active_player => {
                for card in &distinct_cards {
                    for style in AttackStyle::ALL {
                        if self.check_attack(player, card.id, style).is_ok() {
                            actions.push(BattleAction::Attack {
                                card: card.id,
                                style,
                            });
                        }
                    }
                }
                if let Some(character) = state.active_character() {
                    for skill in character.actives() {
                        if self.check_skill(player, &skill.id).is_ok() {
                            actions.push(BattleAction::UseSkill(skill.id.clone()));
                        }
                    }
                }
                for index in 0..state.characters.len() {
                    if index != state.active_character_index
                        && self.check_set_active(player, index).is_ok()
                    {
                        actions.push(BattleAction::SetActiveCharacter(index));
                    }
                }
                if self.check_flag_rotation(player).is_ok() && !state.needs_rotation {
                    actions.push(BattleAction::FlagRotation);
                }
                actions.push(BattleAction::EndTurn);
            }
            Phase::Defense
                if self.clash.as_ref().is_some_and(|c| c.defender == player) =>
            {
                for card in &distinct_cards {
                    for style in DefenseStyle::ALL {
                        if self.check_defense(player, card.id, style).is_ok() {
                            actions.push(BattleAction::Defend {
                                card: card.id,
                                style,
                            });
                        }
                    }
                }
                actions.push(BattleAction::PassDefense);
            }
            _ => {}
        }
        actions
    }

    /// Apply any action on behalf of `player`.
    ///
    /// Returns the clash outcome when the action resolved a clash.
    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: BattleAction,
    ) -> BattleResult<Option<ClashOutcome>> {
        let turn = self.state.turn;
        let outcome = match &action {
            BattleAction::Attack { card, style } => {
                self.initiate_clash(player, *card, *style)?;
                None
            }
            BattleAction::Defend { card, style } => {
                Some(self.respond_to_clash(player, *card, *style)?)
            }
            BattleAction::PassDefense => {
                if let Some(clash) = &self.clash {
                    if clash.defender != player {
                        return self.reject(ActionError::NotYourTurn(player));
                    }
                }
                Some(self.pass_defense()?)
            }
            BattleAction::UseSkill(skill) => {
                self.use_skill(player, skill)?;
                None
            }
            BattleAction::FlagRotation => {
                self.flag_for_rotation(player)?;
                None
            }
            BattleAction::SetActiveCharacter(index) => {
                self.set_active_character(player, *index)?;
                None
            }
            BattleAction::EndTurn => {
                if let Err(err) = self.ensure_acting(player) {
                    return self.reject(err);
                }
                self.end_turn()?;
                None
            }
        };
        self.actions.push(ActionRecord {
            player,
            action,
            turn,
        });
        Ok(outcome)
    }
}

impl std::fmt::Debug for Battle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battle")
            .field("state", &self.state)
            .field("players", &self.players)
            .field("clash", &self.clash)
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}
