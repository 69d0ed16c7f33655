//! Turn flow, victory, skills and character rotation.

use tracing::{debug, info, warn};

use super::notify::Severity;
use super::session::Battle;
use crate::cards::{BattleEvent, Deck, Skill, SkillId};
use crate::core::{
    ActionError, BattleResult, GameState, Phase, PlayerId, PlayerMap, PlayerState,
};
use crate::rules::{check_victory, judge_final, GameOutcome, GameResult};
use crate::skills::Role;

impl Battle {
    /// Deal both decks and start turn 1 with A active.
    ///
    /// Resets any previous battle on this session. Decks are shuffled when
    /// `shuffle_decks` is set, each from its own RNG stream.
    pub fn initialize_game(&mut self, deck_a: Deck, deck_b: Deck) {
        for deck in [&deck_a, &deck_b] {
            for skill in deck.characters.iter().flat_map(|c| c.skills.iter()) {
                if !self.dispatcher.is_registered(skill.effect) {
                    warn!(skill = %skill.id, effect = %skill.effect, "skill effect has no handler");
                }
            }
            for card in &deck.cards {
                for effect in card.effects.iter().filter(|e| !self.dispatcher.is_registered(e.effect)) {
                    warn!(card = %card.id, effect = %effect.effect, "card effect has no handler");
                }
            }
        }

        let prepare = |side: PlayerId, mut deck: Deck| {
            if self.config.shuffle_decks {
                let mut stream = self.rng.for_context(&format!("deck:{side:?}"));
                stream.shuffle(&mut deck.cards);
            }
            PlayerState::from_deck(deck, self.config.initial_reputation)
        };
        let a = prepare(PlayerId::A, deck_a);
        let b = prepare(PlayerId::B, deck_b);
        self.players = PlayerMap::from_parts(a, b);

        self.state = GameState::default();
        self.effects.clear_all();
        self.clash = None;
        self.last_clash = None;
        self.pacer.clear();

        for side in PlayerId::BOTH {
            for _ in 0..self.config.initial_hand_size {
                self.draw_card(side);
            }
        }

        info!(
            seed = self.rng.seed(),
            reputation = self.config.initial_reputation,
            "battle initialized"
        );
        self.begin_turn();
    }

    /// Start the current turn.
    ///
    /// Refreshes TP for both sides, draws for the active side, resets
    /// rotation counters, runs registry turn-start hooks and decay, ticks
    /// the active side's cooldowns, performs a flagged rotation, runs
    /// turn-start passives and enters the `Action` phase.
    pub fn start_turn(&mut self) -> BattleResult<()> {
        if let Err(err) = self.ensure_not_over() {
            return self.reject(err);
        }
        if self.clash.is_some() {
            return self.reject(ActionError::ClashAlreadyOpen);
        }
        self.begin_turn();
        Ok(())
    }

    pub(crate) fn begin_turn(&mut self) {
        let turn = self.state.turn;
        let active = self.state.active_player;
        let tp_limit = self.config.tp_limit_for_turn(turn);

        for (_, player) in self.players.iter_mut() {
            player.tp_limit = tp_limit;
            player.tp = tp_limit;
            player.rotations_used_this_turn = 0;
        }
        self.draw_card(active);

        let firings = self.effects.on_turn_start(active);
        self.apply_hook_firings(firings);
        if self.state.is_game_over() {
            return;
        }

        self.players[active].tick_cooldowns();

        let player = &mut self.players[active];
        if player.needs_rotation {
            player.needs_rotation = false;
            if !player.characters.is_empty() {
                player.active_character_index =
                    (player.active_character_index + 1) % player.characters.len();
                debug!(%active, index = player.active_character_index, "scheduled rotation");
            }
        }

        self.run_triggered(active, Role::Attacker, BattleEvent::TurnStart, None, None);
        if self.state.is_game_over() {
            return;
        }

        self.state.phase = Phase::Action;
        info!(turn, %active, tp_limit, "turn started");
        self.notify(Severity::Info, format!("Turn {turn}: {active} to act"));
        self.check_victory_conditions();
    }

    /// End the active side's turn.
    ///
    /// Runs registry turn-end hooks, then either judges the battle (at the
    /// turn limit) or passes the turn to the other side.
    pub fn end_turn(&mut self) -> BattleResult<()> {
        if let Err(err) = self.ensure_phase(Phase::Action) {
            return self.reject(err);
        }

        let active = self.state.active_player;
        let firings = self.effects.on_turn_end(active);
        self.apply_hook_firings(firings);
        if self.state.is_game_over() {
            return Ok(());
        }

        if self.state.turn >= self.config.turn_limit {
            self.judge_final_winner();
            return Ok(());
        }

        self.state.turn += 1;
        self.state.active_player = active.opponent();
        self.begin_turn();
        Ok(())
    }

    /// Evaluate the victory conditions, ending the battle on the first hit.
    ///
    /// Returns whether the battle is over.
    pub fn check_victory_conditions(&mut self) -> bool {
        if self.state.is_game_over() {
            return true;
        }
        if self.state.phase == Phase::Setup {
            return false;
        }
        match check_victory(
            &self.players,
            self.state.topic_bias,
            self.config.topic_bias_limit,
        ) {
            Some(outcome) => {
                self.end_game(outcome);
                true
            }
            None => false,
        }
    }

    /// Judge the battle on reputation and end it.
    pub fn judge_final_winner(&mut self) -> GameOutcome {
        let outcome = judge_final(&self.players);
        self.end_game(outcome);
        self.state.outcome.unwrap_or(outcome)
    }

    /// End the battle. A second call while already over changes nothing.
    ///
    /// Returns whether this call ended the battle.
    pub fn end_game(&mut self, outcome: GameOutcome) -> bool {
        if self.state.is_game_over() {
            return false;
        }
        self.state.phase = Phase::GameOver;
        self.state.outcome = Some(outcome);
        self.clash = None;
        self.pacer.clear();
        self.effects.clear_all();

        info!(result = ?outcome.result, reason = ?outcome.reason, "battle over");
        let message = match outcome.result {
            GameResult::Winner(p) => format!("{p} wins ({:?})", outcome.reason),
            GameResult::Draw => "The battle ends in a draw".to_string(),
        };
        self.notify(Severity::Info, message);
        true
    }

    // === Skills ===

    pub(crate) fn check_skill(&self, player: PlayerId, id: &SkillId) -> Result<Skill, ActionError> {
        self.ensure_acting(player)?;
        let state = &self.players[player];
        let skill = state
            .active_character()
            .and_then(|c| c.skill(id))
            .ok_or_else(|| ActionError::UnknownSkill(id.clone()))?;
        if !skill.is_active() {
            return Err(ActionError::SkillNotActive(id.clone()));
        }
        if self.effects.is_skill_disabled(player, id) {
            return Err(ActionError::SkillDisabled(id.clone()));
        }
        let remaining = state.cooldown(id);
        if remaining > 0 {
            return Err(ActionError::SkillOnCooldown {
                skill: id.clone(),
                remaining,
            });
        }
        if state.tp < skill.cost {
            return Err(ActionError::InsufficientTp {
                needed: skill.cost,
                available: state.tp,
            });
        }
        Ok(skill.clone())
    }

    /// Use an active skill of `player`'s active character.
    pub fn use_skill(&mut self, player: PlayerId, id: &SkillId) -> BattleResult<()> {
        let skill = self.check_skill(player, id).or_else(|e| self.reject(e))?;

        let state = &mut self.players[player];
        state.spend_tp(skill.cost);
        if skill.cooldown > 0 {
            state.skill_cooldowns.insert(skill.id.clone(), skill.cooldown);
        }
        debug!(%player, skill = %skill.id, effect = %skill.effect, "skill used");
        self.notify(Severity::Info, format!("{player} uses {}", skill.name));

        self.run_active(player, &skill);
        self.check_victory_conditions();
        Ok(())
    }

    // === Rotation ===

    pub(crate) fn check_flag_rotation(&self, player: PlayerId) -> Result<(), ActionError> {
        self.ensure_not_over()?;
        let count = self.players[player].characters.len();
        if count < 2 {
            return Err(ActionError::InvalidCharacter(count));
        }
        Ok(())
    }

    /// Rotate `player` to the next character at their next turn start.
    pub fn flag_for_rotation(&mut self, player: PlayerId) -> BattleResult<()> {
        self.check_flag_rotation(player)
            .or_else(|e| self.reject(e))?;
        self.players[player].needs_rotation = true;
        debug!(%player, "rotation flagged");
        Ok(())
    }

    pub(crate) fn check_set_active(&self, player: PlayerId, index: usize) -> Result<(), ActionError> {
        self.ensure_acting(player)?;
        let state = &self.players[player];
        if index >= state.characters.len() {
            return Err(ActionError::InvalidCharacter(index));
        }
        if index != state.active_character_index
            && state.rotations_used_this_turn >= self.config.max_rotations_per_turn
        {
            return Err(ActionError::RotationLimitReached);
        }
        Ok(())
    }

    /// Switch `player`'s active character now.
    ///
    /// Selecting the current character is accepted and uses no rotation.
    pub fn set_active_character(&mut self, player: PlayerId, index: usize) -> BattleResult<()> {
        self.check_set_active(player, index)
            .or_else(|e| self.reject(e))?;
        let state = &mut self.players[player];
        if index != state.active_character_index {
            state.active_character_index = index;
            state.rotations_used_this_turn += 1;
            debug!(%player, index, "active character changed");
        }
        Ok(())
    }
}
