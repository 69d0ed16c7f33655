//! Battle state records.
//!
//! ## GameState
//!
//! Shared progression: turn, phase, active side, topic bias, outcome.
//!
//! ## PlayerState
//!
//! One side's resources, piles, roster and cooldowns. Piles are `im`
//! vectors so read-only views handed to UI or AI callers clone in O(1).
//! The top of the draw pile is the front of the vector.
//!
//! Both records are written only by the battle session.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::cards::{Card, CardId, CharacterCard, Deck, SkillId};
use crate::rules::GameOutcome;

/// Battle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Decks not dealt yet.
    Setup,
    /// The active side may attack, use skills, rotate or end the turn.
    Action,
    /// Waiting for the non-active side to answer the open clash.
    Defense,
    /// Terminal.
    GameOver,
}

/// Shared battle progression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Turn number (starts at 1).
    pub turn: u32,

    pub phase: Phase,

    /// Side whose turn it is.
    pub active_player: PlayerId,

    /// Shared scalar; positive favors A, negative favors B.
    pub topic_bias: i64,

    /// Set exactly once, when the battle ends.
    pub outcome: Option<GameOutcome>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            turn: 1,
            phase: Phase::Setup,
            active_player: PlayerId::A,
            topic_bias: 0,
            outcome: None,
        }
    }
}

impl GameState {
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Shift the bias by `delta`, clamped to `[-limit, limit]`.
    ///
    /// Returns the change actually applied.
    pub fn shift_topic_bias(&mut self, delta: i64, limit: i64) -> i64 {
        let before = self.topic_bias;
        self.topic_bias = before.saturating_add(delta).clamp(-limit, limit);
        self.topic_bias - before
    }
}

/// Result of a single draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn(CardId),
    PileEmpty,
    HandFull,
}

/// One side's battle resources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub tp: u32,
    pub tp_limit: u32,

    /// Victory resource; at or below 0 loses.
    pub reputation: i64,

    pub hand: Vector<Card>,
    pub draw_pile: Vector<Card>,
    pub discard_pile: Vector<Card>,

    pub characters: Vec<CharacterCard>,
    pub active_character_index: usize,

    /// Remaining cooldown per skill. Absent means ready.
    pub skill_cooldowns: FxHashMap<SkillId, u32>,

    /// Rotate to the next character at this side's next turn start.
    pub needs_rotation: bool,
    pub rotations_used_this_turn: u32,

    /// The next played card matches any tag.
    pub next_card_any_type: bool,
}

impl PlayerState {
    /// Fresh state with empty piles and no roster.
    #[must_use]
    pub fn new(reputation: i64) -> Self {
        Self {
            tp: 0,
            tp_limit: 0,
            reputation,
            hand: Vector::new(),
            draw_pile: Vector::new(),
            discard_pile: Vector::new(),
            characters: Vec::new(),
            active_character_index: 0,
            skill_cooldowns: FxHashMap::default(),
            needs_rotation: false,
            rotations_used_this_turn: 0,
            next_card_any_type: false,
        }
    }

    /// State for a deck: the deck's cards form the draw pile (first card on
    /// top) and active skills start at their initial cooldown.
    #[must_use]
    pub fn from_deck(deck: Deck, reputation: i64) -> Self {
        let mut state = Self::new(reputation);
        state.draw_pile = deck.cards.into_iter().collect();
        for skill in deck.characters.iter().flat_map(|c| c.actives()) {
            if skill.initial_cooldown > 0 {
                state
                    .skill_cooldowns
                    .insert(skill.id.clone(), skill.initial_cooldown);
            }
        }
        state.characters = deck.characters;
        state
    }

    /// The character currently on the field.
    #[must_use]
    pub fn active_character(&self) -> Option<&CharacterCard> {
        self.characters.get(self.active_character_index)
    }

    /// Tags of the active character (empty without a roster).
    #[must_use]
    pub fn active_tags(&self) -> &[String] {
        self.active_character()
            .map(|c| c.synergy_tags.as_slice())
            .unwrap_or(&[])
    }

    /// First copy of a card in hand.
    #[must_use]
    pub fn find_in_hand(&self, card: CardId) -> Option<&Card> {
        self.hand.iter().find(|c| c.id == card)
    }

    /// Move the first copy of a card from hand to the discard pile.
    ///
    /// Returns the card, or `None` when it is not in hand.
    pub fn discard_from_hand(&mut self, card: CardId) -> Option<Card> {
        let position = self.hand.iter().position(|c| c.id == card)?;
        let played = self.hand.remove(position);
        self.discard_pile.push_back(played.clone());
        Some(played)
    }

    /// Draw the top card into the hand unless the pile is empty or the hand
    /// already holds `max_hand` cards.
    pub fn draw(&mut self, max_hand: usize) -> DrawOutcome {
        if self.hand.len() >= max_hand {
            return DrawOutcome::HandFull;
        }
        match self.draw_pile.pop_front() {
            Some(card) => {
                let id = card.id;
                self.hand.push_back(card);
                DrawOutcome::Drawn(id)
            }
            None => DrawOutcome::PileEmpty,
        }
    }

    /// Gain TP without exceeding the limit. Returns the amount gained.
    pub fn gain_tp(&mut self, amount: u32) -> u32 {
        let before = self.tp;
        self.tp = self.tp.saturating_add(amount).min(self.tp_limit);
        self.tp.saturating_sub(before)
    }

    /// Gain TP past the turn's limit. The limit rises with it until the
    /// next turn's refill.
    pub fn gain_bonus_tp(&mut self, amount: u32) {
        self.tp_limit = self.tp_limit.saturating_add(amount);
        self.tp = self.tp.saturating_add(amount);
    }

    /// Lose TP without going below 0. Returns the amount lost.
    pub fn lose_tp(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.tp);
        self.tp -= lost;
        lost
    }

    /// Spend exactly `amount` TP, or nothing when short.
    pub fn spend_tp(&mut self, amount: u32) -> bool {
        if self.tp < amount {
            return false;
        }
        self.tp -= amount;
        true
    }

    /// Remaining cooldown of a skill.
    #[must_use]
    pub fn cooldown(&self, skill: &SkillId) -> u32 {
        self.skill_cooldowns.get(skill).copied().unwrap_or(0)
    }

    /// Decrement every cooldown, dropping those that reach 0.
    pub fn tick_cooldowns(&mut self) {
        self.skill_cooldowns.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CharacterId, EffectId, Skill};

    fn card(id: u32) -> Card {
        Card::new(CardId::new(id), format!("Card {id}"), 1, 2)
    }

    #[test]
    fn test_topic_bias_clamp() {
        let mut state = GameState::default();
        assert_eq!(state.shift_topic_bias(7, 10), 7);
        assert_eq!(state.shift_topic_bias(7, 10), 3);
        assert_eq!(state.topic_bias, 10);
        assert_eq!(state.shift_topic_bias(-25, 10), -20);
        assert_eq!(state.topic_bias, -10);
    }

    #[test]
    fn test_draw_from_top() {
        let deck = Deck::new(vec![card(1), card(2), card(3)], vec![]);
        let mut player = PlayerState::from_deck(deck, 30);

        assert_eq!(player.draw(10), DrawOutcome::Drawn(CardId::new(1)));
        assert_eq!(player.draw(10), DrawOutcome::Drawn(CardId::new(2)));
        assert_eq!(player.hand.len(), 2);
        assert_eq!(player.draw_pile.len(), 1);
    }

    #[test]
    fn test_draw_skips_full_hand_and_empty_pile() {
        let deck = Deck::new(vec![card(1), card(2)], vec![]);
        let mut player = PlayerState::from_deck(deck, 30);

        assert_eq!(player.draw(1), DrawOutcome::Drawn(CardId::new(1)));
        assert_eq!(player.draw(1), DrawOutcome::HandFull);
        assert_eq!(player.draw_pile.len(), 1);

        assert_eq!(player.draw(10), DrawOutcome::Drawn(CardId::new(2)));
        assert_eq!(player.draw(10), DrawOutcome::PileEmpty);
    }

    #[test]
    fn test_discard_first_copy() {
        let deck = Deck::new(vec![card(1), card(1), card(2)], vec![]);
        let mut player = PlayerState::from_deck(deck, 30);
        for _ in 0..3 {
            player.draw(10);
        }

        assert!(player.discard_from_hand(CardId::new(1)).is_some());
        assert_eq!(player.hand.len(), 2);
        assert_eq!(player.discard_pile.len(), 1);
        assert!(player.find_in_hand(CardId::new(1)).is_some());
        assert!(player.discard_from_hand(CardId::new(9)).is_none());
    }

    #[test]
    fn test_tp_bounds() {
        let mut player = PlayerState::new(30);
        player.tp_limit = 3;
        player.tp = 2;

        assert_eq!(player.gain_tp(5), 1);
        assert_eq!(player.tp, 3);
        assert!(!player.spend_tp(4));
        assert_eq!(player.tp, 3);
        assert!(player.spend_tp(3));
        assert_eq!(player.lose_tp(2), 0);
    }

    #[test]
    fn test_bonus_tp_raises_limit() {
        let mut player = PlayerState::new(30);
        player.tp_limit = 3;
        player.tp = 3;

        player.gain_bonus_tp(1);
        assert_eq!((player.tp, player.tp_limit), (4, 4));
        assert_eq!(player.gain_tp(1), 0);
    }

    #[test]
    fn test_cooldowns() {
        let character = CharacterCard::new(CharacterId::new(1), "Kyon").with_skill(
            Skill::active("KYON_TSUKKOMI", "Retort", EffectId::BiasHalveOpponent, 3, 2)
                .with_initial_cooldown(2),
        );
        let mut player = PlayerState::from_deck(Deck::new(vec![], vec![character]), 30);
        let id = SkillId::new("KYON_TSUKKOMI");

        assert_eq!(player.cooldown(&id), 2);
        player.tick_cooldowns();
        assert_eq!(player.cooldown(&id), 1);
        player.tick_cooldowns();
        assert_eq!(player.cooldown(&id), 0);
        assert!(player.skill_cooldowns.is_empty());
    }
}
