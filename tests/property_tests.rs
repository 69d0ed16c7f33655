//! Property tests.
//!
//! Invariants checked over generated inputs:
//! - Strength categories over the full `i64` range
//! - Effect registry duration decay
//! - TP spent equals card cost plus style cost
//! - Base strength passes through unchanged with nothing applied

use proptest::prelude::*;

use debate_clash::battle::Battle;
use debate_clash::calc::{calculate_rewards, StrengthCalculator, StrengthCategory};
use debate_clash::cards::{Card, CardId, Deck};
use debate_clash::core::{
    AttackStyle, BattleConfig, ClashContext, ClashStrengths, DefenseStyle, PacingConfig,
    PlayerId, PlayerMap, PlayerState,
};
use debate_clash::effects::{Duration, HookAction, PersistentEffect, PersistentEffectRegistry};
use debate_clash::rules::{GameOutcome, GameResult, VictoryReason};
use debate_clash::skills::AuraRegistry;

fn attack_style() -> impl Strategy<Value = AttackStyle> {
    prop_oneof![Just(AttackStyle::Friendly), Just(AttackStyle::Harsh)]
}

fn defense_style() -> impl Strategy<Value = DefenseStyle> {
    prop_oneof![Just(DefenseStyle::Agree), Just(DefenseStyle::Disagree)]
}

fn config() -> BattleConfig {
    BattleConfig::default()
        .without_shuffle()
        .with_pacing(PacingConfig::immediate())
}

proptest! {
    #[test]
    fn test_category_boundaries(diff in any::<i64>()) {
        let category = StrengthCategory::from_diff(diff);
        let expected = if diff >= 5 {
            StrengthCategory::AttackerCrush
        } else if diff >= 1 {
            StrengthCategory::AttackerAdvantage
        } else if diff == 0 {
            StrengthCategory::Draw
        } else if diff >= -4 {
            StrengthCategory::DefenderAdvantage
        } else {
            StrengthCategory::DefenderCrush
        };
        prop_assert_eq!(category, expected);
    }

    /// Rewards are symmetric between sides: swapping the attacker mirrors the bias.
    #[test]
    fn test_reward_bias_mirrors_attacker(
        attack in attack_style(),
        defense in defense_style(),
        attacker_strength in -50i64..50,
        defender_strength in -50i64..50,
    ) {
        let card = Card::new(CardId::new(1), "Point", 0, 1);
        let mut from_a = ClashContext::open(PlayerId::A, card.clone(), attack);
        from_a.respond(card.clone(), defense);
        from_a.strengths = Some(ClashStrengths { attacker: attacker_strength, defender: defender_strength });

        let mut from_b = ClashContext::open(PlayerId::B, card.clone(), attack);
        from_b.respond(card, defense);
        from_b.strengths = from_a.strengths;

        let a = calculate_rewards(&from_a).unwrap();
        let b = calculate_rewards(&from_b).unwrap();
        prop_assert_eq!(a.attacker_reputation, b.attacker_reputation);
        prop_assert_eq!(a.defender_reputation, b.defender_reputation);
        prop_assert_eq!(a.topic_bias, -b.topic_bias);
    }

    /// An effect lasting n turns survives n - 1 turn starts and is gone after the n-th.
    #[test]
    fn test_effect_decay(n in 1u32..20) {
        let mut registry = PersistentEffectRegistry::new();
        let (id, _) = registry.add_effect(PersistentEffect::new(PlayerId::A, "Timed", Duration::Turns(n)));

        for i in 0..n - 1 {
            let side = if i % 2 == 0 { PlayerId::B } else { PlayerId::A };
            let _ = registry.on_turn_start(side);
            prop_assert!(registry.get(id).is_some());
        }
        let _ = registry.on_turn_start(PlayerId::A);
        prop_assert!(registry.get(id).is_none());
    }

    /// The expire hook fires exactly once, on the turn start that removes the effect.
    #[test]
    fn test_expire_fires_once(n in 0u32..10) {
        let mut registry = PersistentEffectRegistry::new();
        let effect = PersistentEffect::new(PlayerId::B, "Timed", Duration::Turns(n))
            .on_expire(HookAction::DrawCards { player: PlayerId::B, count: 1 });
        let (_, mut firings) = registry.add_effect(effect);

        for _ in 0..n + 3 {
            firings.extend(registry.on_turn_start(PlayerId::A));
        }
        prop_assert_eq!(firings.len(), 1);
        prop_assert!(registry.is_empty());
    }

    /// TP spent on an attack is the card cost plus the style cost.
    #[test]
    fn test_attack_tp_accounting(cost in 0u32..3, style in attack_style()) {
        let card = Card::new(CardId::new(1), "Point", cost, 2);
        let mut battle = Battle::new(config().with_turn_limit(20));
        battle.initialize_game(
            Deck::new(vec![card.clone()], vec![]),
            Deck::new(vec![card], vec![]),
        );
        // Turn 3: TP limit 4 covers every combination.
        battle.end_turn().unwrap();
        battle.end_turn().unwrap();

        let before = battle.player(PlayerId::A).tp;
        battle.initiate_clash(PlayerId::A, CardId::new(1), style).unwrap();
        prop_assert_eq!(before - battle.player(PlayerId::A).tp, cost + style.cost());

        let defender_before = battle.player(PlayerId::B).tp;
        battle.pass_defense().unwrap();
        prop_assert_eq!(battle.player(PlayerId::A).tp, before - cost - style.cost());
        prop_assert_eq!(battle.player(PlayerId::B).tp, defender_before);
    }

    /// Defense TP is the card cost plus the style cost; the attack is not charged again.
    #[test]
    fn test_defense_tp_accounting(cost in 0u32..3, style in defense_style()) {
        let card = Card::new(CardId::new(1), "Point", cost, 2);
        let mut battle = Battle::new(config());
        battle.initialize_game(
            Deck::new(vec![Card::new(CardId::new(9), "Free", 0, 1)], vec![]),
            Deck::new(vec![card], vec![]),
        );
        battle.end_turn().unwrap();
        battle.end_turn().unwrap();

        battle.initiate_clash(PlayerId::A, CardId::new(9), AttackStyle::Friendly).unwrap();
        let attacker_after_attack = battle.player(PlayerId::A).tp;
        let before = battle.player(PlayerId::B).tp;
        battle.respond_to_clash(PlayerId::B, CardId::new(1), style).unwrap();

        prop_assert_eq!(before - battle.player(PlayerId::B).tp, cost + style.cost());
        prop_assert_eq!(battle.player(PlayerId::A).tp, attacker_after_attack);
    }

    /// With no auras, bonuses or bias, final strength is the card's strength.
    #[test]
    fn test_plain_strength_passes_through(strength in 0i64..1000, owner_is_a in any::<bool>()) {
        let players = PlayerMap::new(|_| PlayerState::new(30));
        let auras = AuraRegistry::new();
        let registry = PersistentEffectRegistry::new();
        let calculator = StrengthCalculator::new(0, &players, &auras, &registry);

        let owner = if owner_is_a { PlayerId::A } else { PlayerId::B };
        let card = Card::new(CardId::new(1), "Point", 0, strength);
        prop_assert_eq!(calculator.calculate_final_strength(&card, owner, false), strength);
    }

    /// Only the favored side gets the bias bonus.
    #[test]
    fn test_bias_bonus_only_for_favored_side(bias in -10i64..=10, strength in 0i64..20) {
        let players = PlayerMap::new(|_| PlayerState::new(30));
        let auras = AuraRegistry::new();
        let registry = PersistentEffectRegistry::new();
        let calculator = StrengthCalculator::new(bias, &players, &auras, &registry);
        let card = Card::new(CardId::new(1), "Point", 0, strength);

        prop_assert_eq!(calculator.calculate_final_strength(&card, PlayerId::A, false), strength + bias.max(0));
        prop_assert_eq!(calculator.calculate_final_strength(&card, PlayerId::B, false), strength + (-bias).max(0));
    }

    /// A second end_game never changes the recorded outcome.
    #[test]
    fn test_end_game_keeps_first_outcome(first_a in any::<bool>(), second_a in any::<bool>()) {
        let pick = |a: bool| if a { PlayerId::A } else { PlayerId::B };
        let mut battle = Battle::new(config());
        battle.initialize_game(Deck::new(vec![], vec![]), Deck::new(vec![], vec![]));

        let first = GameOutcome::new(GameResult::Winner(pick(first_a)), VictoryReason::Reputation);
        battle.end_game(first);
        battle.end_game(GameOutcome::new(GameResult::Winner(pick(second_a)), VictoryReason::TopicBias));
        battle.check_victory_conditions();

        prop_assert_eq!(battle.game_state().outcome, Some(first));
    }
}
