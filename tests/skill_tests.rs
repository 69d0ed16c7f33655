//! Skill tests.
//!
//! These tests verify skills inside a running battle:
//! - Active skills: costs, cooldowns, restrictions
//! - Passive triggers on play, before and after resolve, and at turn start
//! - Passive auras in the strength pipeline
//! - Fault isolation for broken handlers and aura rules

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use debate_clash::battle::Battle;
use debate_clash::cards::{BattleEvent, Card, CardId, CharacterCard, CharacterId, Deck, EffectId, Skill, SkillId};
use debate_clash::core::{
    ActionError, AttackStyle, BattleConfig, BattleError, DefenseStyle, PacingConfig, Phase,
    PlayerId,
};
use debate_clash::effects::{Duration, HookAction, PersistentEffect};
use debate_clash::rules::BattleAction;
use debate_clash::skills::{AuraInput, AuraStage, EffectContext, SkillDispatcher, SkillFault};

fn config() -> BattleConfig {
    BattleConfig::default()
        .without_shuffle()
        .with_pacing(PacingConfig::immediate())
}

fn cards() -> Vec<Card> {
    (1..=20)
        .map(|i| Card::new(CardId::new(i), format!("Point {i}"), 0, 2))
        .collect()
}

fn character(skills: Vec<Skill>) -> CharacterCard {
    skills.into_iter().fold(
        CharacterCard::new(CharacterId::new(1), "Kyon").with_tag("comedy"),
        CharacterCard::with_skill,
    )
}

fn battle_with(a: Vec<Skill>, b: Vec<Skill>) -> Battle {
    let mut battle = Battle::new(config());
    battle.initialize_game(
        Deck::new(cards(), vec![character(a)]),
        Deck::new(cards(), vec![character(b)]),
    );
    battle
}

fn id(raw: &str) -> SkillId {
    SkillId::new(raw)
}

#[test]
fn test_active_skill_spends_tp_and_runs() {
    let mut battle = battle_with(
        vec![Skill::active("TPL_DRAW_1", "Quick Research", EffectId::Draw1, 1, 2)],
        vec![],
    );
    let hand = battle.player(PlayerId::A).hand.len();

    battle.use_skill(PlayerId::A, &id("TPL_DRAW_1")).unwrap();

    let a = battle.player(PlayerId::A);
    assert_eq!(a.tp, 1);
    assert_eq!(a.hand.len(), hand + 1);
    assert_eq!(a.cooldown(&id("TPL_DRAW_1")), 2);
}

#[test]
fn test_cooldown_ticks_on_owner_turns() {
    let mut battle = battle_with(
        vec![Skill::active("TPL_DRAW_1", "Quick Research", EffectId::Draw1, 0, 2)],
        vec![],
    );
    battle.use_skill(PlayerId::A, &id("TPL_DRAW_1")).unwrap();

    assert_eq!(
        battle.use_skill(PlayerId::A, &id("TPL_DRAW_1")),
        Err(BattleError::Action(ActionError::SkillOnCooldown {
            skill: id("TPL_DRAW_1"),
            remaining: 2
        }))
    );

    // B's turn does not tick A's cooldowns.
    battle.end_turn().unwrap();
    assert_eq!(battle.player(PlayerId::A).cooldown(&id("TPL_DRAW_1")), 2);

    battle.end_turn().unwrap();
    assert_eq!(battle.player(PlayerId::A).cooldown(&id("TPL_DRAW_1")), 1);

    battle.end_turn().unwrap();
    battle.end_turn().unwrap();
    assert_eq!(battle.player(PlayerId::A).cooldown(&id("TPL_DRAW_1")), 0);
    battle.use_skill(PlayerId::A, &id("TPL_DRAW_1")).unwrap();
}

#[test]
fn test_initial_cooldown() {
    let mut battle = battle_with(
        vec![Skill::active("TPL_GAIN_TP_2", "Second Wind", EffectId::GainTp2, 0, 3)
            .with_initial_cooldown(2)],
        vec![],
    );
    // Ticked once at the start of turn 1.
    assert_eq!(
        battle.use_skill(PlayerId::A, &id("TPL_GAIN_TP_2")),
        Err(BattleError::Action(ActionError::SkillOnCooldown {
            skill: id("TPL_GAIN_TP_2"),
            remaining: 1
        }))
    );
    battle.end_turn().unwrap();
    battle.end_turn().unwrap();
    battle.use_skill(PlayerId::A, &id("TPL_GAIN_TP_2")).unwrap();
}

#[test]
fn test_skill_rejections() {
    let mut battle = battle_with(
        vec![
            Skill::active("EXPENSIVE", "Grand Speech", EffectId::Draw1, 5, 0),
            Skill::passive("KONATA_LUCKY", "Lucky", EffectId::SliceOfLifeBoost),
        ],
        vec![Skill::active("TPL_DRAW_1", "Research", EffectId::Draw1, 0, 0)],
    );

    assert_eq!(
        battle.use_skill(PlayerId::A, &id("EXPENSIVE")),
        Err(BattleError::Action(ActionError::InsufficientTp {
            needed: 5,
            available: 2
        }))
    );
    assert_eq!(
        battle.use_skill(PlayerId::A, &id("KONATA_LUCKY")),
        Err(BattleError::Action(ActionError::SkillNotActive(id("KONATA_LUCKY"))))
    );
    assert_eq!(
        battle.use_skill(PlayerId::A, &id("MISSING")),
        Err(BattleError::Action(ActionError::UnknownSkill(id("MISSING"))))
    );
    assert_eq!(
        battle.use_skill(PlayerId::B, &id("TPL_DRAW_1")),
        Err(BattleError::Action(ActionError::NotYourTurn(PlayerId::B)))
    );
    assert_eq!(battle.player(PlayerId::A).tp, 2);
}

#[test]
fn test_skill_disable_restriction() {
    let mut battle = battle_with(
        vec![Skill::active("TPL_DRAW_1", "Research", EffectId::Draw1, 0, 0)],
        vec![],
    );
    battle
        .effects_mut()
        .add_skill_disable(PlayerId::A, None, 2);

    assert_eq!(
        battle.use_skill(PlayerId::A, &id("TPL_DRAW_1")),
        Err(BattleError::Action(ActionError::SkillDisabled(id("TPL_DRAW_1"))))
    );
    assert!(!battle
        .legal_actions(PlayerId::A)
        .contains(&BattleAction::UseSkill(id("TPL_DRAW_1"))));

    // Two turn starts later the restriction has expired.
    battle.end_turn().unwrap();
    battle.end_turn().unwrap();
    battle.use_skill(PlayerId::A, &id("TPL_DRAW_1")).unwrap();
}

#[test]
fn test_gain_tp_after_spending() {
    let mut battle = battle_with(
        vec![Skill::active("TPL_GAIN_TP_2", "Second Wind", EffectId::GainTp2, 0, 1)],
        vec![],
    );
    battle
        .initiate_clash(PlayerId::A, CardId::new(1), AttackStyle::Harsh)
        .unwrap();
    battle.pass_defense().unwrap();
    assert_eq!(battle.player(PlayerId::A).tp, 1);

    battle.use_skill(PlayerId::A, &id("TPL_GAIN_TP_2")).unwrap();
    // Capped at the turn's TP limit.
    assert_eq!(battle.player(PlayerId::A).tp, 2);
}

#[test]
fn test_strength_plus_passive_injects_before_resolve() {
    let mut battle = battle_with(
        vec![Skill::passive("KYON_TSUKKOMI", "Retort", EffectId::StrengthPlus2)],
        vec![Skill::passive("BOOST", "Boost", EffectId::StrengthPlus1)],
    );

    battle
        .initiate_clash(PlayerId::A, CardId::new(1), AttackStyle::Friendly)
        .unwrap();
    let outcome = battle
        .respond_to_clash(PlayerId::B, CardId::new(2), DefenseStyle::Agree)
        .unwrap();

    let strengths = outcome.strengths.unwrap();
    assert_eq!(strengths.attacker, 4);
    assert_eq!(strengths.defender, 3);
}

#[test]
fn test_topic_bias_passive_after_resolve() {
    let mut battle = battle_with(
        vec![],
        vec![Skill::passive("CROWD", "Crowd Favorite", EffectId::TopicBiasPlus1)],
    );

    battle
        .initiate_clash(PlayerId::A, CardId::new(1), AttackStyle::Friendly)
        .unwrap();
    battle
        .respond_to_clash(PlayerId::B, CardId::new(2), DefenseStyle::Agree)
        .unwrap();

    // Draw (2 vs 2) gives A +2 and B +1 reputation and no bias; B's passive then
    // shifts one point toward B.
    assert_eq!(battle.game_state().topic_bias, -1);
}

#[test]
fn test_bias_halve_opponent_active() {
    let mut battle = battle_with(
        vec![],
        vec![Skill::active("BIAS_HALVE_OPP", "Calm Down", EffectId::BiasHalveOpponent, 0, 3)],
    );
    battle.add_persistent_effect(
        PersistentEffect::new(PlayerId::A, "Momentum", Duration::Permanent).on_apply(
            HookAction::ShiftTopicBias {
                toward: PlayerId::A,
                amount: 7,
            },
        ),
    );
    battle.end_turn().unwrap();

    battle.use_skill(PlayerId::B, &id("BIAS_HALVE_OPP")).unwrap();
    assert_eq!(battle.game_state().topic_bias, 4);
}

#[test]
fn test_next_card_any_type_matches_tag_bonus() {
    let mut battle = battle_with(
        vec![Skill::active("WILD", "Improvise", EffectId::NextCardAnyType, 0, 2)],
        vec![],
    );
    battle
        .effects_mut()
        .add_tag_strength_bonus(PlayerId::A, "mystery", 3, 2);

    battle.use_skill(PlayerId::A, &id("WILD")).unwrap();
    assert!(battle.player(PlayerId::A).next_card_any_type);

    battle
        .initiate_clash(PlayerId::A, CardId::new(1), AttackStyle::Friendly)
        .unwrap();
    assert!(!battle.player(PlayerId::A).next_card_any_type);

    let outcome = battle.pass_defense().unwrap();
    assert_eq!(outcome.strengths.unwrap().attacker, 5);
}

#[test]
fn test_genre_expert_aura() {
    let battle = battle_with(
        vec![Skill::passive("AURA_GENRE_EXPERT", "Genre Expert", EffectId::GenreExpert)],
        vec![],
    );
    let comedy = Card::new(CardId::new(50), "Punchline", 0, 2).with_tag("comedy");
    let drama = Card::new(CardId::new(51), "Monologue", 0, 2).with_tag("drama");

    assert_eq!(battle.calculate_final_strength(&comedy, PlayerId::A), 3);
    assert_eq!(battle.calculate_final_strength(&drama, PlayerId::A), 2);
    // The aura only helps its owner's cards.
    assert_eq!(battle.calculate_final_strength(&comedy, PlayerId::B), 2);
}

#[test]
fn test_turn_start_passive_runs_for_active_side() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);

    let mut battle = Battle::new(config());
    battle.dispatcher_mut().register(
        EffectId::HaruhiCommand,
        move |ctx: &mut EffectContext<'_>| -> Result<(), SkillFault> {
            assert_eq!(ctx.event, BattleEvent::TurnStart);
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        },
    );
    battle.initialize_game(
        Deck::new(cards(), vec![character(vec![Skill::passive("HARUHI_AURA", "Command", EffectId::HaruhiCommand)])]),
        Deck::new(cards(), vec![]),
    );
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    battle.end_turn().unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    battle.end_turn().unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn test_panicking_handler_does_not_break_battle() {
    let mut battle = Battle::new(config());
    battle.dispatcher_mut().register(
        EffectId::Draw1,
        |ctx: &mut EffectContext<'_>| -> Result<(), SkillFault> {
            ctx.draw_cards(3);
            panic!("broken skill");
        },
    );
    battle.initialize_game(
        Deck::new(
            cards(),
            vec![character(vec![Skill::active("TPL_DRAW_1", "Research", EffectId::Draw1, 1, 0)])],
        ),
        Deck::new(cards(), vec![]),
    );
    let hand = battle.player(PlayerId::A).hand.len();

    battle.use_skill(PlayerId::A, &id("TPL_DRAW_1")).unwrap();

    assert_eq!(battle.player(PlayerId::A).hand.len(), hand);
    assert_eq!(battle.player(PlayerId::A).tp, 1);
    assert_eq!(battle.game_state().phase, Phase::Action);
    battle.end_turn().unwrap();
}

#[test]
fn test_panicking_aura_does_not_break_clash() {
    let mut dispatcher = SkillDispatcher::with_builtins();
    dispatcher.register_aura(
        EffectId::GenreExpert,
        AuraStage::Additive,
        |_: &AuraInput<'_>, _: i64| -> i64 { panic!("broken aura") },
    );
    let mut battle = Battle::new(config()).with_dispatcher(dispatcher);
    battle.initialize_game(
        Deck::new(
            cards(),
            vec![character(vec![Skill::passive("AURA_GENRE_EXPERT", "Expert", EffectId::GenreExpert)])],
        ),
        Deck::new(cards(), vec![]),
    );

    battle
        .initiate_clash(PlayerId::A, CardId::new(1), AttackStyle::Friendly)
        .unwrap();
    let outcome = battle.pass_defense().unwrap();

    // The built-in rule does not match an untagged card; the broken one adds nothing.
    assert_eq!(outcome.strengths.unwrap().attacker, 2);
    assert!(battle.open_clash().is_none());
    assert_eq!(battle.game_state().phase, Phase::Action);
}

#[test]
fn test_haruhi_command_adds_tp_over_refill() {
    let mut gained = 0;
    for seed in 0..200 {
        let mut battle = Battle::new(config().with_seed(seed));
        battle.initialize_game(
            Deck::new(
                cards(),
                vec![character(vec![Skill::passive("HARUHI_AURA", "Brigade Chief", EffectId::HaruhiCommand)])],
            ),
            Deck::new(cards(), vec![]),
        );

        let a = battle.player(PlayerId::A);
        assert!(a.tp == 2 || a.tp == 3, "seed {seed}: tp {}", a.tp);
        assert_eq!(a.tp, a.tp_limit);
        if a.tp == 3 {
            gained += 1;
            // The extra point lasts for this turn only.
            battle.end_turn().unwrap();
            assert_eq!(battle.player(PlayerId::A).tp_limit, 3);
            assert_eq!(battle.player(PlayerId::A).tp, 3);
        }
    }
    assert!(gained > 50 && gained < 150, "expected roughly half, got {gained}");
}

#[test]
fn test_usable_skills_listed_as_legal() {
    let battle = battle_with(
        vec![
            Skill::active("TPL_DRAW_1", "Research", EffectId::Draw1, 0, 0),
            Skill::active("EXPENSIVE", "Grand Speech", EffectId::Draw1, 9, 0),
        ],
        vec![],
    );
    let actions = battle.legal_actions(PlayerId::A);
    assert!(actions.contains(&BattleAction::UseSkill(id("TPL_DRAW_1"))));
    assert!(!actions.contains(&BattleAction::UseSkill(id("EXPENSIVE"))));
}
