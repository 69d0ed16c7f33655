//! Built-in effect handlers and aura rules.

use tracing::debug;

use super::aura::{genre_expert, slice_of_life_boost, AuraStage};
use super::context::EffectContext;
use super::dispatcher::{SkillDispatcher, SkillFault};
use crate::cards::{BattleEvent, EffectId};

type HandlerResult = Result<(), SkillFault>;

/// Register every built-in handler and aura rule.
pub fn register_builtins(dispatcher: &mut SkillDispatcher) {
    dispatcher.register(EffectId::Draw1, draw_1);
    dispatcher.register(EffectId::GainTp1, gain_tp_1);
    dispatcher.register(EffectId::GainTp2, gain_tp_2);
    dispatcher.register(EffectId::StrengthPlus1, strength_plus_1);
    dispatcher.register(EffectId::StrengthPlus2, strength_plus_2);
    dispatcher.register(EffectId::NextCardAnyType, next_card_any_type);
    dispatcher.register(EffectId::BiasHalveOpponent, bias_halve_opponent);
    dispatcher.register(EffectId::TopicBiasPlus1, topic_bias_plus_1);
    dispatcher.register(EffectId::HaruhiCommand, haruhi_command);

    dispatcher.register_aura(EffectId::GenreExpert, AuraStage::Additive, genre_expert);
    dispatcher.register_aura(EffectId::SliceOfLifeBoost, AuraStage::Additive, slice_of_life_boost);
}

fn draw_1(ctx: &mut EffectContext<'_>) -> HandlerResult {
    ctx.draw_cards(1);
    Ok(())
}

fn gain_tp_1(ctx: &mut EffectContext<'_>) -> HandlerResult {
    ctx.gain_tp(1);
    Ok(())
}

fn gain_tp_2(ctx: &mut EffectContext<'_>) -> HandlerResult {
    ctx.gain_tp(2);
    Ok(())
}

fn strength_plus(ctx: &mut EffectContext<'_>, amount: i64) -> HandlerResult {
    if ctx.event == BattleEvent::BeforeResolve {
        ctx.add_strength_bonus(ctx.role, amount);
    }
    Ok(())
}

fn strength_plus_1(ctx: &mut EffectContext<'_>) -> HandlerResult {
    strength_plus(ctx, 1)
}

fn strength_plus_2(ctx: &mut EffectContext<'_>) -> HandlerResult {
    strength_plus(ctx, 2)
}

fn next_card_any_type(ctx: &mut EffectContext<'_>) -> HandlerResult {
    ctx.grant_next_card_any_type();
    Ok(())
}

/// Halve the opponent's bias advantage, rounding the reduction down.
fn bias_halve_opponent(ctx: &mut EffectContext<'_>) -> HandlerResult {
    let opponent = ctx.player.opponent();
    let advantage = opponent.bias_advantage(ctx.topic_bias());
    if advantage > 0 {
        let reduce = advantage / 2;
        debug!(player = %ctx.player, advantage, reduce, "halving opponent bias advantage");
        if reduce > 0 {
            ctx.shift_topic_bias(ctx.player, reduce);
        }
    }
    Ok(())
}

fn topic_bias_plus_1(ctx: &mut EffectContext<'_>) -> HandlerResult {
    if ctx.event == BattleEvent::AfterResolve {
        ctx.shift_topic_bias(ctx.player, 1);
    }
    Ok(())
}

/// When not ahead on bias, a coin flip for 1 TP on top of the turn's refill.
fn haruhi_command(ctx: &mut EffectContext<'_>) -> HandlerResult {
    if ctx.own_bias_advantage() <= 0 && ctx.roll(0.5) {
        ctx.gain_bonus_tp(1);
    }
    Ok(())
}
