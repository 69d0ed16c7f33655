//! Presentation pacing.
//!
//! After an attack the battle schedules `AwaitDefense`, after a resolution
//! `Settle`. A host scheduler drains the steps and waits (or doesn't)
//! before calling back into the battle. The core never blocks, and a zero
//! delay schedules nothing.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::PacingConfig;

/// A pause point between battle steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacingStep {
    /// Before the defender is asked to respond.
    AwaitDefense,
    /// After a clash resolves.
    Settle,
}

/// Handle for cancelling a scheduled step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PacingToken(pub u64);

/// A step waiting for the host scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledStep {
    pub token: PacingToken,
    pub step: PacingStep,
    pub delay_ms: u64,
}

/// Queue of scheduled pacing steps.
#[derive(Clone, Debug, Default)]
pub struct Pacer {
    config: PacingConfig,
    pending: VecDeque<ScheduledStep>,
    next_token: u64,
}

impl Pacer {
    #[must_use]
    pub fn new(config: PacingConfig) -> Self {
        Self {
            config,
            pending: VecDeque::new(),
            next_token: 0,
        }
    }

    fn delay_for(&self, step: PacingStep) -> u64 {
        match step {
            PacingStep::AwaitDefense => self.config.defense_delay_ms,
            PacingStep::Settle => self.config.settle_delay_ms,
        }
    }

    /// Schedule a step. Returns `None` when its delay is zero.
    pub fn schedule(&mut self, step: PacingStep) -> Option<PacingToken> {
        let delay_ms = self.delay_for(step);
        if delay_ms == 0 {
            return None;
        }
        self.next_token += 1;
        let token = PacingToken(self.next_token);
        trace!(?step, delay_ms, "pacing step scheduled");
        self.pending.push_back(ScheduledStep {
            token,
            step,
            delay_ms,
        });
        Some(token)
    }

    /// Cancel a pending step. Returns `false` if it was not pending.
    pub fn cancel(&mut self, token: PacingToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.token != token);
        self.pending.len() != before
    }

    /// Take every pending step, oldest first.
    pub fn drain(&mut self) -> Vec<ScheduledStep> {
        self.pending.drain(..).collect()
    }

    /// Pending steps, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &ScheduledStep> {
        self.pending.iter()
    }

    /// Drop every pending step.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
