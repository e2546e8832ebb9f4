//! GameEvent: what the session tells presentation and statistics layers
//!
//! Every ledger mutation and every rejected request produces exactly one
//! event. Events carry the ledger snapshot taken right after the change so
//! consumers never have to query the session back.

use serde::{Deserialize, Serialize};

use crate::bonus::{BonusAward, BonusSpinOutcome};
use crate::error::SpinError;
use crate::ledger::{LedgerState, SpinApplication};
use crate::paytable::SpinOutcome;
use crate::request::SpinRequest;

/// Session event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A spin was generated, evaluated and applied
    SpinResolved {
        round: u64,
        request: SpinRequest,
        outcome: SpinOutcome,
        applied: SpinApplication,
        ledger: LedgerState,
    },

    /// Win streak reached the bonus threshold
    BonusTriggered {
        round: u64,
        consecutive_wins: u32,
    },

    /// Bonus award credited
    BonusAwarded {
        award: BonusAward,
        ledger: LedgerState,
    },

    /// Optional bonus sub-spin resolved
    BonusSpinResolved {
        outcome: BonusSpinOutcome,
        ledger: LedgerState,
    },

    /// Request failed pre-flight validation; nothing changed
    SpinRejected {
        request: SpinRequest,
        /// Display text of the failure
        reason: String,
    },

    /// Auto-play switched on or off
    AutoPlayToggled { enabled: bool },
}

impl GameEvent {
    pub fn rejected(request: SpinRequest, error: &SpinError) -> Self {
        Self::SpinRejected {
            request,
            reason: error.to_string(),
        }
    }

    /// Event type name
    pub fn type_name(&self) -> &'static str {
        match self {
            GameEvent::SpinResolved { .. } => "spin_resolved",
            GameEvent::BonusTriggered { .. } => "bonus_triggered",
            GameEvent::BonusAwarded { .. } => "bonus_awarded",
            GameEvent::BonusSpinResolved { .. } => "bonus_spin_resolved",
            GameEvent::SpinRejected { .. } => "spin_rejected",
            GameEvent::AutoPlayToggled { .. } => "auto_play_toggled",
        }
    }

    /// Ledger snapshot carried by the event, if it mutated the ledger
    pub fn ledger(&self) -> Option<&LedgerState> {
        match self {
            GameEvent::SpinResolved { ledger, .. }
            | GameEvent::BonusAwarded { ledger, .. }
            | GameEvent::BonusSpinResolved { ledger, .. } => Some(ledger),
            _ => None,
        }
    }

    /// Serialize as one JSON line
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
